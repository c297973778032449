//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, patch};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{coupons, customers, health, links, resellers};
use crate::state::AppState;

/// Maximum concurrent requests across the prefixed API routes.
const API_MAX_CONCURRENT_REQUESTS: usize = 256;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check (never prefixed, no concurrency limit)
///
/// All other routes live under the configured API prefix (`/api/v1` by default)
/// and share one concurrency limit.
///
/// ## Coupons
/// - `GET /coupons`, `POST /coupons` - List, create a batch
/// - `GET|PATCH|DELETE /coupons/:id` - Read, partial update, delete
/// - `GET /coupons/:id/status` - Active flag and validity right now
/// - `GET /coupons/:id/customers` - Customers linked to the coupon
/// - `PATCH /coupons/apply/:code` - Redeem
///
/// ## Customers
/// - `GET /customers`, `POST /customers`
/// - `GET|PATCH|DELETE /customers/:id`
/// - `GET /customers/:id/coupons` - Coupons linked to the customer
///
/// ## Resellers
/// - `GET /resellers`, `POST /resellers`
/// - `GET|PATCH|DELETE /resellers/:id`
///
/// ## Links
/// - `GET /coupon-customer-link`, `POST /coupon-customer-link`
/// - `GET|DELETE /coupon-customer-link/:coupon_id/:customer_id`
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let api_prefix = state.config.api_prefix.trim_end_matches('/').to_string();
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let api = Router::new()
        // Coupons
        .route(
            "/coupons",
            get(coupons::list_coupons).post(coupons::create_coupons),
        )
        .route("/coupons/apply/:code", patch(coupons::apply_coupon))
        .route(
            "/coupons/:id",
            get(coupons::get_coupon)
                .patch(coupons::update_coupon)
                .delete(coupons::delete_coupon),
        )
        .route("/coupons/:id/status", get(coupons::coupon_status))
        .route("/coupons/:id/customers", get(coupons::coupon_customers))
        // Customers
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .patch(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/customers/:id/coupons", get(customers::customer_coupons))
        // Resellers
        .route(
            "/resellers",
            get(resellers::list_resellers).post(resellers::create_reseller),
        )
        .route(
            "/resellers/:id",
            get(resellers::get_reseller)
                .patch(resellers::update_reseller)
                .delete(resellers::delete_reseller),
        )
        // Links
        .route(
            "/coupon-customer-link",
            get(links::list_links).post(links::create_link),
        )
        .route(
            "/coupon-customer-link/:coupon_id/:customer_id",
            get(links::get_link).delete(links::delete_link),
        )
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    // Axum refuses to nest at the root.
    let router = if api_prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&api_prefix, api)
    };

    router
        .route("/health", get(health::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
