//! Coupon–customer link handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use coupons_core::{CouponCustomerLink, CouponId, CustomerId, PageRequest};

use crate::error::ApiError;
use crate::handlers::page;
use crate::state::AppState;

/// List links.
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<CouponCustomerLink>>, ApiError> {
    let page = page(query)?;
    let mut session = state.db.session().await?;
    let links = session.links().get_all(page).await?;
    Ok(Json(links))
}

/// Get one link by its composite key.
pub async fn get_link(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(CouponId, CustomerId)>, PathRejection>,
) -> Result<Json<CouponCustomerLink>, ApiError> {
    let Path((coupon_id, customer_id)) = path?;
    let mut session = state.db.session().await?;
    let found = session.links().get_by_ids(coupon_id, customer_id).await?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("link not found: {coupon_id}-{customer_id}")))
}

/// Link a coupon to a customer.
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CouponCustomerLink>, JsonRejection>,
) -> Result<(StatusCode, Json<CouponCustomerLink>), ApiError> {
    let Json(link) = body?;
    let mut session = state.db.session().await?;
    let link = session.links().create(link).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// Remove a link.
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(CouponId, CustomerId)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((coupon_id, customer_id)) = path?;
    let mut session = state.db.session().await?;
    session.links().delete_by_ids(coupon_id, customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
