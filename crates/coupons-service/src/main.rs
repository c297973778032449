//! Coupons Service - HTTP API for the coupon lifecycle
//!
//! This is the main entry point for the coupons service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coupons_service::{create_router, AppState, ServiceConfig};
use coupons_store::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coupons=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Coupons Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        database_url = %config.database_url,
        api_prefix = %config.api_prefix,
        "Service configuration loaded"
    );

    // Open the database and create missing tables
    let db = Database::connect(&config.database()).await?;
    db.migrate().await?;

    // Build app state
    let state = AppState::new(db, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
