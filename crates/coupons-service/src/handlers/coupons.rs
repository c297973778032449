//! Coupon handlers: CRUD, status and redemption.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use coupons_core::{
    Coupon, CouponApplied, CouponId, CouponPatch, CouponStatus, Customer, NewCoupon, PageRequest,
};

use crate::error::ApiError;
use crate::handlers::page;
use crate::state::AppState;

/// List coupons.
pub async fn list_coupons(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<Coupon>>, ApiError> {
    let page = page(query)?;
    let mut session = state.db.session().await?;
    let coupons = session.coupons().get_all(page).await?;
    Ok(Json(coupons))
}

/// Get a coupon by id.
pub async fn get_coupon(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CouponId>, PathRejection>,
) -> Result<Json<Coupon>, ApiError> {
    let Path(id) = path?;
    let mut session = state.db.session().await?;
    let found = session.coupons().get_by_id(id).await?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("coupon not found: {id}")))
}

/// Create a batch of coupons. Either all of them are stored or none is.
pub async fn create_coupons(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<NewCoupon>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Coupon>>), ApiError> {
    let Json(items) = body?;
    tracing::debug!(count = items.len(), "Creating coupons");

    let mut session = state.db.session().await?;
    let created = session.coupons().create_many(items).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a coupon.
pub async fn update_coupon(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CouponId>, PathRejection>,
    body: Result<Json<CouponPatch>, JsonRejection>,
) -> Result<Json<Coupon>, ApiError> {
    let Path(id) = path?;
    let Json(patch) = body?;
    let mut session = state.db.session().await?;
    let coupon = session.coupons().update(id, patch).await?;
    Ok(Json(coupon))
}

/// Delete a coupon.
pub async fn delete_coupon(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CouponId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let mut session = state.db.session().await?;
    session.coupons().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current status of a coupon.
pub async fn coupon_status(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CouponId>, PathRejection>,
) -> Result<Json<CouponStatus>, ApiError> {
    let Path(id) = path?;
    let mut session = state.db.session().await?;
    let status = session.coupons().status_by_id(id).await?;
    Ok(Json(status))
}

/// Redeem a coupon by code.
pub async fn apply_coupon(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<CouponApplied>, ApiError> {
    let Path(code) = path?;
    tracing::debug!(code = %code, "Applying coupon");

    let mut session = state.db.session().await?;
    let applied = session.coupons().apply_by_code(&code).await?;
    Ok(Json(applied))
}

/// Customers linked to a coupon.
pub async fn coupon_customers(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CouponId>, PathRejection>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let Path(id) = path?;
    let page = page(query)?;
    let mut session = state.db.session().await?;
    let customers = session.links().customers_for_coupon(id, page).await?;
    Ok(Json(customers))
}
