//! Customer handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use coupons_core::{Coupon, Customer, CustomerId, CustomerPatch, NewCustomer, PageRequest};

use crate::error::ApiError;
use crate::handlers::page;
use crate::state::AppState;

/// List customers.
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let page = page(query)?;
    let mut session = state.db.session().await?;
    let customers = session.customers().get_all(page).await?;
    Ok(Json(customers))
}

/// Get a customer by id.
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CustomerId>, PathRejection>,
) -> Result<Json<Customer>, ApiError> {
    let Path(id) = path?;
    let mut session = state.db.session().await?;
    let found = session.customers().get_by_id(id).await?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("customer not found: {id}")))
}

/// Create a customer.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let Json(data) = body?;
    let mut session = state.db.session().await?;
    let customer = session.customers().create(data).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Partially update a customer.
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CustomerId>, PathRejection>,
    body: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    let Path(id) = path?;
    let Json(patch) = body?;
    let mut session = state.db.session().await?;
    let customer = session.customers().update(id, patch).await?;
    Ok(Json(customer))
}

/// Delete a customer.
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CustomerId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let mut session = state.db.session().await?;
    session.customers().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Coupons linked to a customer.
pub async fn customer_coupons(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CustomerId>, PathRejection>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<Coupon>>, ApiError> {
    let Path(id) = path?;
    let page = page(query)?;
    let mut session = state.db.session().await?;
    let coupons = session.links().coupons_for_customer(id, page).await?;
    Ok(Json(coupons))
}
