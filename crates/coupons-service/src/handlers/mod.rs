//! API handlers.

pub mod coupons;
pub mod customers;
pub mod health;
pub mod links;
pub mod resellers;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;

use coupons_core::PageRequest;

use crate::error::ApiError;

/// Validate the `offset`/`limit` query of a list endpoint.
pub(crate) fn page(query: Result<Query<PageRequest>, QueryRejection>) -> Result<PageRequest, ApiError> {
    let Query(page) = query?;
    Ok(page.checked()?)
}
