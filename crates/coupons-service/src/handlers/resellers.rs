//! Reseller handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use coupons_core::{NewReseller, PageRequest, Reseller, ResellerId, ResellerPatch};

use crate::error::ApiError;
use crate::handlers::page;
use crate::state::AppState;

/// List resellers.
pub async fn list_resellers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<Reseller>>, ApiError> {
    let page = page(query)?;
    let mut session = state.db.session().await?;
    let resellers = session.resellers().get_all(page).await?;
    Ok(Json(resellers))
}

/// Get a reseller by id.
pub async fn get_reseller(
    State(state): State<Arc<AppState>>,
    path: Result<Path<ResellerId>, PathRejection>,
) -> Result<Json<Reseller>, ApiError> {
    let Path(id) = path?;
    let mut session = state.db.session().await?;
    let found = session.resellers().get_by_id(id).await?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("reseller not found: {id}")))
}

/// Create a reseller.
pub async fn create_reseller(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewReseller>, JsonRejection>,
) -> Result<(StatusCode, Json<Reseller>), ApiError> {
    let Json(data) = body?;
    let mut session = state.db.session().await?;
    let reseller = session.resellers().create(data).await?;
    Ok((StatusCode::CREATED, Json(reseller)))
}

/// Partially update a reseller.
pub async fn update_reseller(
    State(state): State<Arc<AppState>>,
    path: Result<Path<ResellerId>, PathRejection>,
    body: Result<Json<ResellerPatch>, JsonRejection>,
) -> Result<Json<Reseller>, ApiError> {
    let Path(id) = path?;
    let Json(patch) = body?;
    let mut session = state.db.session().await?;
    let reseller = session.resellers().update(id, patch).await?;
    Ok(Json(reseller))
}

/// Delete a reseller.
pub async fn delete_reseller(
    State(state): State<Arc<AppState>>,
    path: Result<Path<ResellerId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let mut session = state.db.session().await?;
    session.resellers().delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
