//! API error types and responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use coupons_core::{FieldError, Unavailable};
use coupons_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store rejected the write or could not be reached.
    #[error("commit failed: {message}")]
    CommitFailed {
        /// What went wrong.
        message: String,
        /// Whether retrying the request could succeed.
        retryable: bool,
    },

    /// The coupon cannot be redeemed.
    #[error("coupon unavailable: {message}")]
    CouponUnavailable {
        /// Why redemption was refused.
        reason: Unavailable,
        /// Human-readable description.
        message: String,
    },

    /// The request is well-formed but its content is invalid.
    #[error("unprocessable entity: {0}")]
    Unprocessable(String),

    /// Bad request - the body could not be read at all.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            Self::CommitFailed { message, retryable } => (
                StatusCode::BAD_REQUEST,
                "commit_failed",
                message,
                Some(serde_json::json!({ "retryable": retryable })),
            ),
            Self::CouponUnavailable { reason, message } => (
                StatusCode::FORBIDDEN,
                "coupon_unavailable",
                message,
                Some(serde_json::json!({ "reason": reason })),
            ),
            Self::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable_entity",
                msg,
                None,
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let retryable = err.is_retryable();
        match err {
            StoreError::NotFound { entity, key } => {
                Self::NotFound(format!("{entity} not found: {key}"))
            }
            StoreError::CommitFailed {
                reason,
                context,
                source,
            } => {
                tracing::warn!(reason = ?reason, error = %source, "{context}");
                Self::CommitFailed {
                    message: format!("{context}: {source}"),
                    retryable,
                }
            }
            StoreError::ValidationFailed { reason, message } => {
                Self::CouponUnavailable { reason, message }
            }
        }
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        Self::Unprocessable(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => Self::Unprocessable(err.body_text()),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Unprocessable(rejection.body_text())
    }
}
