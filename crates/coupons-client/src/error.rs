//! Client error types.

use coupons_core::Unavailable;

/// Errors that can occur when using the coupons client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response that has no dedicated variant.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The addressed record does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Server message naming the record.
        message: String,
    },

    /// The service could not commit the write.
    #[error("commit failed: {message}")]
    CommitFailed {
        /// Server message.
        message: String,
        /// Whether retrying the same call could succeed.
        retryable: bool,
    },

    /// The coupon cannot be redeemed.
    #[error("coupon unavailable: {message}")]
    CouponUnavailable {
        /// Why redemption was refused.
        reason: Unavailable,
        /// Server message.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
