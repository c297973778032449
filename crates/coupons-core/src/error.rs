//! Error types for coupons field validation.

/// Errors raised when a value does not satisfy a field constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The input is not a valid integer identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The coupon code is not 8 uppercase alphanumeric characters.
    #[error("invalid coupon code: {0:?} (expected 8 characters of A-Z, 0-9)")]
    InvalidCouponCode(String),

    /// The username does not match the allowed pattern.
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    /// Unknown discount type.
    #[error("invalid discount type: {0:?} (expected \"fixed\" or \"percentage\")")]
    InvalidDiscountType(String),

    /// Requested page size exceeds the allowed maximum.
    #[error("limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge {
        /// The requested limit.
        limit: u32,
        /// The maximum allowed limit.
        max: u32,
    },
}
