//! Coupons Client SDK.
//!
//! This crate provides a typed client for the coupons HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use coupons_client::{ClientError, CouponsClient};
//!
//! # async fn example() -> Result<(), ClientError> {
//! let client = CouponsClient::new("http://coupons.svc:8080")?;
//!
//! match client.apply_coupon("SAVE2024").await {
//!     Ok(applied) => println!("discount: {} ({})", applied.discount, applied.discount_type),
//!     Err(ClientError::CouponUnavailable { reason, .. }) => println!("refused: {reason}"),
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, CouponsClient};
pub use error::ClientError;
pub use types::HealthResponse;
