//! Coupons HTTP API Service.
//!
//! This crate exposes the coupon lifecycle over HTTP:
//!
//! - Coupon CRUD, status and redemption
//! - Customer and reseller catalogs
//! - Coupon–customer links and navigation between both sides
//!
//! Every request acquires its own database session; store errors are mapped
//! to statuses by [`ApiError`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
