//! `SQLite` storage layer for the coupons service.
//!
//! This crate persists coupons, customers, resellers and the coupon–customer
//! association, and implements the coupon lifecycle on top of them.
//!
//! # Architecture
//!
//! The storage uses the following tables:
//!
//! - `coupons`: coupon records, unique on `code`
//! - `customers`: customer records, unique on `username`
//! - `resellers`: standalone reseller catalog
//! - `coupon_customer_link`: composite-keyed association, foreign keys restrict deletes
//!
//! Callers obtain one [`Session`] per operation from a [`Database`], bind a
//! store to it and invoke one operation. Mutating operations run in a single
//! transaction; an error drops the transaction and rolls everything back.
//!
//! # Example
//!
//! ```no_run
//! use coupons_store::{Database, DatabaseConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect(&DatabaseConfig::with_url("sqlite:coupons.db")).await?;
//! db.migrate().await?;
//!
//! let mut session = db.session().await?;
//! let applied = session.coupons().apply_by_code("SAVE2024").await?;
//! println!("discount: {} ({})", applied.discount, applied.discount_type);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coupons;
pub mod customers;
pub mod database;
pub mod error;
pub mod links;
mod redemption;
pub mod resellers;
mod rows;
pub mod schema;

pub use coupons::CouponStore;
pub use customers::CustomerStore;
pub use database::{Database, DatabaseConfig, Session};
pub use error::{CommitFailure, Result, StoreError};
pub use links::LinkStore;
pub use resellers::ResellerStore;
