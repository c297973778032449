//! Core types for the coupons service.
//!
//! This crate provides the foundational types shared by the store, the HTTP
//! boundary and the client SDK:
//!
//! - **Identifiers**: `CouponId`, `CustomerId`, `ResellerId`
//! - **Coupons**: `Coupon`, `NewCoupon`, `CouponPatch`, `CouponStatus`, `CouponApplied`
//! - **Customers / resellers**: `Customer`, `Reseller` and their create/patch payloads
//! - **Links**: `CouponCustomerLink`
//! - **Partial updates**: `Patch<T>`
//!
//! # Validity window
//!
//! A coupon is temporally valid inside the half-open interval
//! `[valid_from, valid_until)`. Validity is never stored; it is evaluated
//! against the instant of the call (see [`Coupon::status_at`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coupon;
pub mod customer;
pub mod error;
pub mod ids;
pub mod link;
pub mod pagination;
pub mod patch;
pub mod reseller;

pub use coupon::{
    Coupon, CouponApplied, CouponCode, CouponPatch, CouponStatus, DiscountType, NewCoupon,
    Unavailable, COUPON_CODE_LEN,
};
pub use customer::{Customer, CustomerPatch, NewCustomer, Username};
pub use error::FieldError;
pub use ids::{CouponId, CustomerId, ResellerId};
pub use link::CouponCustomerLink;
pub use pagination::{PageRequest, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use patch::Patch;
pub use reseller::{NewReseller, Reseller, ResellerPatch};
