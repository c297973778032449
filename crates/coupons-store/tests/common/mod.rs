//! Common test utilities for store integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

use coupons_core::{CouponCode, DiscountType, NewCoupon, NewCustomer, Username};
use coupons_store::{Database, DatabaseConfig};

/// A migrated database in a temporary directory.
pub struct TestDb {
    /// The database handle.
    pub db: Database,
    /// Temporary directory for the database file (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestDb {
    /// Create a fresh, migrated database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let url = format!("sqlite:{}", temp_dir.path().join("coupons.db").display());

        let db = Database::connect(&DatabaseConfig::with_url(url))
            .await
            .expect("Failed to open database");
        db.migrate().await.expect("Failed to migrate");

        Self {
            db,
            _temp_dir: temp_dir,
        }
    }
}

/// A coupon whose window is `[now + from, now + until)`.
pub fn coupon(code: &str, is_active: bool, from: Duration, until: Duration) -> NewCoupon {
    let now = Utc::now();
    coupon_between(code, is_active, now + from, now + until)
}

/// A coupon with an explicit window.
pub fn coupon_between(
    code: &str,
    is_active: bool,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
) -> NewCoupon {
    NewCoupon {
        code: CouponCode::parse(code).expect("valid test code"),
        description: "The greatest discount".into(),
        discount: 42,
        discount_type: DiscountType::Percentage,
        is_active,
        valid_from,
        valid_until,
    }
}

/// An active coupon valid from yesterday until tomorrow.
pub fn valid_coupon(code: &str) -> NewCoupon {
    coupon(code, true, -Duration::days(1), Duration::days(1))
}

/// A customer payload.
pub fn customer(username: &str, name: &str) -> NewCustomer {
    NewCustomer {
        username: Username::parse(username).expect("valid test username"),
        name: name.into(),
    }
}
