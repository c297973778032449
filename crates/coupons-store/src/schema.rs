//! Database schema definitions.
//!
//! This module defines the tables used in `SQLite` storage and creates them
//! on startup. Link foreign keys keep the default `NO ACTION`: a coupon or
//! customer that still has link rows cannot be deleted.

use sqlx::SqlitePool;

/// Table names for the `SQLite` database.
pub mod table {
    /// Coupon records, keyed by `id`, unique on `code`.
    pub const COUPONS: &str = "coupons";

    /// Customer records, keyed by `id`, unique on `username`.
    pub const CUSTOMERS: &str = "customers";

    /// Reseller records, keyed by `id`.
    pub const RESELLERS: &str = "resellers";

    /// Coupon–customer association, keyed by `(coupon_id, customer_id)`.
    pub const COUPON_CUSTOMER_LINK: &str = "coupon_customer_link";
}

/// Returns all table names in creation order (referenced tables first).
#[must_use]
pub fn all_tables() -> Vec<&'static str> {
    vec![
        table::COUPONS,
        table::CUSTOMERS,
        table::RESELLERS,
        table::COUPON_CUSTOMER_LINK,
    ]
}

const CREATE_COUPONS: &str = "CREATE TABLE IF NOT EXISTS coupons (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    code          TEXT    NOT NULL UNIQUE
                          CHECK (length(code) = 8 AND code NOT GLOB '*[^A-Z0-9]*'),
    description   TEXT    NOT NULL,
    discount      INTEGER NOT NULL CHECK (discount >= 0),
    discount_type TEXT    NOT NULL CHECK (discount_type IN ('fixed', 'percentage')),
    is_active     INTEGER NOT NULL,
    valid_from    TEXT    NOT NULL,
    valid_until   TEXT    NOT NULL,
    created_at    TEXT    NOT NULL
)";

const CREATE_CUSTOMERS: &str = "CREATE TABLE IF NOT EXISTS customers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT    NOT NULL UNIQUE
                        CHECK (length(username) BETWEEN 5 AND 23
                               AND username GLOB '[a-z0-9]*[a-z0-9]'
                               AND username NOT GLOB '*[^a-z0-9._-]*'),
    name        TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
)";

const CREATE_RESELLERS: &str = "CREATE TABLE IF NOT EXISTS resellers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
)";

const CREATE_COUPON_CUSTOMER_LINK: &str = "CREATE TABLE IF NOT EXISTS coupon_customer_link (
    coupon_id   INTEGER NOT NULL REFERENCES coupons(id),
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    PRIMARY KEY (coupon_id, customer_id)
)";

const CREATE_INDEXES: [&str; 1] = [
    "CREATE INDEX IF NOT EXISTS idx_coupon_customer_link_customer
         ON coupon_customer_link(customer_id)",
];

/// Create all tables and indexes that do not exist yet.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in [
        CREATE_COUPONS,
        CREATE_CUSTOMERS,
        CREATE_RESELLERS,
        CREATE_COUPON_CUSTOMER_LINK,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    for ddl in CREATE_INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::debug!(tables = ?all_tables(), "Schema is up to date");
    Ok(())
}

/// Drop every known table, dependents first.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub async fn drop_all(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for name in all_tables().into_iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {name}"))
            .execute(pool)
            .await?;
    }

    tracing::info!("Dropped all tables");
    Ok(())
}
