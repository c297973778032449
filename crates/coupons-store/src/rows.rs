//! Raw table rows and their conversion into domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use coupons_core::{
    Coupon, CouponCode, CouponCustomerLink, CouponId, Customer, CustomerId, DiscountType, Reseller,
    ResellerId, Username,
};

use crate::error::StoreError;

/// Column list shared by every coupon query.
pub(crate) const COUPON_COLUMNS: &str =
    "id, code, description, discount, discount_type, is_active, valid_from, valid_until, created_at";

/// Same columns qualified with the `c` alias, for joins.
pub(crate) const COUPON_COLUMNS_C: &str = "c.id, c.code, c.description, c.discount, \
     c.discount_type, c.is_active, c.valid_from, c.valid_until, c.created_at";

pub(crate) const CUSTOMER_COLUMNS: &str = "id, username, name, created_at";

pub(crate) const CUSTOMER_COLUMNS_U: &str = "u.id, u.username, u.name, u.created_at";

pub(crate) const RESELLER_COLUMNS: &str = "id, name, created_at";

#[derive(Debug, FromRow)]
pub(crate) struct CouponRow {
    id: i64,
    code: String,
    description: String,
    discount: i64,
    discount_type: String,
    is_active: bool,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = StoreError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CouponId::new(row.id),
            code: CouponCode::parse(row.code).map_err(|e| StoreError::corrupt("coupon", e))?,
            description: row.description,
            discount: row.discount,
            discount_type: row
                .discount_type
                .parse::<DiscountType>()
                .map_err(|e| StoreError::corrupt("coupon", e))?,
            is_active: row.is_active,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CustomerRow {
    id: i64,
    username: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CustomerId::new(row.id),
            username: Username::parse(row.username)
                .map_err(|e| StoreError::corrupt("customer", e))?,
            name: row.name,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ResellerRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<ResellerRow> for Reseller {
    fn from(row: ResellerRow) -> Self {
        Self {
            id: ResellerId::new(row.id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct LinkRow {
    coupon_id: i64,
    customer_id: i64,
}

impl From<LinkRow> for CouponCustomerLink {
    fn from(row: LinkRow) -> Self {
        Self::new(CouponId::new(row.coupon_id), CustomerId::new(row.customer_id))
    }
}

/// Convert a batch of rows, failing on the first invalid one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}
