//! Coupon–customer association.

use serde::{Deserialize, Serialize};

use crate::ids::{CouponId, CustomerId};

/// A link row keyed by `(coupon_id, customer_id)`.
///
/// Links record eligibility/ownership only. Redemption neither creates nor
/// removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CouponCustomerLink {
    /// The linked coupon.
    pub coupon_id: CouponId,
    /// The linked customer.
    pub customer_id: CustomerId,
}

impl CouponCustomerLink {
    /// Build a link from its two keys.
    #[must_use]
    pub const fn new(coupon_id: CouponId, customer_id: CustomerId) -> Self {
        Self {
            coupon_id,
            customer_id,
        }
    }
}
