//! Coupon types and the validity window rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;
use crate::ids::CouponId;
use crate::patch::Patch;

/// Length of every coupon code.
pub const COUPON_CODE_LEN: usize = 8;

/// A human-readable coupon code: exactly 8 characters of `A-Z` / `0-9`.
///
/// Codes are unique across all coupons and immutable after creation.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Validate and wrap a coupon code.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::InvalidCouponCode` if the input is not exactly
    /// 8 uppercase ASCII letters or digits.
    pub fn parse(code: impl Into<String>) -> Result<Self, FieldError> {
        let code = code.into();
        let valid = code.len() == COUPON_CODE_LEN
            && code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if valid {
            Ok(Self(code))
        } else {
            Err(FieldError::InvalidCouponCode(code))
        }
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CouponCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

impl fmt::Debug for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CouponCode({})", self.0)
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the discount magnitude is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// A fixed amount off.
    Fixed,
    /// A percentage off.
    Percentage,
}

impl DiscountType {
    /// The lowercase name used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
        }
    }
}

impl FromStr for DiscountType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "percentage" => Ok(Self::Percentage),
            other => Err(FieldError::InvalidDiscountType(other.to_string())),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Store-assigned surrogate key.
    pub id: CouponId,
    /// Unique human-readable code.
    pub code: CouponCode,
    /// Free-form description.
    pub description: String,
    /// Discount magnitude.
    pub discount: i64,
    /// How `discount` is interpreted.
    pub discount_type: DiscountType,
    /// Consumable flag; cleared by redemption and never set again.
    pub is_active: bool,
    /// Start of the validity window (inclusive).
    pub valid_from: DateTime<Utc>,
    /// End of the validity window (exclusive).
    pub valid_until: DateTime<Utc>,
    /// Creation timestamp, assigned by the store.
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether `now` lies inside `[valid_from, valid_until)`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && now < self.valid_until
    }

    /// Compute the status of the coupon at `now`.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> CouponStatus {
        CouponStatus {
            is_active: self.is_active,
            is_valid: self.is_valid_at(now),
        }
    }

    /// Why the coupon cannot be redeemed at `now`, or `None` if it can.
    ///
    /// An inactive coupon reports `Inactive` regardless of its window.
    #[must_use]
    pub fn unavailable_at(&self, now: DateTime<Utc>) -> Option<Unavailable> {
        if !self.is_active {
            Some(Unavailable::Inactive)
        } else if now < self.valid_from {
            Some(Unavailable::NotYetValid)
        } else if now >= self.valid_until {
            Some(Unavailable::Expired)
        } else {
            None
        }
    }

    /// What redeeming this coupon earns.
    #[must_use]
    pub fn applied(&self) -> CouponApplied {
        CouponApplied {
            discount: self.discount,
            discount_type: self.discount_type,
        }
    }

    /// Whether the window can never contain any instant.
    #[must_use]
    pub fn has_empty_window(&self) -> bool {
        self.valid_from >= self.valid_until
    }
}

/// Payload for creating a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCoupon {
    /// Unique code.
    pub code: CouponCode,
    /// Description.
    pub description: String,
    /// Discount magnitude.
    pub discount: i64,
    /// Discount type.
    pub discount_type: DiscountType,
    /// Initial value of the consumable flag.
    pub is_active: bool,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window.
    pub valid_until: DateTime<Utc>,
}

impl NewCoupon {
    /// Whether the window can never contain any instant.
    #[must_use]
    pub fn has_empty_window(&self) -> bool {
        self.valid_from >= self.valid_until
    }
}

/// Partial update of a coupon. `code` and `is_active` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CouponPatch {
    /// New description.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    /// New discount magnitude.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub discount: Patch<i64>,
    /// New window start.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub valid_from: Patch<DateTime<Utc>>,
    /// New window end.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub valid_until: Patch<DateTime<Utc>>,
}

impl CouponPatch {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_absent()
            && self.discount.is_absent()
            && self.valid_from.is_absent()
            && self.valid_until.is_absent()
    }
}

/// Point-in-time status of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponStatus {
    /// The consumable flag.
    pub is_active: bool,
    /// Whether the evaluation instant lies inside the validity window.
    pub is_valid: bool,
}

/// The discount earned by a redeemed coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponApplied {
    /// Discount magnitude.
    pub discount: i64,
    /// Discount type.
    pub discount_type: DiscountType,
}

/// Reason a coupon could not be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// Already consumed or created inactive.
    Inactive,
    /// The window has not started.
    NotYetValid,
    /// The window is over.
    Expired,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inactive => "coupon is not active",
            Self::NotYetValid => "coupon is not valid yet",
            Self::Expired => "coupon has expired",
        })
    }
}
