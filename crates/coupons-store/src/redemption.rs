//! Redemption state machine.
//!
//! A coupon moves `active + valid -> inactive` exactly once and never back.
//! The deactivation is a conditional write guarded by `is_active = 1` and the
//! validity window, so of two concurrent redemptions of the same code only one
//! sees an affected row, and a window moved by a concurrent update is honored.

use chrono::{DateTime, Utc};
use sqlx::Connection;

use coupons_core::{CouponApplied, CouponId, Unavailable};

use crate::coupons::{CouponStore, ENTITY};
use crate::error::{Result, StoreError};

const CONTEXT: &str = "failed to apply the coupon";

impl CouponStore<'_> {
    /// Redeem the coupon identified by `code`.
    ///
    /// Returns the discount the coupon grants.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no coupon has this code.
    /// - `StoreError::ValidationFailed` if the coupon is inactive, not valid
    ///   yet, expired, or was consumed by a concurrent call.
    /// - `StoreError::CommitFailed` if the write cannot commit.
    pub async fn apply_by_code(&mut self, code: &str) -> Result<CouponApplied> {
        let now = Utc::now();
        let coupon = self
            .get_by_code(code)
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY, code))?;

        if let Some(reason) = coupon.unavailable_at(now) {
            tracing::info!(code = %code, reason = ?reason, "Coupon redemption refused");
            return Err(StoreError::unavailable(code, reason));
        }

        if !self.consume(coupon.id, now).await? {
            // Someone changed the row since the read; report its current state.
            let reason = self
                .get_by_code(code)
                .await?
                .ok_or_else(|| StoreError::not_found(ENTITY, code))?
                .unavailable_at(now)
                .unwrap_or(Unavailable::Inactive);
            tracing::info!(code = %code, reason = ?reason, "Coupon changed by a concurrent call");
            return Err(StoreError::unavailable(code, reason));
        }

        tracing::info!(
            coupon_id = %coupon.id,
            code = %code,
            discount = coupon.discount,
            discount_type = %coupon.discount_type,
            "Coupon redeemed"
        );
        Ok(coupon.applied())
    }

    /// Deactivate the coupon if it is still active and valid at `now`.
    ///
    /// Returns whether this call consumed it.
    pub(crate) async fn consume(&mut self, id: CouponId, now: DateTime<Utc>) -> Result<bool> {
        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let consumed = sqlx::query(
            "UPDATE coupons SET is_active = 0 \
             WHERE id = ? AND is_active = 1 AND valid_from <= ? AND valid_until > ?",
        )
        .bind(id.get())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::commit(CONTEXT))?
        .rows_affected();

        if consumed == 0 {
            return Ok(false);
        }

        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;
        Ok(true)
    }
}
