//! Coupon store and validity engine.
//!
//! Validity is never persisted: [`CouponStore::status_by_id`] evaluates the
//! window `[valid_from, valid_until)` against the instant of the call.

use chrono::Utc;
use sqlx::{Connection, QueryBuilder, Sqlite, SqliteConnection};

use coupons_core::{Coupon, CouponId, CouponPatch, CouponStatus, NewCoupon, Patch, PageRequest};

use crate::error::{Result, StoreError};
use crate::rows::{convert_all, CouponRow, COUPON_COLUMNS};

pub(crate) const ENTITY: &str = "coupon";

/// Coupon operations bound to one session.
pub struct CouponStore<'s> {
    pub(crate) conn: &'s mut SqliteConnection,
}

impl<'s> CouponStore<'s> {
    /// Bind the store to a connection.
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Persist a batch of coupons in one transaction.
    ///
    /// Either every coupon is stored or none is. Returns the created coupons
    /// in input order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if any item violates a constraint
    /// (e.g. a duplicate code) or the commit fails.
    pub async fn create_many(&mut self, items: Vec<NewCoupon>) -> Result<Vec<Coupon>> {
        const CONTEXT: &str = "failed to create the coupons";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let now = Utc::now();
        let mut created = Vec::with_capacity(items.len());

        for item in items {
            if item.has_empty_window() {
                tracing::warn!(
                    code = %item.code,
                    valid_from = %item.valid_from,
                    valid_until = %item.valid_until,
                    "Coupon window is empty; it will never be valid"
                );
            }

            let row: CouponRow = sqlx::query_as(&format!(
                "INSERT INTO coupons \
                 (code, description, discount, discount_type, is_active, valid_from, valid_until, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COUPON_COLUMNS}"
            ))
            .bind(item.code.as_str())
            .bind(&item.description)
            .bind(item.discount)
            .bind(item.discount_type.as_str())
            .bind(item.is_active)
            .bind(item.valid_from)
            .bind(item.valid_until)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::commit(CONTEXT))?;

            created.push(Coupon::try_from(row)?);
        }

        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(count = created.len(), "Coupons created");
        Ok(created)
    }

    /// Look up a coupon by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_by_id(&mut self, id: CouponId) -> Result<Option<Coupon>> {
        let row: Option<CouponRow> =
            sqlx::query_as(&format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&mut *self.conn)
                .await
                .map_err(StoreError::commit("failed to read the coupon"))?;

        row.map(Coupon::try_from).transpose()
    }

    /// Look up a coupon by its code.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_by_code(&mut self, code: &str) -> Result<Option<Coupon>> {
        let row: Option<CouponRow> =
            sqlx::query_as(&format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE code = ?"))
                .bind(code)
                .fetch_optional(&mut *self.conn)
                .await
                .map_err(StoreError::commit("failed to read the coupon"))?;

        row.map(Coupon::try_from).transpose()
    }

    /// List coupons in row order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_all(&mut self, page: PageRequest) -> Result<Vec<Coupon>> {
        let rows: Vec<CouponRow> = sqlx::query_as(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to list the coupons"))?;

        convert_all(rows)
    }

    /// Apply the fields present in `patch` and return the refreshed coupon.
    ///
    /// An empty patch writes nothing.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the coupon doesn't exist.
    /// - `StoreError::CommitFailed` if a constraint is violated or the commit fails.
    pub async fn update(&mut self, id: CouponId, patch: CouponPatch) -> Result<Coupon> {
        const CONTEXT: &str = "failed to update the coupon";

        if patch.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| StoreError::not_found(ENTITY, id));
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE coupons SET ");
        {
            let mut set = builder.separated(", ");
            if let Patch::Set(description) = patch.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Patch::Set(discount) = patch.discount {
                set.push("discount = ").push_bind_unseparated(discount);
            }
            if let Patch::Set(valid_from) = patch.valid_from {
                set.push("valid_from = ").push_bind_unseparated(valid_from);
            }
            if let Patch::Set(valid_until) = patch.valid_until {
                set.push("valid_until = ").push_bind_unseparated(valid_until);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id.get())
            .push(" RETURNING ")
            .push(COUPON_COLUMNS);

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let row: Option<CouponRow> = builder
            .build_query_as()
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::commit(CONTEXT))?;
        let coupon = Coupon::try_from(row.ok_or_else(|| StoreError::not_found(ENTITY, id))?)?;
        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        if coupon.has_empty_window() {
            tracing::warn!(coupon_id = %id, "Coupon window is empty after update");
        }
        tracing::info!(coupon_id = %id, "Coupon updated");
        Ok(coupon)
    }

    /// Delete a coupon.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the coupon doesn't exist.
    /// - `StoreError::CommitFailed` if the delete cannot commit, including
    ///   when link rows still reference the coupon.
    pub async fn delete_by_id(&mut self, id: CouponId) -> Result<()> {
        const CONTEXT: &str = "failed to delete the coupon";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let deleted = sqlx::query("DELETE FROM coupons WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::commit(CONTEXT))?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::not_found(ENTITY, id));
        }

        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(coupon_id = %id, "Coupon deleted");
        Ok(())
    }

    /// Current `{is_active, is_valid}` of a coupon, evaluated now.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the coupon doesn't exist.
    pub async fn status_by_id(&mut self, id: CouponId) -> Result<CouponStatus> {
        let coupon = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        Ok(coupon.status_at(Utc::now()))
    }
}
