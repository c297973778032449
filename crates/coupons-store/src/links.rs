//! Coupon–customer association manager.
//!
//! Guards the `coupon_customer_link` table. Referential integrity is enforced
//! by the schema's foreign keys; this store never touches coupon or customer
//! rows. Navigation between the two sides is an explicit join.

use sqlx::{Connection, SqliteConnection};

use coupons_core::{Coupon, CouponCustomerLink, CouponId, Customer, CustomerId, PageRequest};

use crate::coupons;
use crate::customers;
use crate::error::{Result, StoreError};
use crate::rows::{
    convert_all, CouponRow, CustomerRow, LinkRow, COUPON_COLUMNS_C, CUSTOMER_COLUMNS_U,
};

const ENTITY: &str = "link";

/// Link operations bound to one session.
pub struct LinkStore<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> LinkStore<'s> {
    /// Bind the store to a connection.
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Link a coupon to a customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the pair is already linked, if
    /// either id does not resolve, or if the commit fails.
    pub async fn create(&mut self, link: CouponCustomerLink) -> Result<CouponCustomerLink> {
        const CONTEXT: &str = "failed to create the link";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        sqlx::query("INSERT INTO coupon_customer_link (coupon_id, customer_id) VALUES (?, ?)")
            .bind(link.coupon_id.get())
            .bind(link.customer_id.get())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::commit(CONTEXT))?;
        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(
            coupon_id = %link.coupon_id,
            customer_id = %link.customer_id,
            "Link created"
        );
        Ok(link)
    }

    /// Look up a link by its composite key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_by_ids(
        &mut self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> Result<Option<CouponCustomerLink>> {
        let row: Option<LinkRow> = sqlx::query_as(
            "SELECT coupon_id, customer_id FROM coupon_customer_link \
             WHERE coupon_id = ? AND customer_id = ?",
        )
        .bind(coupon_id.get())
        .bind(customer_id.get())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to read the link"))?;

        Ok(row.map(CouponCustomerLink::from))
    }

    /// List links in row order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_all(&mut self, page: PageRequest) -> Result<Vec<CouponCustomerLink>> {
        let rows: Vec<LinkRow> = sqlx::query_as(
            "SELECT coupon_id, customer_id FROM coupon_customer_link \
             ORDER BY rowid LIMIT ? OFFSET ?",
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to list the links"))?;

        Ok(rows.into_iter().map(CouponCustomerLink::from).collect())
    }

    /// Remove a link.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the pair is not linked.
    /// - `StoreError::CommitFailed` if the delete cannot commit.
    pub async fn delete_by_ids(&mut self, coupon_id: CouponId, customer_id: CustomerId) -> Result<()> {
        const CONTEXT: &str = "failed to delete the link";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let deleted = sqlx::query(
            "DELETE FROM coupon_customer_link WHERE coupon_id = ? AND customer_id = ?",
        )
        .bind(coupon_id.get())
        .bind(customer_id.get())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::commit(CONTEXT))?
        .rows_affected();

        if deleted == 0 {
            return Err(StoreError::not_found(
                ENTITY,
                format!("{coupon_id}-{customer_id}"),
            ));
        }

        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(coupon_id = %coupon_id, customer_id = %customer_id, "Link deleted");
        Ok(())
    }

    /// Coupons linked to a customer, in coupon id order.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the customer doesn't exist.
    /// - `StoreError::CommitFailed` if the query fails.
    pub async fn coupons_for_customer(
        &mut self,
        customer_id: CustomerId,
        page: PageRequest,
    ) -> Result<Vec<Coupon>> {
        if !self.exists("customers", customer_id.get()).await? {
            return Err(StoreError::not_found(customers::ENTITY, customer_id));
        }

        let rows: Vec<CouponRow> = sqlx::query_as(&format!(
            "SELECT {COUPON_COLUMNS_C} FROM coupons c \
             JOIN coupon_customer_link l ON l.coupon_id = c.id \
             WHERE l.customer_id = ? ORDER BY c.id LIMIT ? OFFSET ?"
        ))
        .bind(customer_id.get())
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to list the customer's coupons"))?;

        convert_all(rows)
    }

    /// Customers linked to a coupon, in customer id order.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the coupon doesn't exist.
    /// - `StoreError::CommitFailed` if the query fails.
    pub async fn customers_for_coupon(
        &mut self,
        coupon_id: CouponId,
        page: PageRequest,
    ) -> Result<Vec<Customer>> {
        if !self.exists("coupons", coupon_id.get()).await? {
            return Err(StoreError::not_found(coupons::ENTITY, coupon_id));
        }

        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS_U} FROM customers u \
             JOIN coupon_customer_link l ON l.customer_id = u.id \
             WHERE l.coupon_id = ? ORDER BY u.id LIMIT ? OFFSET ?"
        ))
        .bind(coupon_id.get())
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to list the coupon's customers"))?;

        convert_all(rows)
    }

    async fn exists(&mut self, table: &'static str, id: i64) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)"
        ))
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to read the link target"))?;

        Ok(found != 0)
    }
}
