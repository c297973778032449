//! Customer store.

use chrono::Utc;
use sqlx::{Connection, SqliteConnection};

use coupons_core::{Customer, CustomerId, CustomerPatch, NewCustomer, PageRequest, Patch};

use crate::error::{Result, StoreError};
use crate::rows::{convert_all, CustomerRow, CUSTOMER_COLUMNS};

pub(crate) const ENTITY: &str = "customer";

/// Customer operations bound to one session.
pub struct CustomerStore<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> CustomerStore<'s> {
    /// Bind the store to a connection.
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the username is taken or the commit fails.
    pub async fn create(&mut self, data: NewCustomer) -> Result<Customer> {
        const CONTEXT: &str = "failed to create the customer";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let row: CustomerRow = sqlx::query_as(&format!(
            "INSERT INTO customers (username, name, created_at) VALUES (?, ?, ?) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(data.username.as_str())
        .bind(&data.name)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::commit(CONTEXT))?;
        let customer = Customer::try_from(row)?;
        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(customer_id = %customer.id, username = %customer.username, "Customer created");
        Ok(customer)
    }

    /// Look up a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_by_id(&mut self, id: CustomerId) -> Result<Option<Customer>> {
        let row: Option<CustomerRow> =
            sqlx::query_as(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&mut *self.conn)
                .await
                .map_err(StoreError::commit("failed to read the customer"))?;

        row.map(Customer::try_from).transpose()
    }

    /// List customers in row order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_all(&mut self, page: PageRequest) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to list the customers"))?;

        convert_all(rows)
    }

    /// Apply the fields present in `patch` and return the refreshed customer.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the customer doesn't exist.
    /// - `StoreError::CommitFailed` if the commit fails.
    pub async fn update(&mut self, id: CustomerId, patch: CustomerPatch) -> Result<Customer> {
        const CONTEXT: &str = "failed to update the customer";

        let Patch::Set(name) = patch.name else {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| StoreError::not_found(ENTITY, id));
        };

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "UPDATE customers SET name = ? WHERE id = ? RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(name)
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::commit(CONTEXT))?;
        let customer = Customer::try_from(row.ok_or_else(|| StoreError::not_found(ENTITY, id))?)?;
        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(customer_id = %id, "Customer updated");
        Ok(customer)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the customer doesn't exist.
    /// - `StoreError::CommitFailed` if the delete cannot commit, including
    ///   when link rows still reference the customer.
    pub async fn delete_by_id(&mut self, id: CustomerId) -> Result<()> {
        const CONTEXT: &str = "failed to delete the customer";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let deleted = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::commit(CONTEXT))?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::not_found(ENTITY, id));
        }

        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}
