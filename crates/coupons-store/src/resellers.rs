//! Reseller store. Resellers are not referenced by any other table.

use chrono::Utc;
use sqlx::{Connection, SqliteConnection};

use coupons_core::{NewReseller, PageRequest, Patch, Reseller, ResellerId, ResellerPatch};

use crate::error::{Result, StoreError};
use crate::rows::{ResellerRow, RESELLER_COLUMNS};

const ENTITY: &str = "reseller";

/// Reseller operations bound to one session.
pub struct ResellerStore<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> ResellerStore<'s> {
    /// Bind the store to a connection.
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Create a reseller.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the commit fails.
    pub async fn create(&mut self, data: NewReseller) -> Result<Reseller> {
        const CONTEXT: &str = "failed to create the reseller";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let row: ResellerRow = sqlx::query_as(&format!(
            "INSERT INTO resellers (name, created_at) VALUES (?, ?) RETURNING {RESELLER_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::commit(CONTEXT))?;
        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        let reseller = Reseller::from(row);
        tracing::info!(reseller_id = %reseller.id, "Reseller created");
        Ok(reseller)
    }

    /// Look up a reseller by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_by_id(&mut self, id: ResellerId) -> Result<Option<Reseller>> {
        let row: Option<ResellerRow> =
            sqlx::query_as(&format!("SELECT {RESELLER_COLUMNS} FROM resellers WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&mut *self.conn)
                .await
                .map_err(StoreError::commit("failed to read the reseller"))?;

        Ok(row.map(Reseller::from))
    }

    /// List resellers in row order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if the query fails.
    pub async fn get_all(&mut self, page: PageRequest) -> Result<Vec<Reseller>> {
        let rows: Vec<ResellerRow> = sqlx::query_as(&format!(
            "SELECT {RESELLER_COLUMNS} FROM resellers ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&mut *self.conn)
        .await
        .map_err(StoreError::commit("failed to list the resellers"))?;

        Ok(rows.into_iter().map(Reseller::from).collect())
    }

    /// Apply the fields present in `patch` and return the refreshed reseller.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the reseller doesn't exist.
    /// - `StoreError::CommitFailed` if the commit fails.
    pub async fn update(&mut self, id: ResellerId, patch: ResellerPatch) -> Result<Reseller> {
        const CONTEXT: &str = "failed to update the reseller";

        let Patch::Set(name) = patch.name else {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| StoreError::not_found(ENTITY, id));
        };

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let row: Option<ResellerRow> = sqlx::query_as(&format!(
            "UPDATE resellers SET name = ? WHERE id = ? RETURNING {RESELLER_COLUMNS}"
        ))
        .bind(name)
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::commit(CONTEXT))?;
        let row = row.ok_or_else(|| StoreError::not_found(ENTITY, id))?;
        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(reseller_id = %id, "Reseller updated");
        Ok(Reseller::from(row))
    }

    /// Delete a reseller.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the reseller doesn't exist.
    /// - `StoreError::CommitFailed` if the delete cannot commit.
    pub async fn delete_by_id(&mut self, id: ResellerId) -> Result<()> {
        const CONTEXT: &str = "failed to delete the reseller";

        let mut tx = self.conn.begin().await.map_err(StoreError::commit(CONTEXT))?;
        let deleted = sqlx::query("DELETE FROM resellers WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::commit(CONTEXT))?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::not_found(ENTITY, id));
        }

        tx.commit().await.map_err(StoreError::commit(CONTEXT))?;

        tracing::info!(reseller_id = %id, "Reseller deleted");
        Ok(())
    }
}
