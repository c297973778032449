//! Connection pool and per-operation sessions.

use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{ConnectOptions, Sqlite};

use crate::coupons::CouponStore;
use crate::customers::CustomerStore;
use crate::error::{Result, StoreError};
use crate::links::LinkStore;
use crate::resellers::ResellerStore;
use crate::schema;

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `SQLite` URL, e.g. `sqlite:coupons.db` or `sqlite::memory:`.
    pub url: String,

    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// How long a writer waits for a competing writer before giving up.
    pub busy_timeout: Duration,

    /// Log every SQL statement (at debug level).
    pub log_statements: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:coupons.db".into(),
            max_connections: 8,
            busy_timeout: Duration::from_secs(5),
            log_statements: false,
        }
    }
}

impl DatabaseConfig {
    /// Settings for a database file at `url` with the remaining defaults.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Handle to the coupons database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database described by `config`.
    ///
    /// Every connection enforces foreign keys and runs in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the database cannot be opened.
    pub async fn connect(config: &DatabaseConfig) -> std::result::Result<Self, sqlx::Error> {
        let mut options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        if !config.log_statements {
            options = options.disable_statement_logging();
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Database pool initialized"
        );

        Ok(Self { pool })
    }

    /// Create missing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::Error> {
        schema::migrate(&self.pool).await
    }

    /// Drop every table.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn drop_all(&self) -> std::result::Result<(), sqlx::Error> {
        schema::drop_all(&self.pool).await
    }

    /// Check that the database answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe query fails.
    pub async fn ping(&self) -> std::result::Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Obtain a session for one externally-initiated operation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CommitFailed` if no connection can be acquired.
    pub async fn session(&self) -> Result<Session> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(StoreError::commit("failed to acquire a database session"))?;
        Ok(Session { conn })
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A connection held for the lifetime of one operation.
///
/// Stores borrow the session mutably, so one session serves one store call at
/// a time. Mutating calls open their own transaction on it and commit once.
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Session {
    /// Coupon store and redemption engine bound to this session.
    pub fn coupons(&mut self) -> CouponStore<'_> {
        CouponStore::new(&mut self.conn)
    }

    /// Customer store bound to this session.
    pub fn customers(&mut self) -> CustomerStore<'_> {
        CustomerStore::new(&mut self.conn)
    }

    /// Reseller store bound to this session.
    pub fn resellers(&mut self) -> ResellerStore<'_> {
        ResellerStore::new(&mut self.conn)
    }

    /// Coupon–customer association manager bound to this session.
    pub fn links(&mut self) -> LinkStore<'_> {
        LinkStore::new(&mut self.conn)
    }
}
