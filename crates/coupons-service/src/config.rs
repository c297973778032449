//! Service configuration.

use std::time::Duration;

use coupons_store::DatabaseConfig;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// `SQLite` database URL (default: "sqlite:coupons.db").
    pub database_url: String,

    /// Maximum pooled database connections (default: 8).
    pub database_max_connections: u32,

    /// Seconds a writer waits on a locked database (default: 5).
    pub database_busy_timeout_seconds: u64,

    /// Log every SQL statement.
    pub database_echo: bool,

    /// Prefix every API route is mounted under (default: "/api/v1").
    pub api_prefix: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
            database_busy_timeout_seconds: parse_env("DATABASE_BUSY_TIMEOUT_SECONDS")
                .unwrap_or(defaults.database_busy_timeout_seconds),
            database_echo: std::env::var("DATABASE_ECHO")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.database_echo),
            api_prefix: std::env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: parse_env("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: parse_env("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// Settings for the store's connection pool.
    #[must_use]
    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            max_connections: self.database_max_connections,
            busy_timeout: Duration::from_secs(self.database_busy_timeout_seconds),
            log_statements: self.database_echo,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_url: "sqlite:coupons.db".into(),
            database_max_connections: 8,
            database_busy_timeout_seconds: 5,
            database_echo: false,
            api_prefix: "/api/v1".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024, // 1MB
            request_timeout_seconds: 30,
        }
    }
}
