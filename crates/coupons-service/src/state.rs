//! Application state.

use coupons_store::Database;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The database handle; handlers open one session per request.
    pub db: Database,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(db: Database, config: ServiceConfig) -> Self {
        Self { db, config }
    }
}
