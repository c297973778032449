//! Common test utilities for coupons service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

use coupons_service::{create_router, AppState, ServiceConfig};
use coupons_store::Database;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_url: format!("sqlite:{}", temp_dir.path().join("coupons.db").display()),
            ..ServiceConfig::default()
        };

        let db = Database::connect(&config.database())
            .await
            .expect("Failed to open database");
        db.migrate().await.expect("Failed to migrate");

        let state = AppState::new(db, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Create coupons and return the response body.
    pub async fn create_coupons(&self, coupons: Value) -> Value {
        let response = self.server.post("/api/v1/coupons").json(&coupons).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Create a customer and return its id.
    pub async fn create_customer(&self, username: &str, name: &str) -> i64 {
        let response = self
            .server
            .post("/api/v1/customers")
            .json(&json!({ "username": username, "name": name }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().expect("customer id")
    }
}

/// A coupon payload valid from yesterday until tomorrow.
pub fn coupon_json(code: &str, is_active: bool) -> Value {
    coupon_json_window(code, is_active, -Duration::days(1), Duration::days(1))
}

/// A coupon payload with a window relative to now.
pub fn coupon_json_window(code: &str, is_active: bool, from: Duration, until: Duration) -> Value {
    let now = Utc::now();
    json!({
        "code": code,
        "description": "The greatest discount",
        "discount": 42,
        "discount_type": "percentage",
        "is_active": is_active,
        "valid_from": (now + from).to_rfc3339(),
        "valid_until": (now + until).to_rfc3339(),
    })
}
