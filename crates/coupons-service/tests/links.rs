//! Coupon–customer link endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::{coupon_json, TestHarness};
use serde_json::{json, Value};

async fn seed(harness: &TestHarness) -> (i64, i64) {
    let coupons = harness.create_coupons(json!([coupon_json("LINKME01", true)])).await;
    let coupon_id = coupons[0]["id"].as_i64().unwrap();
    let customer_id = harness.create_customer("alice01", "Alice").await;
    (coupon_id, customer_id)
}

#[tokio::test]
async fn link_lifecycle() {
    let harness = TestHarness::new().await;
    let (coupon_id, customer_id) = seed(&harness).await;
    let link = json!({ "coupon_id": coupon_id, "customer_id": customer_id });

    let response = harness
        .server
        .post("/api/v1/coupon-customer-link")
        .json(&link)
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>(), link);

    let path = format!("/api/v1/coupon-customer-link/{coupon_id}/{customer_id}");
    let response = harness.server.get(&path).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), link);

    let list: Value = harness.server.get("/api/v1/coupon-customer-link").await.json();
    assert_eq!(list, json!([link]));

    harness
        .server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    harness.server.get(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn link_to_missing_coupon_is_commit_failed() {
    let harness = TestHarness::new().await;
    let (_, customer_id) = seed(&harness).await;

    let response = harness
        .server
        .post("/api/v1/coupon-customer-link")
        .json(&json!({ "coupon_id": 999, "customer_id": customer_id }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "commit_failed");
    assert_eq!(body["error"]["details"]["retryable"], false);
}

#[tokio::test]
async fn delete_missing_link_is_not_found() {
    let harness = TestHarness::new().await;
    let (coupon_id, customer_id) = seed(&harness).await;

    let response = harness
        .server
        .delete(&format!(
            "/api/v1/coupon-customer-link/{coupon_id}/{customer_id}"
        ))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn linked_coupon_cannot_be_deleted() {
    let harness = TestHarness::new().await;
    let (coupon_id, customer_id) = seed(&harness).await;
    harness
        .server
        .post("/api/v1/coupon-customer-link")
        .json(&json!({ "coupon_id": coupon_id, "customer_id": customer_id }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = harness
        .server
        .delete(&format!("/api/v1/coupons/{coupon_id}"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "commit_failed");
    assert_eq!(body["error"]["details"]["retryable"], false);

    let response = harness
        .server
        .delete(&format!("/api/v1/customers/{customer_id}"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["retryable"], false);

    harness
        .server
        .get(&format!("/api/v1/coupons/{coupon_id}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn navigation_between_sides() {
    let harness = TestHarness::new().await;
    let (coupon_id, customer_id) = seed(&harness).await;
    harness
        .server
        .post("/api/v1/coupon-customer-link")
        .json(&json!({ "coupon_id": coupon_id, "customer_id": customer_id }))
        .await
        .assert_status(StatusCode::CREATED);

    let coupons: Value = harness
        .server
        .get(&format!("/api/v1/customers/{customer_id}/coupons"))
        .await
        .json();
    assert_eq!(coupons[0]["code"], "LINKME01");

    let customers: Value = harness
        .server
        .get(&format!("/api/v1/coupons/{coupon_id}/customers"))
        .await
        .json();
    assert_eq!(customers[0]["username"], "alice01");

    harness
        .server
        .get("/api/v1/customers/999/coupons")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn malformed_link_key_is_a_json_bad_request() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/api/v1/coupon-customer-link/1/bob")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}
