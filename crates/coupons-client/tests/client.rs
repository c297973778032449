//! Client SDK tests against a mocked coupons service.

use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coupons_client::{ClientError, CouponsClient};
use coupons_core::{
    CouponCode, CouponCustomerLink, CouponId, CouponPatch, CustomerId, DiscountType, NewCoupon,
    PageRequest, Patch, Unavailable,
};

fn coupon_body(id: i64, code: &str) -> serde_json::Value {
    json!({
        "id": id,
        "code": code,
        "description": "The greatest discount",
        "discount": 42,
        "discount_type": "percentage",
        "is_active": true,
        "valid_from": "2026-01-01T00:00:00Z",
        "valid_until": "2026-12-31T00:00:00Z",
        "created_at": "2026-01-01T00:00:00Z",
    })
}

fn error_body(code: &str, message: &str, details: Option<serde_json::Value>) -> serde_json::Value {
    let mut body = json!({ "error": { "code": code, "message": message } });
    if let Some(details) = details {
        body["error"]["details"] = details;
    }
    body
}

fn client_for(server: &MockServer) -> CouponsClient {
    CouponsClient::new(server.uri()).unwrap()
}

#[tokio::test]
async fn apply_coupon_returns_discount() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/coupons/apply/SAVE2024"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "discount": 15, "discount_type": "fixed" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let applied = client_for(&server).apply_coupon("SAVE2024").await.unwrap();

    assert_eq!(applied.discount, 15);
    assert_eq!(applied.discount_type, DiscountType::Fixed);
}

#[tokio::test]
async fn refused_redemption_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/coupons/apply/SAVE2024"))
        .respond_with(ResponseTemplate::new(403).set_body_json(error_body(
            "coupon_unavailable",
            "coupon SAVE2024 is not available: coupon is not active",
            Some(json!({ "reason": "inactive" })),
        )))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .apply_coupon("SAVE2024")
        .await
        .unwrap_err();

    match err {
        ClientError::CouponUnavailable { reason, message } => {
            assert_eq!(reason, Unavailable::Inactive);
            assert!(message.contains("SAVE2024"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn not_found_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/coupons/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            "not_found",
            "coupon not found: 9",
            None,
        )))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_coupon(CouponId::new(9))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound { ref message } if message == "coupon not found: 9"));
}

#[tokio::test]
async fn commit_failure_carries_retryability() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/coupon-customer-link"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "commit_failed",
            "failed to create the link: FOREIGN KEY constraint failed",
            Some(json!({ "retryable": false })),
        )))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_link(CouponCustomerLink::new(CouponId::new(999), CustomerId::new(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::CommitFailed { retryable: false, .. }));
}

#[tokio::test]
async fn unknown_error_bodies_become_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/resellers"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_resellers(PageRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 502, .. }));
}

#[tokio::test]
async fn list_sends_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/coupons"))
        .and(query_param("offset", "40"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([coupon_body(41, "PAGE0041")])))
        .expect(1)
        .mount(&server)
        .await;

    let coupons = client_for(&server)
        .list_coupons(PageRequest::new(40, 10).unwrap())
        .await
        .unwrap();

    assert_eq!(coupons.len(), 1);
    assert_eq!(coupons[0].id, CouponId::new(41));
    assert_eq!(coupons[0].code.as_str(), "PAGE0041");
}

#[tokio::test]
async fn create_sends_the_batch() {
    let server = MockServer::start().await;
    let now = Utc::now();
    let new = NewCoupon {
        code: CouponCode::parse("NEWCODE1").unwrap(),
        description: "The greatest discount".into(),
        discount: 42,
        discount_type: DiscountType::Percentage,
        is_active: true,
        valid_from: now,
        valid_until: now + Duration::days(7),
    };

    Mock::given(method("POST"))
        .and(path("/api/v1/coupons"))
        .and(body_json(json!([new])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([coupon_body(1, "NEWCODE1")])))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_coupons(&[new])
        .await
        .unwrap();

    assert_eq!(created[0].code.as_str(), "NEWCODE1");
}

#[tokio::test]
async fn patch_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/coupons/1"))
        .and(body_json(json!({ "discount": 10 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(coupon_body(1, "PATCHME1")))
        .expect(1)
        .mount(&server)
        .await;

    let patch = CouponPatch {
        discount: Patch::Set(10),
        ..CouponPatch::default()
    };
    client_for(&server)
        .update_coupon(CouponId::new(1), &patch)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/coupon-customer-link/3/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_link(CouponId::new(3), CustomerId::new(4))
        .await
        .unwrap();
}

#[tokio::test]
async fn health_is_unprefixed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "service": "coupons",
            "version": "0.1.0",
            "database": "ok",
        })))
        .mount(&server)
        .await;

    let health = client_for(&server).health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.database, "ok");
}
