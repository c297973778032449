//! Coupon store and validity engine tests.

mod common;

use chrono::Duration;
use common::{coupon, valid_coupon, TestDb};

use coupons_core::{CouponId, CouponPatch, DiscountType, PageRequest, Patch, MAX_PAGE_LIMIT};
use coupons_store::{CommitFailure, StoreError};

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_many_assigns_ids_and_timestamps() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let created = session
        .coupons()
        .create_many(vec![valid_coupon("AAAAAAAA"), valid_coupon("BBBBBBBB")])
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(created[0].code.as_str(), "AAAAAAAA");
    assert_eq!(created[1].code.as_str(), "BBBBBBBB");
    assert_ne!(created[0].id, created[1].id);
    assert_eq!(created[0].discount_type, DiscountType::Percentage);

    let stored = session.coupons().get_by_id(created[0].id).await.unwrap().unwrap();
    assert_eq!(stored, created[0]);
}

#[tokio::test]
async fn duplicate_code_fails_and_keeps_first() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let first = session
        .coupons()
        .create_many(vec![valid_coupon("ABCDEFGH")])
        .await
        .unwrap();

    let err = session
        .coupons()
        .create_many(vec![valid_coupon("ABCDEFGH")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::CommitFailed {
            reason: CommitFailure::Conflict,
            ..
        }
    ));
    assert!(!err.is_retryable());

    let stored = session.coupons().get_by_code("ABCDEFGH").await.unwrap().unwrap();
    assert_eq!(stored.id, first[0].id);
}

#[tokio::test]
async fn batch_is_all_or_nothing() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let err = session
        .coupons()
        .create_many(vec![
            valid_coupon("FIRST001"),
            valid_coupon("DUPLICAT"),
            valid_coupon("DUPLICAT"),
            valid_coupon("LAST0001"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CommitFailed { .. }));

    let all = session.coupons().get_all(PageRequest::default()).await.unwrap();
    assert!(all.is_empty(), "no prefix of the batch may persist");
    assert!(session.coupons().get_by_code("FIRST001").await.unwrap().is_none());
}

#[tokio::test]
async fn negative_discount_is_rejected_by_the_store() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let mut item = valid_coupon("NEGATIVE");
    item.discount = -5;

    let err = session.coupons().create_many(vec![item]).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::CommitFailed {
            reason: CommitFailure::Conflict,
            ..
        }
    ));
}

#[tokio::test]
async fn inverted_window_is_accepted() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let created = session
        .coupons()
        .create_many(vec![coupon("INVERTED", true, Duration::days(1), -Duration::days(1))])
        .await
        .unwrap();

    let status = session.coupons().status_by_id(created[0].id).await.unwrap();
    assert!(status.is_active);
    assert!(!status.is_valid);
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn lookups_return_none_when_absent() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    assert!(session.coupons().get_by_id(CouponId::new(999)).await.unwrap().is_none());
    assert!(session.coupons().get_by_code("ZZZZZZZZ").await.unwrap().is_none());
    assert!(session.coupons().get_by_code("not-a-code").await.unwrap().is_none());
}

#[tokio::test]
async fn get_all_pages_in_row_order() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let items = (0..60).map(|i| valid_coupon(&format!("CODE{i:04}"))).collect();
    session.coupons().create_many(items).await.unwrap();

    let first = session
        .coupons()
        .get_all(PageRequest::new(0, MAX_PAGE_LIMIT).unwrap())
        .await
        .unwrap();
    assert_eq!(first.len(), 50);
    assert_eq!(first[0].code.as_str(), "CODE0000");

    let rest = session
        .coupons()
        .get_all(PageRequest::new(50, MAX_PAGE_LIMIT).unwrap())
        .await
        .unwrap();
    assert_eq!(rest.len(), 10);
    assert_eq!(rest[0].code.as_str(), "CODE0050");
    assert!(first.last().unwrap().id < rest[0].id);
}

// ============================================================================
// Status
// ============================================================================

#[tokio::test]
async fn status_reflects_window_at_call_time() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let created = session
        .coupons()
        .create_many(vec![valid_coupon("STATUS01")])
        .await
        .unwrap();
    let id = created[0].id;

    let status = session.coupons().status_by_id(id).await.unwrap();
    assert!(status.is_active);
    assert!(status.is_valid);

    let patch = CouponPatch {
        valid_until: Patch::Set(chrono::Utc::now() - Duration::hours(1)),
        ..CouponPatch::default()
    };
    session.coupons().update(id, patch).await.unwrap();

    let status = session.coupons().status_by_id(id).await.unwrap();
    assert!(status.is_active);
    assert!(!status.is_valid);
}

#[tokio::test]
async fn status_of_missing_coupon_is_not_found() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let err = session.coupons().status_by_id(CouponId::new(7)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "coupon", .. }));
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn update_changes_only_present_fields() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let original = session
        .coupons()
        .create_many(vec![valid_coupon("PARTIAL1")])
        .await
        .unwrap()
        .remove(0);

    let patch = CouponPatch {
        discount: Patch::Set(10),
        ..CouponPatch::default()
    };
    let updated = session.coupons().update(original.id, patch).await.unwrap();

    assert_eq!(updated.discount, 10);
    assert_eq!(updated.description, original.description);
    assert_eq!(updated.valid_from, original.valid_from);
    assert_eq!(updated.valid_until, original.valid_until);
    assert_eq!(updated.code, original.code);
    assert_eq!(updated.is_active, original.is_active);
    assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn empty_update_changes_nothing() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let original = session
        .coupons()
        .create_many(vec![valid_coupon("NOCHANGE")])
        .await
        .unwrap()
        .remove(0);

    let updated = session
        .coupons()
        .update(original.id, CouponPatch::default())
        .await
        .unwrap();
    assert_eq!(updated, original);
}

#[tokio::test]
async fn update_missing_coupon_is_not_found() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let patch = CouponPatch {
        description: Patch::Set("nope".into()),
        ..CouponPatch::default()
    };
    let err = session.coupons().update(CouponId::new(404), patch).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));

    let err = session
        .coupons()
        .update(CouponId::new(404), CouponPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn update_violating_constraint_is_commit_failed() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let original = session
        .coupons()
        .create_many(vec![valid_coupon("CHECKED1")])
        .await
        .unwrap()
        .remove(0);

    let patch = CouponPatch {
        discount: Patch::Set(-1),
        ..CouponPatch::default()
    };
    let err = session.coupons().update(original.id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::CommitFailed { .. }));

    let stored = session.coupons().get_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.discount, original.discount);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_removes_the_coupon() {
    let t = TestDb::new().await;
    let mut session = t.db.session().await.unwrap();

    let id = session
        .coupons()
        .create_many(vec![valid_coupon("DELETEME")])
        .await
        .unwrap()[0]
        .id;

    session.coupons().delete_by_id(id).await.unwrap();
    assert!(session.coupons().get_by_id(id).await.unwrap().is_none());

    let err = session.coupons().delete_by_id(id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}
