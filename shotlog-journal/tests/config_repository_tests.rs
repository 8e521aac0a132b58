//! Grinder and basket configuration repositories: idempotent duplicate
//! ranges, single-active semantics.

mod helpers;

use helpers::{standard_basket, test_now, TestJournal};
use shotlog_common::models::{BasketConfiguration, GrinderConfiguration};
use shotlog_common::Error;
use uuid::Uuid;

#[tokio::test]
async fn grinder_save_and_current() {
    let journal = TestJournal::new().await;

    let saved = journal
        .grinders
        .save(GrinderConfiguration::new(0.0, 40.0, test_now()))
        .await
        .unwrap();

    let current = journal.grinders.current().await.unwrap().unwrap();
    assert_eq!(current.id, saved.id);
}

#[tokio::test]
async fn grinder_duplicate_range_is_an_idempotent_no_op() {
    let journal = TestJournal::new().await;

    let first = journal
        .grinders
        .save(GrinderConfiguration::new(0.0, 40.0, test_now()))
        .await
        .unwrap();
    let second = journal
        .grinders
        .save(GrinderConfiguration::new(0.0, 40.0, test_now()))
        .await
        .unwrap();

    // No second row; the original comes back.
    assert_eq!(second.id, first.id);
    assert_eq!(journal.grinders.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn grinder_invalid_range_is_rejected() {
    let journal = TestJournal::new().await;

    let err = journal
        .grinders
        .save(GrinderConfiguration::new(40.0, 0.0, test_now()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn grinder_delete_of_missing_row_is_not_found() {
    let journal = TestJournal::new().await;
    assert!(matches!(
        journal.grinders.delete(Uuid::new_v4()).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn basket_save_active_deactivates_previous_rows() {
    let journal = TestJournal::new().await;

    let first = journal.baskets.save_active(standard_basket()).await.unwrap();
    let second = journal
        .baskets
        .save_active(BasketConfiguration::new(7.0, 12.0, 14.0, 30.0, test_now()))
        .await
        .unwrap();

    let active = journal.baskets.active().await.unwrap().unwrap();
    assert_eq!(active.id, second.id);

    let first_row = journal.baskets.get(first.id).await.unwrap().unwrap();
    assert!(!first_row.active);
    assert_eq!(journal.baskets.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn basket_duplicate_range_reactivates_instead_of_inserting() {
    let journal = TestJournal::new().await;

    let original = journal.baskets.save_active(standard_basket()).await.unwrap();
    journal
        .baskets
        .save_active(BasketConfiguration::new(7.0, 12.0, 14.0, 30.0, test_now()))
        .await
        .unwrap();

    // Saving the first range again flips it back to active with no new row.
    let reactivated = journal.baskets.save_active(standard_basket()).await.unwrap();
    assert_eq!(reactivated.id, original.id);
    assert!(reactivated.active);
    assert_eq!(journal.baskets.list().await.unwrap().len(), 2);

    let active = journal.baskets.active().await.unwrap().unwrap();
    assert_eq!(active.id, original.id);
}

#[tokio::test]
async fn basket_degenerate_range_is_rejected() {
    let journal = TestJournal::new().await;

    let err = journal
        .baskets
        .save_active(BasketConfiguration::new(18.0, 18.0, 28.0, 55.0, test_now()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(journal.baskets.active().await.unwrap().is_none());
}

#[tokio::test]
async fn no_active_basket_reads_as_none() {
    let journal = TestJournal::new().await;
    assert!(journal.baskets.active().await.unwrap().is_none());
}
