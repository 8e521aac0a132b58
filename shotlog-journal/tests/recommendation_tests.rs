//! Recommendation persistence: the per-bean cache (including corrupt-row
//! self-healing) and the per-shot analytics rows.

mod helpers;

use helpers::{bean, classic_shot, test_now, TestJournal};
use shotlog_common::brew::ExtractionWindow;
use shotlog_common::models::{Confidence, GrindAdjustment, GrindRecommendation, ShotRecommendation};
use shotlog_common::Error;
use uuid::Uuid;

fn cached_rec(bean_id: Uuid) -> GrindRecommendation {
    GrindRecommendation {
        bean_id,
        suggested_setting: Some("14.5".into()),
        adjustment: GrindAdjustment::Finer,
        reason: "shot tasted sour; grind finer to slow the extraction".into(),
        recommended_dose_g: Some(18.0),
        target_window: ExtractionWindow::default(),
        created_at: test_now(),
        followed: false,
        confidence: Confidence::High,
        taste_based: true,
        source_shot_id: None,
        taste_primary: None,
        taste_secondary: None,
    }
}

#[tokio::test]
async fn cache_save_overwrites_wholesale() {
    let journal = TestJournal::new().await;
    let bean_id = Uuid::new_v4();

    journal.cache.save(&cached_rec(bean_id)).await.unwrap();

    let mut second = cached_rec(bean_id);
    second.adjustment = GrindAdjustment::Coarser;
    second.suggested_setting = Some("15.5".into());
    journal.cache.save(&second).await.unwrap();

    let stored = journal.cache.get(bean_id).await.unwrap().unwrap();
    assert_eq!(stored, second);
    assert_eq!(journal.cache.bean_ids().await.unwrap(), vec![bean_id]);
}

#[tokio::test]
async fn cache_get_absent_is_none() {
    let journal = TestJournal::new().await;
    assert!(journal.cache.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn corrupt_cache_payload_self_heals() {
    let journal = TestJournal::new().await;
    let bean_id = Uuid::new_v4();

    sqlx::query("INSERT INTO grind_recommendations (bean_id, payload, updated_at) VALUES (?, ?, ?)")
        .bind(bean_id.to_string())
        .bind("{not json")
        .bind(test_now().to_rfc3339())
        .execute(&journal.pool)
        .await
        .unwrap();

    // Read fails silently as None...
    assert!(journal.cache.get(bean_id).await.unwrap().is_none());

    // ...and the bad row is gone afterwards.
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM grind_recommendations WHERE bean_id = ?")
            .bind(bean_id.to_string())
            .fetch_one(&journal.pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn cache_mark_followed_round_trips() {
    let journal = TestJournal::new().await;
    let bean_id = Uuid::new_v4();

    journal.cache.save(&cached_rec(bean_id)).await.unwrap();
    journal.cache.mark_followed(bean_id).await.unwrap();

    assert!(journal.cache.get(bean_id).await.unwrap().unwrap().followed);
}

#[tokio::test]
async fn cache_mark_followed_without_entry_is_not_found() {
    let journal = TestJournal::new().await;
    assert!(matches!(
        journal.cache.mark_followed(Uuid::new_v4()).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn cache_clear_and_clear_all() {
    let journal = TestJournal::new().await;
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    journal.cache.save(&cached_rec(first)).await.unwrap();
    journal.cache.save(&cached_rec(second)).await.unwrap();

    journal.cache.clear(first).await.unwrap();
    assert!(journal.cache.get(first).await.unwrap().is_none());
    assert_eq!(journal.cache.bean_ids().await.unwrap(), vec![second]);

    journal.cache.clear_all().await.unwrap();
    assert!(journal.cache.bean_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn shot_recommendation_requires_an_existing_shot() {
    let journal = TestJournal::new().await;

    let rec = ShotRecommendation {
        shot_id: Uuid::new_v4(),
        bean_id: Uuid::new_v4(),
        adjustment: GrindAdjustment::Finer,
        suggested_setting: Some("14.5".into()),
        reason: "shot tasted sour".into(),
        taste_based: true,
        followed: None,
        created_at: test_now(),
    };
    assert!(matches!(
        journal.recommendations.save(rec).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn follow_rate_counts_only_evaluated_rows() {
    let journal = TestJournal::new().await;
    let b = journal.beans.add(bean("Kenya AA", 7)).await.unwrap();

    // No recommendations at all: nothing to rate.
    assert_eq!(journal.recommendations.follow_rate(b.id).await.unwrap(), None);

    let mut shot_ids = Vec::new();
    for _ in 0..3 {
        let s = journal.shots.add(classic_shot(b.id)).await.unwrap();
        shot_ids.push(s.id);
        journal
            .recommendations
            .save(ShotRecommendation {
                shot_id: s.id,
                bean_id: b.id,
                adjustment: GrindAdjustment::Finer,
                suggested_setting: Some("14.5".into()),
                reason: "shot tasted sour".into(),
                taste_based: true,
                followed: None,
                created_at: test_now(),
            })
            .await
            .unwrap();
    }

    // Unevaluated rows still rate as None.
    assert_eq!(journal.recommendations.follow_rate(b.id).await.unwrap(), None);

    journal.recommendations.mark_followed(shot_ids[0], true).await.unwrap();
    journal.recommendations.mark_followed(shot_ids[1], false).await.unwrap();

    let rate = journal.recommendations.follow_rate(b.id).await.unwrap().unwrap();
    assert!((rate - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn mark_followed_on_missing_row_is_not_found() {
    let journal = TestJournal::new().await;
    assert!(matches!(
        journal
            .recommendations
            .mark_followed(Uuid::new_v4(), true)
            .await
            .unwrap_err(),
        Error::NotFound(_)
    ));
}
