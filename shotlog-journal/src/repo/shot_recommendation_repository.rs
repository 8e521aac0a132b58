//! Shot recommendation repository
//!
//! One analytics row per shot: what was suggested and whether the next
//! shot followed it. Never consulted for shot validity.

use crate::db;
use crate::utils::retry::{with_retry, RetryPolicy};
use shotlog_common::events::{EventBus, StoreEvent};
use shotlog_common::models::ShotRecommendation;
use shotlog_common::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ShotRecommendationRepository {
    pool: SqlitePool,
    bus: EventBus,
    policy: RetryPolicy,
}

impl ShotRecommendationRepository {
    pub fn new(pool: SqlitePool, bus: EventBus, policy: RetryPolicy) -> Self {
        Self { pool, bus, policy }
    }

    /// Insert or overwrite the recommendation for a shot. The shot must
    /// exist.
    pub async fn save(&self, rec: ShotRecommendation) -> Result<ShotRecommendation> {
        let shot =
            with_retry(self.policy, "shot.get", || db::shots::get(&self.pool, rec.shot_id)).await?;
        if shot.is_none() {
            return Err(Error::NotFound(format!("shot {}", rec.shot_id)));
        }

        with_retry(self.policy, "shot_recommendation.upsert", || {
            db::shot_recommendations::upsert(&self.pool, &rec)
        })
        .await?;
        self.bus.emit(StoreEvent::RecommendationsChanged {
            bean_id: rec.bean_id,
        });
        Ok(rec)
    }

    pub async fn get(&self, shot_id: Uuid) -> Result<Option<ShotRecommendation>> {
        with_retry(self.policy, "shot_recommendation.get", || {
            db::shot_recommendations::get(&self.pool, shot_id)
        })
        .await
    }

    /// Record whether the next shot for the bean followed the suggestion.
    pub async fn mark_followed(&self, shot_id: Uuid, followed: bool) -> Result<()> {
        let existing = self.get(shot_id).await?;
        let Some(rec) = existing else {
            return Err(Error::NotFound(format!("recommendation for shot {}", shot_id)));
        };

        with_retry(self.policy, "shot_recommendation.set_followed", || {
            db::shot_recommendations::set_followed(&self.pool, shot_id, followed)
        })
        .await?;
        self.bus.emit(StoreEvent::RecommendationsChanged {
            bean_id: rec.bean_id,
        });
        Ok(())
    }

    pub async fn list_for_bean(&self, bean_id: Uuid) -> Result<Vec<ShotRecommendation>> {
        with_retry(self.policy, "shot_recommendation.list_for_bean", || {
            db::shot_recommendations::list_for_bean(&self.pool, bean_id)
        })
        .await
    }

    /// Fraction of evaluated recommendations that were followed, or `None`
    /// when nothing has been evaluated yet.
    pub async fn follow_rate(&self, bean_id: Uuid) -> Result<Option<f64>> {
        let (followed, evaluated) = with_retry(self.policy, "shot_recommendation.follow_counts", || {
            db::shot_recommendations::follow_counts(&self.pool, bean_id)
        })
        .await?;

        if evaluated == 0 {
            Ok(None)
        } else {
            Ok(Some(followed as f64 / evaluated as f64))
        }
    }
}
