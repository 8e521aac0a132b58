//! Per-bean grind recommendation cache
//!
//! One JSON record per bean holding the latest computed recommendation,
//! overwritten wholesale. A corrupt payload self-heals: the bad row is
//! deleted during the failed read and the caller sees `None`, never a
//! parse error.

use crate::db;
use crate::utils::retry::{with_retry, RetryPolicy};
use shotlog_common::events::{EventBus, StoreEvent};
use shotlog_common::models::GrindRecommendation;
use shotlog_common::{Clock, Error, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct RecommendationCache {
    pool: SqlitePool,
    bus: EventBus,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl RecommendationCache {
    pub fn new(pool: SqlitePool, bus: EventBus, policy: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            bus,
            policy,
            clock,
        }
    }

    /// Overwrite the cached recommendation for the bean.
    pub async fn save(&self, rec: &GrindRecommendation) -> Result<()> {
        let payload = serde_json::to_string(rec)
            .map_err(|e| Error::Config(format!("could not serialize recommendation: {}", e)))?;
        let updated_at = self.clock.now();

        with_retry(self.policy, "grind_recommendation.upsert", || {
            db::grind_recommendations::upsert(&self.pool, rec.bean_id, &payload, updated_at)
        })
        .await?;
        self.bus.emit(StoreEvent::RecommendationsChanged {
            bean_id: rec.bean_id,
        });
        Ok(())
    }

    /// Fetch the cached recommendation. Absent rows and corrupt payloads
    /// both read as `None`; corruption additionally deletes the row.
    pub async fn get(&self, bean_id: Uuid) -> Result<Option<GrindRecommendation>> {
        let payload = with_retry(self.policy, "grind_recommendation.get_payload", || {
            db::grind_recommendations::get_payload(&self.pool, bean_id)
        })
        .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<GrindRecommendation>(&payload) {
            Ok(rec) => Ok(Some(rec)),
            Err(e) => {
                warn!(bean_id = %bean_id, error = %e, "Corrupt cached recommendation, deleting");
                with_retry(self.policy, "grind_recommendation.delete", || {
                    db::grind_recommendations::delete(&self.pool, bean_id)
                })
                .await?;
                Ok(None)
            }
        }
    }

    pub async fn clear(&self, bean_id: Uuid) -> Result<()> {
        with_retry(self.policy, "grind_recommendation.delete", || {
            db::grind_recommendations::delete(&self.pool, bean_id)
        })
        .await?;
        self.bus.emit(StoreEvent::RecommendationsChanged { bean_id });
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<()> {
        with_retry(self.policy, "grind_recommendation.delete_all", || {
            db::grind_recommendations::delete_all(&self.pool)
        })
        .await?;
        Ok(())
    }

    /// Read-modify-write of the followed flag.
    pub async fn mark_followed(&self, bean_id: Uuid) -> Result<()> {
        let rec = self.get(bean_id).await?;
        let Some(mut rec) = rec else {
            return Err(Error::NotFound(format!("recommendation for bean {}", bean_id)));
        };

        rec.followed = true;
        self.save(&rec).await
    }

    /// All beans with a cached recommendation.
    pub async fn bean_ids(&self) -> Result<Vec<Uuid>> {
        with_retry(self.policy, "grind_recommendation.bean_ids", || {
            db::grind_recommendations::bean_ids(&self.pool)
        })
        .await
    }
}
