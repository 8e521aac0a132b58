//! Shot repository

use crate::db;
use crate::utils::retry::{with_retry, RetryPolicy};
use futures::Stream;
use shotlog_common::brew::WeightLimits;
use shotlog_common::events::{EventBus, StoreEvent};
use shotlog_common::models::{Shot, TastePrimary, TasteSecondary, NOTES_MAX_CHARS};
use shotlog_common::{Error, Result};
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// Shots: validated against the active basket configuration's weight
/// ranges and checked for a live bean reference before any write.
#[derive(Clone)]
pub struct ShotRepository {
    pool: SqlitePool,
    bus: EventBus,
    policy: RetryPolicy,
}

impl ShotRepository {
    pub fn new(pool: SqlitePool, bus: EventBus, policy: RetryPolicy) -> Self {
        Self { pool, bus, policy }
    }

    /// Weight limits from the active basket configuration, or the
    /// defaults when none is configured.
    pub async fn current_limits(&self) -> Result<WeightLimits> {
        let basket =
            with_retry(self.policy, "basket.active", || db::basket_configs::active(&self.pool))
                .await?;
        Ok(basket
            .as_ref()
            .map(WeightLimits::from_basket)
            .unwrap_or_default())
    }

    /// Add a shot. On any validation or referential failure nothing is
    /// written.
    pub async fn add(&self, shot: Shot) -> Result<Shot> {
        let limits = self.current_limits().await?;
        shot.validate(&limits).check()?;

        let bean =
            with_retry(self.policy, "bean.get", || db::beans::get(&self.pool, shot.bean_id)).await?;
        if bean.is_none() {
            return Err(Error::NotFound(format!("bean {}", shot.bean_id)));
        }

        with_retry(self.policy, "shot.insert", || db::shots::insert(&self.pool, &shot)).await?;
        self.bus.emit(StoreEvent::ShotsChanged {
            bean_id: shot.bean_id,
        });
        Ok(shot)
    }

    /// Update the in-place fields: notes and taste feedback.
    pub async fn update_feedback(
        &self,
        id: Uuid,
        notes: &str,
        taste_primary: Option<TastePrimary>,
        taste_secondary: Option<TasteSecondary>,
    ) -> Result<Shot> {
        if notes.chars().count() > NOTES_MAX_CHARS {
            return Err(Error::Validation(format!(
                "notes must be at most {} characters",
                NOTES_MAX_CHARS
            )));
        }

        let mut shot = self.require(id).await?;

        with_retry(self.policy, "shot.update_feedback", || {
            db::shots::update_feedback(&self.pool, id, notes, taste_primary, taste_secondary)
        })
        .await?;

        shot.notes = notes.to_string();
        shot.taste_primary = taste_primary;
        shot.taste_secondary = taste_secondary;

        self.bus.emit(StoreEvent::ShotsChanged {
            bean_id: shot.bean_id,
        });
        Ok(shot)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Shot>> {
        with_retry(self.policy, "shot.get", || db::shots::get(&self.pool, id)).await
    }

    /// Newest first.
    pub async fn list_for_bean(&self, bean_id: Uuid) -> Result<Vec<Shot>> {
        with_retry(self.policy, "shot.list_for_bean", || {
            db::shots::list_for_bean(&self.pool, bean_id)
        })
        .await
    }

    pub async fn latest_for_bean(&self, bean_id: Uuid) -> Result<Option<Shot>> {
        with_retry(self.policy, "shot.latest_for_bean", || {
            db::shots::latest_for_bean(&self.pool, bean_id)
        })
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<Shot>> {
        with_retry(self.policy, "shot.list_all", || db::shots::list_all(&self.pool)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let shot = self.require(id).await?;
        with_retry(self.policy, "shot.delete", || db::shots::delete(&self.pool, id)).await?;
        self.bus.emit(StoreEvent::ShotsChanged {
            bean_id: shot.bean_id,
        });
        Ok(())
    }

    pub async fn delete_for_bean(&self, bean_id: Uuid) -> Result<()> {
        with_retry(self.policy, "shot.delete_for_bean", || {
            db::shots::delete_for_bean(&self.pool, bean_id)
        })
        .await?;
        self.bus.emit(StoreEvent::ShotsChanged { bean_id });
        Ok(())
    }

    /// Live stream of one bean's shots, newest first.
    pub fn watch_bean(&self, bean_id: Uuid) -> impl Stream<Item = Result<Vec<Shot>>> + Send + 'static {
        let pool = self.pool.clone();
        let mut rx = self.bus.subscribe();

        async_stream::stream! {
            yield db::shots::list_for_bean(&pool, bean_id).await;

            loop {
                match rx.recv().await {
                    Ok(event) if event.touches_shots_for(bean_id) => {
                        yield db::shots::list_for_bean(&pool, bean_id).await
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => yield db::shots::list_for_bean(&pool, bean_id).await,
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    async fn require(&self, id: Uuid) -> Result<Shot> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("shot {}", id)))
    }
}
