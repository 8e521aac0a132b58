//! Grinder configuration repository

use crate::db;
use crate::utils::retry::{with_retry, RetryPolicy};
use shotlog_common::events::{EventBus, StoreEvent};
use shotlog_common::models::GrinderConfiguration;
use shotlog_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// Grinder scale ranges. Historical rows accumulate; the newest is the
/// current one. Saving a range identical to an existing row is an
/// idempotent no-op returning that row.
#[derive(Clone)]
pub struct GrinderConfigRepository {
    pool: SqlitePool,
    bus: EventBus,
    policy: RetryPolicy,
}

impl GrinderConfigRepository {
    pub fn new(pool: SqlitePool, bus: EventBus, policy: RetryPolicy) -> Self {
        Self { pool, bus, policy }
    }

    pub async fn save(&self, config: GrinderConfiguration) -> Result<GrinderConfiguration> {
        config.validate().check()?;

        let existing = with_retry(self.policy, "grinder_config.find_by_range", || {
            db::grinder_configs::find_by_range(&self.pool, config.scale_min, config.scale_max)
        })
        .await?;
        if let Some(existing) = existing {
            debug!(
                config_id = %existing.id,
                scale_min = config.scale_min,
                scale_max = config.scale_max,
                "Grinder range already stored, returning existing row"
            );
            return Ok(existing);
        }

        with_retry(self.policy, "grinder_config.insert", || {
            db::grinder_configs::insert(&self.pool, &config)
        })
        .await?;
        self.bus.emit(StoreEvent::GrinderConfigsChanged);
        Ok(config)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<GrinderConfiguration>> {
        with_retry(self.policy, "grinder_config.get", || db::grinder_configs::get(&self.pool, id))
            .await
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<GrinderConfiguration>> {
        with_retry(self.policy, "grinder_config.list", || db::grinder_configs::list(&self.pool)).await
    }

    /// The most recently saved configuration.
    pub async fn current(&self) -> Result<Option<GrinderConfiguration>> {
        with_retry(self.policy, "grinder_config.latest", || db::grinder_configs::latest(&self.pool))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let existing = self.get(id).await?;
        if existing.is_none() {
            return Err(Error::NotFound(format!("grinder configuration {}", id)));
        }

        with_retry(self.policy, "grinder_config.delete", || {
            db::grinder_configs::delete(&self.pool, id)
        })
        .await?;
        self.bus.emit(StoreEvent::GrinderConfigsChanged);
        Ok(())
    }
}
