//! Basket configuration repository

use crate::db;
use crate::utils::retry::{with_retry, RetryPolicy};
use shotlog_common::events::{EventBus, StoreEvent};
use shotlog_common::models::BasketConfiguration;
use shotlog_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// Basket weight ranges. At most one row is active; its bounds drive shot
/// validation and the brew-ratio typicality band.
#[derive(Clone)]
pub struct BasketConfigRepository {
    pool: SqlitePool,
    bus: EventBus,
    policy: RetryPolicy,
}

impl BasketConfigRepository {
    pub fn new(pool: SqlitePool, bus: EventBus, policy: RetryPolicy) -> Self {
        Self { pool, bus, policy }
    }

    /// Save a configuration and make it the active one.
    ///
    /// A duplicate range reactivates the existing row instead of inserting
    /// a second one. Deactivate-then-activate runs as two statements; a
    /// crash between them leaves no active row, which readers treat as the
    /// default ranges until the next save.
    pub async fn save_active(&self, config: BasketConfiguration) -> Result<BasketConfiguration> {
        config.validate().check()?;

        let existing = with_retry(self.policy, "basket_config.find_by_range", || {
            db::basket_configs::find_by_range(
                &self.pool,
                config.coffee_in_min_g,
                config.coffee_in_max_g,
                config.coffee_out_min_g,
                config.coffee_out_max_g,
            )
        })
        .await?;

        if let Some(mut existing) = existing {
            debug!(config_id = %existing.id, "Basket range already stored, reactivating");
            with_retry(self.policy, "basket_config.deactivate_all", || {
                db::basket_configs::deactivate_all(&self.pool)
            })
            .await?;
            with_retry(self.policy, "basket_config.set_active_flag", || {
                db::basket_configs::set_active_flag(&self.pool, existing.id, true)
            })
            .await?;
            existing.active = true;
            self.bus.emit(StoreEvent::BasketConfigsChanged);
            return Ok(existing);
        }

        with_retry(self.policy, "basket_config.deactivate_all", || {
            db::basket_configs::deactivate_all(&self.pool)
        })
        .await?;

        let mut config = config;
        config.active = true;
        with_retry(self.policy, "basket_config.insert", || {
            db::basket_configs::insert(&self.pool, &config)
        })
        .await?;
        self.bus.emit(StoreEvent::BasketConfigsChanged);
        Ok(config)
    }

    /// The single active configuration, if any.
    pub async fn active(&self) -> Result<Option<BasketConfiguration>> {
        with_retry(self.policy, "basket_config.active", || db::basket_configs::active(&self.pool))
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<BasketConfiguration>> {
        with_retry(self.policy, "basket_config.get", || db::basket_configs::get(&self.pool, id))
            .await
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<BasketConfiguration>> {
        with_retry(self.policy, "basket_config.list", || db::basket_configs::list(&self.pool)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let existing = self.get(id).await?;
        if existing.is_none() {
            return Err(Error::NotFound(format!("basket configuration {}", id)));
        }

        with_retry(self.policy, "basket_config.delete", || {
            db::basket_configs::delete(&self.pool, id)
        })
        .await?;
        self.bus.emit(StoreEvent::BasketConfigsChanged);
        Ok(())
    }
}
