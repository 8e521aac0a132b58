//! Bean repository

use crate::db;
use crate::utils::retry::{with_retry, RetryPolicy};
use futures::Stream;
use shotlog_common::events::{EventBus, StoreEvent};
use shotlog_common::models::Bean;
use shotlog_common::{Clock, Error, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use uuid::Uuid;

/// Beans: name-unique profiles owning shots, a cached recommendation, and
/// an optional photo file. The cascade on delete is owned here, not by the
/// storage engine.
#[derive(Clone)]
pub struct BeanRepository {
    pool: SqlitePool,
    bus: EventBus,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl BeanRepository {
    pub fn new(pool: SqlitePool, bus: EventBus, policy: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            bus,
            policy,
            clock,
        }
    }

    /// Add a bean. Name uniqueness is case-sensitive and spans inactive
    /// beans too.
    pub async fn add(&self, bean: Bean) -> Result<Bean> {
        bean.validate(self.clock.today()).check()?;

        let existing =
            with_retry(self.policy, "bean.get_by_name", || db::beans::get_by_name(&self.pool, &bean.name))
                .await?;
        if existing.is_some() {
            return Err(Error::Validation(format!(
                "a bean named '{}' already exists",
                bean.name
            )));
        }

        with_retry(self.policy, "bean.insert", || db::beans::insert(&self.pool, &bean)).await?;
        self.bus.emit(StoreEvent::BeansChanged);
        Ok(bean)
    }

    /// Update a bean in place. Renaming to another bean's name fails;
    /// keeping the current name succeeds.
    pub async fn update(&self, bean: Bean) -> Result<Bean> {
        bean.validate(self.clock.today()).check()?;

        self.require(bean.id).await?;

        let conflict =
            with_retry(self.policy, "bean.get_by_name", || db::beans::get_by_name(&self.pool, &bean.name))
                .await?;
        if let Some(other) = conflict {
            if other.id != bean.id {
                return Err(Error::Validation(format!(
                    "a bean named '{}' already exists",
                    bean.name
                )));
            }
        }

        with_retry(self.policy, "bean.update", || db::beans::update(&self.pool, &bean)).await?;
        self.bus.emit(StoreEvent::BeansChanged);
        Ok(bean)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        self.require(id).await?;
        with_retry(self.policy, "bean.set_active", || db::beans::set_active(&self.pool, id, active))
            .await?;
        self.bus.emit(StoreEvent::BeansChanged);
        Ok(())
    }

    /// Memorize the grinder setting used by the most recent shot. Written
    /// automatically whenever a shot is recorded against this bean.
    pub async fn remember_grinder_setting(&self, id: Uuid, setting: &str) -> Result<()> {
        if setting.trim().is_empty() {
            return Err(Error::Validation("grinder setting must not be blank".into()));
        }
        self.require(id).await?;
        with_retry(self.policy, "bean.remember_grinder_setting", || {
            db::beans::set_last_grinder_setting(&self.pool, id, setting)
        })
        .await?;
        self.bus.emit(StoreEvent::BeansChanged);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Bean>> {
        with_retry(self.policy, "bean.get", || db::beans::get(&self.pool, id)).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bean>> {
        with_retry(self.policy, "bean.get_by_name", || db::beans::get_by_name(&self.pool, name)).await
    }

    pub async fn list(&self) -> Result<Vec<Bean>> {
        with_retry(self.policy, "bean.list", || db::beans::list(&self.pool)).await
    }

    pub async fn list_active(&self) -> Result<Vec<Bean>> {
        with_retry(self.policy, "bean.list_active", || db::beans::list_active(&self.pool)).await
    }

    /// Delete a bean and everything it owns: shot recommendations, shots,
    /// the cached grind recommendation, and the row itself, in one
    /// transaction. The photo file is removed afterwards best-effort; a
    /// failure there is logged and the deletion still succeeds.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let bean = self.require(id).await?;

        with_retry(self.policy, "bean.delete", || db::beans::delete_cascade(&self.pool, id)).await?;
        self.bus.emit(StoreEvent::BeansChanged);
        info!(bean_id = %id, name = %bean.name, "Deleted bean with its shots and recommendations");

        if let Some(path) = &bean.photo_path {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(bean_id = %id, photo_path = %path, error = %e, "Could not remove bean photo");
            }
        }

        Ok(())
    }

    /// Live stream of the bean list: the current result on subscription,
    /// then a fresh query after every relevant change. Never completes on
    /// its own; a lagged subscriber re-queries instead of erroring.
    pub fn watch(&self) -> impl Stream<Item = Result<Vec<Bean>>> + Send + 'static {
        let pool = self.pool.clone();
        let mut rx = self.bus.subscribe();

        async_stream::stream! {
            yield db::beans::list(&pool).await;

            loop {
                match rx.recv().await {
                    Ok(event) if event.touches_beans() => yield db::beans::list(&pool).await,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => yield db::beans::list(&pool).await,
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    async fn require(&self, id: Uuid) -> Result<Bean> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("bean {}", id)))
    }
}
