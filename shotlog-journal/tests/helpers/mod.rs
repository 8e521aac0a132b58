//! Shared test fixtures: an in-memory journal with every repository and
//! service wired against a fixed clock.
#![allow(dead_code)]

use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use shotlog_common::events::EventBus;
use shotlog_common::models::{BasketConfiguration, Bean, Shot};
use shotlog_common::{db, Clock, FixedClock};
use shotlog_journal::{
    BasketConfigRepository, BeanRepository, GrindAdvisor, GrinderConfigRepository,
    RecommendationCache, RetryPolicy, ShotRecommendationRepository, ShotRecorder, ShotRepository,
    StatisticsService,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// The fixed "now" all tests run at.
pub fn test_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn test_today() -> NaiveDate {
    test_now().date_naive()
}

pub fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

/// Route repository/service log output through the running test's
/// capture. Only the first registration wins, so every test can call it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Everything wired against one in-memory database.
pub struct TestJournal {
    pub pool: SqlitePool,
    pub bus: EventBus,
    pub policy: RetryPolicy,
    pub clock: Arc<dyn Clock>,
    pub beans: BeanRepository,
    pub shots: ShotRepository,
    pub grinders: GrinderConfigRepository,
    pub baskets: BasketConfigRepository,
    pub cache: RecommendationCache,
    pub recommendations: ShotRecommendationRepository,
}

impl TestJournal {
    pub async fn new() -> Self {
        init_tracing();
        let pool = db::open_in_memory().await.expect("in-memory database");
        let bus = EventBus::new(64);
        let policy = quick_policy();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(test_now()));

        Self {
            beans: BeanRepository::new(pool.clone(), bus.clone(), policy, clock.clone()),
            shots: ShotRepository::new(pool.clone(), bus.clone(), policy),
            grinders: GrinderConfigRepository::new(pool.clone(), bus.clone(), policy),
            baskets: BasketConfigRepository::new(pool.clone(), bus.clone(), policy),
            cache: RecommendationCache::new(pool.clone(), bus.clone(), policy, clock.clone()),
            recommendations: ShotRecommendationRepository::new(pool.clone(), bus.clone(), policy),
            pool,
            bus,
            policy,
            clock,
        }
    }

    pub fn recorder(&self) -> ShotRecorder {
        ShotRecorder::new(
            self.beans.clone(),
            self.shots.clone(),
            self.baskets.clone(),
            self.cache.clone(),
            self.recommendations.clone(),
            self.clock.clone(),
        )
    }

    pub fn advisor(&self) -> GrindAdvisor {
        GrindAdvisor::new(
            self.beans.clone(),
            self.shots.clone(),
            self.baskets.clone(),
            self.cache.clone(),
            self.recommendations.clone(),
            self.clock.clone(),
        )
    }

    pub fn statistics(&self) -> StatisticsService {
        StatisticsService::new(self.pool.clone(), self.policy)
    }
}

/// A valid bean roasted `days_ago` days before the fixed clock's today.
pub fn bean(name: &str, days_ago: i64) -> Bean {
    Bean::new(name, test_today() - ChronoDuration::days(days_ago), test_now())
}

/// A valid classic double: 18 g in, 36 g out, 27 s, setting "15".
pub fn classic_shot(bean_id: uuid::Uuid) -> Shot {
    Shot::new(bean_id, 18.0, 36.0, 27.0, "15", test_now())
}

/// A basket configuration covering 14-22 g in, 28-55 g out.
pub fn standard_basket() -> BasketConfiguration {
    BasketConfiguration::new(14.0, 22.0, 28.0, 55.0, test_now())
}
