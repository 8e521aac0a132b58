//! Shot statistics
//!
//! Aggregate queries scoped optionally by bean and date range. Zero rows
//! are a normal outcome: count 0 and absent averages, never an error.

use crate::db;
use crate::utils::retry::{with_retry, RetryPolicy};
use chrono::{DateTime, Utc};
use shotlog_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Optional scoping for a statistics query. Empty filter means all shots.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsFilter {
    pub bean_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl StatsFilter {
    pub fn for_bean(bean_id: Uuid) -> Self {
        Self {
            bean_id: Some(bean_id),
            ..Self::default()
        }
    }
}

/// Aggregates over the matching shots. Averages are `None` when no shots
/// matched; the ratio average covers only shots with a defined ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub shot_count: i64,
    pub avg_weight_in_g: Option<f64>,
    pub avg_weight_out_g: Option<f64>,
    pub avg_extraction_time_seconds: Option<f64>,
    pub avg_brew_ratio: Option<f64>,
}

pub struct StatisticsService {
    pool: SqlitePool,
    policy: RetryPolicy,
}

impl StatisticsService {
    pub fn new(pool: SqlitePool, policy: RetryPolicy) -> Self {
        Self { pool, policy }
    }

    pub async fn summary(&self, filter: StatsFilter) -> Result<StatsSummary> {
        let (shot_count, avg_in, avg_out, avg_time, avg_ratio) =
            with_retry(self.policy, "shot.aggregate", || {
                db::shots::aggregate(&self.pool, filter.bean_id, filter.from, filter.to)
            })
            .await?;

        Ok(StatsSummary {
            shot_count,
            avg_weight_in_g: avg_in,
            avg_weight_out_g: avg_out,
            avg_extraction_time_seconds: avg_time,
            avg_brew_ratio: avg_ratio,
        })
    }
}
