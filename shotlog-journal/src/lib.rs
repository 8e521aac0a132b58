//! # Shotlog Journal
//!
//! Stateful layer of the espresso journal: per-entity SQL queries,
//! repositories (validate, then check uniqueness/existence, then
//! retry-wrapped write, then change event), the per-bean recommendation
//! cache, and the use-case services the UI calls.
//!
//! All public operations return `shotlog_common::Result` and never panic;
//! transient storage failures are retried with backoff before a
//! `Database` error is surfaced.

pub mod db;
pub mod repo;
pub mod services;
pub mod utils;

pub use repo::{
    BasketConfigRepository, BeanRepository, GrinderConfigRepository, RecommendationCache,
    ShotRecommendationRepository, ShotRepository,
};
pub use services::{
    GrindAdvisor, NewShot, RecordedShot, ShotAssessment, ShotRecorder, ShotTimer, StatisticsService,
    StatsFilter, StatsSummary, TasteFeedback, TimerState,
};
pub use utils::retry::{RetryPolicy, with_retry};
