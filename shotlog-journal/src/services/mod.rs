//! Use-case services
//!
//! Application-level operations composing the calculators and
//! repositories: recording a shot (with its follow-up writes and
//! assessment), grind advice, statistics, and the extraction timer.

mod grind_advisor;
mod shot_recorder;
mod shot_timer;
mod statistics;

pub use grind_advisor::{GrindAdvisor, TasteFeedback};
pub use shot_recorder::{NewShot, RecordedShot, ShotAssessment, ShotRecorder};
pub use shot_timer::{ShotTimer, TimerState};
pub use statistics::{StatisticsService, StatsFilter, StatsSummary};
