//! Retry with backoff
//!
//! One shared wrapper for every repository's storage calls: transient
//! failures are retried a bounded number of times with a growing,
//! cooperative delay (`tokio::time::sleep`, never a busy-wait), then the
//! final cause is surfaced. Validation and not-found errors pass through
//! untouched on the first attempt.

use shotlog_common::Result;
use sqlx::SqlitePool;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Retry tuning, loadable from the settings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before attempt N+1 is `base_delay * N`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Load tuning from the `settings` table, falling back to defaults
    /// for absent keys.
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let defaults = Self::default();
        let max_attempts = shotlog_common::db::get_setting::<u32>(pool, "retry_max_attempts")
            .await?
            .unwrap_or(defaults.max_attempts);
        let base_delay_ms = shotlog_common::db::get_setting::<u64>(pool, "retry_base_delay_ms")
            .await?
            .unwrap_or(defaults.base_delay.as_millis() as u64);

        Ok(Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
        })
    }
}

/// Run `operation`, retrying transient failures per `policy`.
///
/// Returns the first success, or the last error once attempts are
/// exhausted. Non-transient errors are returned immediately.
pub async fn with_retry<F, Fut, T>(policy: RetryPolicy, operation_name: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    operation = operation_name,
                    attempt,
                    error = %err,
                    "Transient storage failure, retrying"
                );
                tokio::time::sleep(policy.base_delay * attempt).await;
            }
            Err(err) => {
                if err.is_transient() {
                    error!(
                        operation = operation_name,
                        attempts = attempt,
                        error = %err,
                        "Storage operation failed after exhausting retries"
                    );
                }
                return Err(err);
            }
        }
    }
}
