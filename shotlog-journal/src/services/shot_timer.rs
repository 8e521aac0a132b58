//! Extraction timer
//!
//! Start/stop/reset state machine over a monotonic clock. Stopping
//! preserves the elapsed value until reset, so pausing is just stopping.
//! Start-while-running and stop-while-stopped are no-ops. The `_at`
//! variants take explicit instants for deterministic tests; the plain
//! methods read `Instant::now()`.

use futures::Stream;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Timer states. `Stopped` covers both "never started" and "paused with
/// elapsed preserved".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

#[derive(Debug)]
struct TimerInner {
    accumulated: Duration,
    /// Set while running.
    started_at: Option<Instant>,
}

/// Shot extraction timer. Cloning shares the underlying timer, so a UI
/// can hold one handle for control and another for display.
#[derive(Debug, Clone)]
pub struct ShotTimer {
    inner: Arc<Mutex<TimerInner>>,
}

impl ShotTimer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                accumulated: Duration::ZERO,
                started_at: None,
            })),
        }
    }

    /// A poisoned lock only means some holder panicked mid-read; the timer
    /// state itself is always valid, so recover the guard instead of
    /// propagating the panic.
    fn lock(&self) -> std::sync::MutexGuard<'_, TimerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn start(&self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&self, now: Instant) {
        let mut inner = self.lock();
        if inner.started_at.is_none() {
            inner.started_at = Some(now);
        }
    }

    pub fn stop(&self) {
        self.stop_at(Instant::now());
    }

    pub fn stop_at(&self, now: Instant) {
        let mut inner = self.lock();
        if let Some(started) = inner.started_at.take() {
            inner.accumulated += now.saturating_duration_since(started);
        }
    }

    /// Back to zero, stopped. Idempotent.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.accumulated = Duration::ZERO;
        inner.started_at = None;
    }

    pub fn state(&self) -> TimerState {
        if self.lock().started_at.is_some() {
            TimerState::Running
        } else {
            TimerState::Stopped
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let inner = self.lock();
        match inner.started_at {
            Some(started) => inner.accumulated + now.saturating_duration_since(started),
            None => inner.accumulated,
        }
    }

    /// Elapsed time as the seconds value shot recording expects.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Periodic elapsed readings for UI display. Dropping the stream
    /// cancels the ticking; cancellation is idempotent and does not touch
    /// the timer itself.
    pub fn ticks(&self, period: Duration) -> impl Stream<Item = Duration> + Send + 'static {
        let timer = self.clone();

        async_stream::stream! {
            loop {
                tokio::time::sleep(period).await;
                yield timer.elapsed();
            }
        }
    }
}

impl Default for ShotTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn initial_state_is_stopped_at_zero() {
        let timer = ShotTimer::new();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_accumulates_across_run_segments() {
        let timer = ShotTimer::new();
        let t0 = Instant::now();

        timer.start_at(t0);
        assert_eq!(timer.state(), TimerState::Running);
        timer.stop_at(t0 + Duration::from_secs(10));
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(60)), Duration::from_secs(10));

        // Resuming continues from the preserved value.
        timer.start_at(t0 + Duration::from_secs(60));
        timer.stop_at(t0 + Duration::from_secs(65));
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(99)), Duration::from_secs(15));
    }

    #[test]
    fn elapsed_reads_mid_run() {
        let timer = ShotTimer::new();
        let t0 = Instant::now();

        timer.start_at(t0);
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(7)), Duration::from_secs(7));
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let timer = ShotTimer::new();
        let t0 = Instant::now();

        timer.start_at(t0);
        // A second start must not restart the segment.
        timer.start_at(t0 + Duration::from_secs(20));
        timer.stop_at(t0 + Duration::from_secs(27));
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(30)), Duration::from_secs(27));
    }

    #[test]
    fn stop_while_stopped_is_a_no_op() {
        let timer = ShotTimer::new();
        let t0 = Instant::now();

        timer.stop_at(t0);
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.start_at(t0);
        timer.stop_at(t0 + Duration::from_secs(5));
        timer.stop_at(t0 + Duration::from_secs(9));
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(9)), Duration::from_secs(5));
    }

    #[test]
    fn reset_zeroes_and_stops() {
        let timer = ShotTimer::new();
        let t0 = Instant::now();

        timer.start_at(t0);
        timer.stop_at(t0 + Duration::from_secs(30));
        timer.reset();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.start_at(t0);
        timer.reset();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn clones_share_the_timer() {
        let timer = ShotTimer::new();
        let handle = timer.clone();
        let t0 = Instant::now();

        timer.start_at(t0);
        assert_eq!(handle.state(), TimerState::Running);
        handle.stop_at(t0 + Duration::from_secs(25));
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(40)), Duration::from_secs(25));
    }

    #[tokio::test]
    async fn ticks_yield_elapsed_readings() {
        let timer = ShotTimer::new();
        timer.start();

        let mut ticks = Box::pin(timer.ticks(Duration::from_millis(5)));
        let first = ticks.next().await.unwrap();
        let second = ticks.next().await.unwrap();
        assert!(second >= first);

        // Dropping the stream cancels ticking without touching the timer.
        drop(ticks);
        assert_eq!(timer.state(), TimerState::Running);
    }
}
