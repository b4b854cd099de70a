//! Time source for polling sessions.
//!
//! The monitor never calls `tokio::time` directly: it asks a [`Clock`] for
//! the elapsed monotonic time, the wall-clock timestamp to stamp observations
//! with, and to sleep between polls. Production code uses [`TokioClock`];
//! tests swap in [`test_helpers::MockClock`] to run backoff schedules in
//! simulated time.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use tokio::time::Instant;

#[cfg(any(test, feature = "mock-sdk"))]
pub mod test_helpers;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic time since this clock's origin.
    fn elapsed(&self) -> Duration;

    /// Wall-clock time, advancing in lockstep with [`Clock::elapsed`].
    fn wall_time(&self) -> DateTime<Utc>;

    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer.
///
/// Wall time is derived from a single anchor taken at construction, so it
/// never jumps backwards when the system clock is adjusted and it follows
/// tokio's paused time in tests.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: Instant,
    origin_wall: DateTime<Utc>,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            origin_wall: Utc::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_time(&self) -> DateTime<Utc> {
        offset_wall_time(self.origin_wall, self.elapsed())
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// `origin + elapsed`, saturating instead of overflowing.
pub(crate) fn offset_wall_time(origin: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    let delta = TimeDelta::from_std(elapsed).unwrap_or(TimeDelta::MAX);
    origin.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        let before = clock.wall_time();

        clock.sleep(Duration::from_millis(1500)).await;

        assert!(clock.elapsed() >= Duration::from_millis(1500));
        assert_eq!(
            (clock.wall_time() - before).num_milliseconds(),
            clock.elapsed().as_millis() as i64
        );
    }

    #[test]
    fn test_offset_wall_time_saturates() {
        let origin = DateTime::<Utc>::MAX_UTC;
        assert_eq!(
            offset_wall_time(origin, Duration::from_secs(1)),
            DateTime::<Utc>::MAX_UTC
        );
    }
}
