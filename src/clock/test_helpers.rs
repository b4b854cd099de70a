use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;

use super::{Clock, offset_wall_time};

/// Simulated clock: `sleep` returns almost immediately and advances virtual
/// time by the requested duration. Every requested sleep is recorded so
/// tests can assert the exact backoff schedule.
pub struct MockClock {
    origin_wall: DateTime<Utc>,
    now: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl MockClock {
    pub fn new(origin_wall: DateTime<Utc>) -> MockClock {
        MockClock {
            origin_wall,
            now: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move virtual time forward without recording a sleep (e.g. query latency).
    pub fn advance(&self, d: Duration) {
        *self.now.lock().expect("mock clock poisoned") += d;
    }

    /// All durations passed to [`Clock::sleep`], in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("mock clock poisoned").clone()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        MockClock::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

#[async_trait]
impl Clock for MockClock {
    fn elapsed(&self) -> Duration {
        *self.now.lock().expect("mock clock poisoned")
    }

    fn wall_time(&self) -> DateTime<Utc> {
        offset_wall_time(self.origin_wall, self.elapsed())
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .expect("mock clock poisoned")
            .push(duration);
        self.advance(duration);
        // Give cancellation a suspension point to win at.
        tokio::task::yield_now().await;
    }
}
