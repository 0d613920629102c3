//! Time source
//!
//! The workflow reads the current time and waits between polls only through
//! [`Clock`], so tests can run the polling protocol without real delays.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub(crate) use manual::ManualClock;


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_sleep_advances_now() {
        let start = Utc::now();
        let clock = ManualClock::at(start);

        clock.sleep(Duration::from_secs(3)).await;
        clock.sleep(Duration::from_secs(3)).await;

        assert_eq!(clock.now() - start, chrono::Duration::seconds(6));
        assert_eq!(clock.total_slept(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_system_clock_sleeps() {
        let before = tokio::time::Instant::now();
        SystemClock.sleep(Duration::from_secs(3)).await;
        assert!(before.elapsed() >= Duration::from_secs(3));
    }
}
