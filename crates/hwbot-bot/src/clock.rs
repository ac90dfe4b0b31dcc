//! Time source and sleep for the poll loop.

use async_trait::async_trait;
use hwbot_common::{now_epoch, Cursor};
use std::time::Duration;

/// Wall clock and blocking delay used by the poller.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current time as a cursor value.
    fn now(&self) -> Cursor;

    /// Pause the poll loop.
    async fn sleep(&self, duration: Duration);
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Cursor {
        Cursor(now_epoch())
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock whose time only moves when slept on. Sleeps return immediately.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    now: std::sync::Mutex<i64>,
    sleeps: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn starting_at(secs: i64) -> Self {
        Self {
            now: std::sync::Mutex::new(secs),
            sleeps: std::sync::Mutex::default(),
        }
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Cursor {
        Cursor(*self.now.lock().unwrap())
    }

    async fn sleep(&self, duration: Duration) {
        *self.now.lock().unwrap() += i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_advances_on_sleep() {
        let clock = ManualClock::starting_at(100);
        clock.sleep(Duration::from_secs(600)).await;
        assert_eq!(clock.now(), Cursor(700));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(600)]);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now().as_secs() > 1_577_836_800);
    }
}
