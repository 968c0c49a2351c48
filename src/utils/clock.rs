use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Source of wall time and monotonic instants for the store and the timer.
/// Abstracted so tests can pin the current date.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    /// Wall clock moment, used for session timestamps and day keys.
    fn now(&self) -> DateTime<Utc>;

    /// Monotonic reference point, used for measuring a running hold.
    fn instant(&self) -> Instant;

    async fn sleep(&self, duration: Duration);

    async fn sleep_until(&self, instant: Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
