use std::fmt::Debug;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};
#[cfg(test)]
use std::time::Duration;

use chrono::Utc;

/// Source of wall-clock time for the limiter, in milliseconds since the Unix epoch.
///
/// Wall time is allowed to jump backwards; the limiter treats that as "window not
/// expired yet".
pub trait Clock: Send + Sync + Debug {
    fn now_millis(&self) -> i64;
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock.
///
/// Clones share the same time value, so a test can hand one clone to a limiter and
/// move time with another.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    millis: Arc<AtomicI64>,
}

#[cfg(test)]
impl MockClock {
    #[must_use]
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(duration_millis(by), Ordering::SeqCst);
    }

    /// Moves time backwards, as an NTP correction would.
    pub fn rewind(&self, by: Duration) {
        self.millis.fetch_sub(duration_millis(by), Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
