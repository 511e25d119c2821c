use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::rate_limit::{Clock, SystemClock, TimeUnit};

/// Counters accumulated over the limiter's lifetime.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LimiterStats {
    pub admitted: u64,
    pub rejected: u64,
    pub window_rolls: u64,
}

#[derive(Debug)]
struct Window {
    start_millis: i64,
    count: u32,
    rolls: u64,
}

/// Thread-safe fixed-window rate limiter.
///
/// At most `threshold` calls to [`try_acquire`](Self::try_acquire) return `true` between
/// two window rolls. The window start and counter live behind one mutex, so the
/// expiry check, the reset and the increment happen as a single step.
///
/// ```
/// use std::time::Duration;
/// use crpt_api_client::rate_limit::FixedWindowRateLimiter;
///
/// let limiter = FixedWindowRateLimiter::new(2, Duration::from_secs(60));
/// assert!(limiter.try_acquire());
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
/// ```
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    threshold: u32,
    window_millis: i64,
    clock: Arc<dyn Clock>,
    window: Mutex<Window>,
    admitted: AtomicU64,
    rejected: AtomicU64,
}

impl FixedWindowRateLimiter {
    #[must_use]
    pub fn new(threshold: u32, window: Duration) -> Self {
        Self::with_clock(threshold, window, Arc::new(SystemClock))
    }

    /// Limiter allowing `threshold` permits per one `unit`.
    #[must_use]
    pub fn from_time_unit(unit: TimeUnit, threshold: u32) -> Self {
        Self::new(threshold, unit.window())
    }

    /// Windows shorter than a millisecond are widened to one millisecond, the clock's
    /// resolution.
    #[must_use]
    pub fn with_clock(threshold: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        let window_millis = i64::try_from(window.as_millis()).unwrap_or(i64::MAX).max(1);
        let start_millis = clock.now_millis();

        Self {
            threshold,
            window_millis,
            clock,
            window: Mutex::new(Window {
                start_millis,
                count: 0,
                rolls: 0,
            }),
            admitted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Tries to take one permit from the current window.
    ///
    /// Returns `false` without touching the window counter when the window is exhausted.
    pub fn try_acquire(&self) -> bool {
        let granted = {
            let mut window = self.lock_window();
            let now = self.clock.now_millis();

            // A clock that moved backwards yields a negative difference: no roll.
            if now.saturating_sub(window.start_millis) >= self.window_millis {
                window.start_millis = now;
                window.count = 0;
                window.rolls += 1;

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    window_start = now,
                    rolls = window.rolls,
                    "rate limit window rolled"
                );
            }

            if window.count < self.threshold {
                window.count += 1;
                true
            } else {
                false
            }
        };

        let counter = if granted {
            &self.admitted
        } else {
            &self.rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);

        granted
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_millis.unsigned_abs())
    }

    /// Permits handed out in the window that is current as of the last roll.
    #[must_use]
    pub fn permits_used(&self) -> u32 {
        self.lock_window().count
    }

    /// Time left before the current window can roll. Zero once it has expired.
    ///
    /// If the clock went backwards, this includes the time needed to catch up with the
    /// recorded window start.
    #[must_use]
    pub fn time_until_reset(&self) -> Duration {
        let start = self.lock_window().start_millis;
        let elapsed = self.clock.now_millis().saturating_sub(start);
        let remaining = self.window_millis.saturating_sub(elapsed);

        u64::try_from(remaining).map_or(Duration::ZERO, Duration::from_millis)
    }

    #[must_use]
    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            window_rolls: self.lock_window().rolls,
        }
    }

    // The guarded state is plain integers that are never left half-written, so a
    // poisoned lock is still usable.
    fn lock_window(&self) -> MutexGuard<'_, Window> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
