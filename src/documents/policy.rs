use std::time::Duration;

use crate::Result;
use crate::error::Error;
use crate::rate_limit::FixedWindowRateLimiter;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How a submission waits after the limiter said "not now".
///
/// Neither variant bounds the total wait. Wrap the call in `tokio::time::timeout` or
/// pass a cancellation token when a ceiling is needed.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Retry after a fixed pause.
    Poll(Duration),
    /// Sleep until the limiter's window is due to roll, but never longer than `max_wait`
    /// in one go.
    UntilWindowRoll { max_wait: Duration },
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        AdmissionPolicy::Poll(DEFAULT_POLL_INTERVAL)
    }
}

impl AdmissionPolicy {
    /// Pause before the next `try_acquire`.
    pub(crate) fn next_wait(self, limiter: &FixedWindowRateLimiter) -> Duration {
        match self {
            AdmissionPolicy::Poll(interval) => interval,
            // Other callers may drain the fresh window first, so never spin on zero.
            AdmissionPolicy::UntilWindowRoll { max_wait } => limiter
                .time_until_reset()
                .clamp(Duration::from_millis(1), max_wait),
        }
    }

    pub(crate) fn validate(self) -> Result<()> {
        match self {
            AdmissionPolicy::Poll(interval) if interval.is_zero() => Err(Error::validation(
                "admission poll interval must be greater than zero",
            )),
            AdmissionPolicy::UntilWindowRoll { max_wait } if max_wait < Duration::from_millis(1) => {
                Err(Error::validation(
                    "admission max_wait must be at least one millisecond",
                ))
            }
            _ => Ok(()),
        }
    }
}
