//! Fixed-window admission control.
//!
//! A [`FixedWindowRateLimiter`] hands out at most `threshold` permits per window. The
//! window rolls lazily: the first caller that observes an elapsed window resets the
//! counter, under the same lock that issues the permit, so a boundary is crossed once
//! no matter how many callers race on it.

mod clock;
mod limiter;
mod time_unit;

#[cfg(test)]
pub use clock::MockClock;
pub use clock::{Clock, SystemClock};
pub use limiter::{FixedWindowRateLimiter, LimiterStats};
pub use time_unit::TimeUnit;
