use std::time::Duration;

use strum_macros::{Display, EnumString};

/// Granularity used to express a rate limit window, e.g. "10 requests per `Seconds`".
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum TimeUnit {
    #[strum(to_string = "nanoseconds", serialize = "nanosecond", serialize = "ns")]
    Nanoseconds,
    #[strum(to_string = "microseconds", serialize = "microsecond", serialize = "us")]
    Microseconds,
    #[strum(to_string = "milliseconds", serialize = "millisecond", serialize = "ms")]
    Milliseconds,
    #[strum(to_string = "seconds", serialize = "second", serialize = "s")]
    Seconds,
    #[strum(to_string = "minutes", serialize = "minute", serialize = "m")]
    Minutes,
    #[strum(to_string = "hours", serialize = "hour", serialize = "h")]
    Hours,
    #[strum(to_string = "days", serialize = "day", serialize = "d")]
    Days,
}

impl TimeUnit {
    /// Length of `count` of this unit.
    #[must_use]
    pub const fn to_duration(self, count: u64) -> Duration {
        match self {
            TimeUnit::Nanoseconds => Duration::from_nanos(count),
            TimeUnit::Microseconds => Duration::from_micros(count),
            TimeUnit::Milliseconds => Duration::from_millis(count),
            TimeUnit::Seconds => Duration::from_secs(count),
            TimeUnit::Minutes => Duration::from_secs(count.saturating_mul(60)),
            TimeUnit::Hours => Duration::from_secs(count.saturating_mul(3_600)),
            TimeUnit::Days => Duration::from_secs(count.saturating_mul(86_400)),
        }
    }

    /// One unit; this is the window length a limiter built from this unit uses.
    #[must_use]
    pub const fn window(self) -> Duration {
        self.to_duration(1)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(TimeUnit::from_str("SECONDS").ok(), Some(TimeUnit::Seconds));
        assert_eq!(TimeUnit::from_str("minute").ok(), Some(TimeUnit::Minutes));
        assert_eq!(TimeUnit::from_str("ms").ok(), Some(TimeUnit::Milliseconds));
        assert!(TimeUnit::from_str("fortnights").is_err(), "unknown unit");
    }

    #[test]
    fn displays_plural_name() {
        assert_eq!(TimeUnit::Seconds.to_string(), "seconds");
        assert_eq!(TimeUnit::Days.to_string(), "days");
    }

    #[test]
    fn window_is_one_unit() {
        assert_eq!(TimeUnit::Seconds.window(), Duration::from_secs(1));
        assert_eq!(TimeUnit::Minutes.window(), Duration::from_secs(60));
        assert_eq!(TimeUnit::Milliseconds.window(), Duration::from_millis(1));
        assert_eq!(TimeUnit::Hours.to_duration(2), Duration::from_secs(7_200));
    }
}
