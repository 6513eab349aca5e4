//! Storage precision helpers.
//!
//! Durations are persisted as whole seconds and timestamps as epoch
//! milliseconds. Entities normalise through these helpers on every write so a
//! freshly built value compares equal to the copy read back from storage.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Drops the sub-second part of a duration.
pub fn whole_seconds(duration: Duration) -> Duration {
    Duration::from_secs(duration.as_secs())
}

/// Truncates a timestamp to millisecond precision.
pub fn millisecond_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = at.timestamp_subsec_nanos() % 1_000_000;
    at - TimeDelta::nanoseconds(i64::from(nanos))
}

/// Current time at storage precision.
pub fn now() -> DateTime<Utc> {
    millisecond_precision(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds_truncates() {
        assert_eq!(
            whole_seconds(Duration::from_millis(90_999)),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_millisecond_precision_roundtrips_through_millis() {
        let at = DateTime::from_timestamp(1_700_000_000, 123_456_789).expect("valid timestamp");
        let truncated = millisecond_precision(at);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(
            DateTime::from_timestamp_millis(truncated.timestamp_millis()),
            Some(truncated)
        );
    }
}
