use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Timestamp encoding expected by the collector
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampType {
    /// Whole unix seconds
    Seconds,
    /// Unix time as 32.32 fixed point (seconds scaled by 2^32)
    #[default]
    #[serde(alias = "uint64")]
    FixedPoint,
}

/// Current time in the given encoding
pub fn current_time(kind: TimestampType) -> u64 {
    to_timestamp(Utc::now(), kind)
}

/// Encode `at` for the collector. Times before the epoch clamp to zero.
pub fn to_timestamp(at: DateTime<Utc>, kind: TimestampType) -> u64 {
    let secs = at.timestamp();
    if secs < 0 {
        return 0;
    }
    let secs = secs as u64;

    match kind {
        TimestampType::Seconds => secs,
        TimestampType::FixedPoint => {
            let frac = (u64::from(at.timestamp_subsec_nanos()) << 32) / 1_000_000_000;
            (secs << 32) | frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn seconds_are_unix_time() {
        let at = Utc.timestamp_opt(1_416_002_226, 0).unwrap();
        assert_eq!(to_timestamp(at, TimestampType::Seconds), 1_416_002_226);
    }

    #[test]
    fn fixed_point_scales_by_two_to_the_32() {
        let at = Utc.timestamp_opt(1_416_002_226, 500_000_000).unwrap();
        let ts = to_timestamp(at, TimestampType::FixedPoint);
        assert_eq!(ts >> 32, 1_416_002_226);
        assert_eq!(ts & 0xffff_ffff, 1 << 31);
    }

    #[test]
    fn pre_epoch_clamps_to_zero() {
        let at = Utc.timestamp_opt(-10, 0).unwrap();
        assert_eq!(to_timestamp(at, TimestampType::Seconds), 0);
    }

    #[test]
    fn current_time_is_monotone_enough() {
        let a = current_time(TimestampType::Seconds);
        let b = current_time(TimestampType::Seconds);
        assert!(b >= a);
        assert!(current_time(TimestampType::FixedPoint) >> 32 >= a);
    }
}
