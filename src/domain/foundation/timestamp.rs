//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a timestamp from Unix seconds.
    pub fn from_unix_secs(secs: u64) -> Self {
        Self::from_epoch_secs(secs as f64)
    }

    /// Creates a timestamp from fractional epoch seconds.
    ///
    /// Values outside chrono's representable range clamp to the epoch.
    pub fn from_epoch_secs(secs: f64) -> Self {
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
        let dt = Utc
            .timestamp_opt(whole as i64, nanos.min(999_999_999))
            .single()
            .unwrap_or_default();
        Self(dt)
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> u64 {
        self.0.timestamp().max(0) as u64
    }

    /// Returns the timestamp as fractional epoch seconds.
    pub fn as_epoch_secs(&self) -> f64 {
        self.0.timestamp() as f64 + f64::from(self.0.timestamp_subsec_nanos()) / 1_000_000_000.0
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    ///
    /// Saturates at the latest representable instant.
    pub fn plus_secs(&self, secs: u64) -> Self {
        self.shifted(i64::try_from(secs).ok().and_then(Duration::try_seconds), true)
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    ///
    /// Saturates at the earliest representable instant.
    pub fn minus_secs(&self, secs: u64) -> Self {
        self.shifted(
            i64::try_from(secs).ok().and_then(Duration::try_seconds).map(|d| -d),
            false,
        )
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days. Saturates at either end of the range.
    pub fn add_days(&self, days: i64) -> Self {
        self.shifted(Duration::try_days(days), days >= 0)
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        self.shifted(
            days.checked_neg().and_then(Duration::try_days),
            days <= 0,
        )
    }

    fn shifted(&self, delta: Option<Duration>, forward: bool) -> Self {
        let bound = if forward {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        };
        Self(
            delta
                .and_then(|d| self.0.checked_add_signed(d))
                .unwrap_or(bound),
        )
    }

    /// Whole seconds from `self` until `later`, rounded up, zero if already passed.
    pub fn secs_until(&self, later: &Timestamp) -> u64 {
        let millis = later.duration_since(self).num_milliseconds();
        if millis <= 0 {
            0
        } else {
            ((millis + 999) / 1000) as u64
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn timestamp_from_unix_secs_works() {
        // 2024-01-15T00:00:00Z
        let ts = Timestamp::from_unix_secs(1705276800);
        assert_eq!(ts.as_datetime().year(), 2024);
        assert_eq!(ts.as_datetime().month(), 1);
        assert_eq!(ts.as_datetime().day(), 15);
    }

    #[test]
    fn timestamp_as_unix_secs_roundtrips() {
        let unix_secs = 1705276800_u64;
        let ts = Timestamp::from_unix_secs(unix_secs);
        assert_eq!(ts.as_unix_secs(), unix_secs);
    }

    #[test]
    fn fractional_epoch_seconds_keep_subsecond_precision() {
        let ts = Timestamp::from_epoch_secs(1705276800.25);
        assert_eq!(ts.as_unix_secs(), 1705276800);
        assert!((ts.as_epoch_secs() - 1705276800.25).abs() < 1e-6);
    }

    #[test]
    fn plus_and_minus_secs_are_symmetric() {
        let ts = Timestamp::from_unix_secs(1000);
        assert_eq!(ts.plus_secs(60).as_unix_secs(), 1060);
        assert_eq!(ts.plus_secs(60).minus_secs(60), ts);
    }

    #[test]
    fn secs_until_rounds_up_and_floors_at_zero() {
        let start = Timestamp::from_epoch_secs(100.0);
        assert_eq!(start.secs_until(&Timestamp::from_epoch_secs(100.2)), 1);
        assert_eq!(start.secs_until(&Timestamp::from_epoch_secs(160.0)), 60);
        assert_eq!(start.secs_until(&Timestamp::from_epoch_secs(90.0)), 0);
    }

    #[test]
    fn huge_offsets_saturate_instead_of_overflowing() {
        let ts = Timestamp::from_unix_secs(1_700_000_000);
        assert_eq!(ts.plus_secs(u64::MAX).as_datetime(), &DateTime::<Utc>::MAX_UTC);
        assert_eq!(
            ts.plus_secs(60_000_000_000_000).as_datetime(),
            &DateTime::<Utc>::MAX_UTC
        );
        assert_eq!(ts.minus_secs(u64::MAX).as_datetime(), &DateTime::<Utc>::MIN_UTC);
        assert_eq!(ts.add_days(i64::MAX).as_datetime(), &DateTime::<Utc>::MAX_UTC);
        assert_eq!(ts.minus_days(i64::MIN).as_datetime(), &DateTime::<Utc>::MAX_UTC);
        assert!(ts.secs_until(&ts.plus_secs(u64::MAX)) > 0);
    }

    #[test]
    fn timestamp_ordering_works() {
        let ts1 = Timestamp::from_unix_secs(10);
        let ts2 = Timestamp::from_unix_secs(20);
        assert!(ts1 < ts2);
        assert!(ts1.is_before(&ts2));
        assert!(ts2.is_after(&ts1));
    }
}
