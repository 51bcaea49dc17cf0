//! Sliding one-hour rate window per (user, category).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Length of the trailing rate window.
pub const RATE_WINDOW_SECS: u64 = 3600;

/// Outcome of trying to record one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The invocation was recorded.
    Recorded { remaining: u32 },
    /// The window is full.
    Limited { retry_after_secs: u64 },
}

/// Live window and optional admin override for one (user, category) pair.
///
/// Serialized as the per-category entry of `rate_limits.json`:
/// `{"expires": <epoch|null>, "limit": <n|null>, "timestamps": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// When the override in `limit` stops applying.
    #[serde(default, with = "super::epoch::option")]
    pub expires: Option<Timestamp>,
    /// Admin override of the category limit.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Invocation instants, oldest first.
    #[serde(default, with = "super::epoch::seq")]
    pub timestamps: Vec<Timestamp>,
}

impl RateLimitRecord {
    /// Drops instants that fell out of the window ending at `now`.
    pub fn prune(&mut self, now: Timestamp, window_secs: u64) {
        let window = window_secs as f64;
        let now_secs = now.as_epoch_secs();
        self.timestamps
            .retain(|ts| now_secs - ts.as_epoch_secs() < window);
    }

    /// Clears an override whose expiry has passed. Returns true if cleared.
    pub fn expire_override(&mut self, now: Timestamp) -> bool {
        match self.expires {
            Some(expires) if !now.is_before(&expires) => {
                self.expires = None;
                self.limit = None;
                true
            }
            _ => false,
        }
    }

    /// Sets an override, permanent when `expires` is `None`.
    pub fn set_override(&mut self, limit: u32, expires: Option<Timestamp>) {
        self.limit = Some(limit);
        self.expires = expires;
    }

    /// Number of live instants. Call [`prune`](Self::prune) first.
    pub fn count(&self) -> usize {
        self.timestamps.len()
    }

    /// A record without instants or override can be evicted.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty() && self.limit.is_none()
    }

    /// Prunes, then records `now` if fewer than `limit` instants remain.
    pub fn try_record(&mut self, now: Timestamp, limit: u32, window_secs: u64) -> RateDecision {
        self.prune(now, window_secs);

        if self.count() >= limit as usize {
            let retry_after_secs = self
                .timestamps
                .first()
                .map(|oldest| now.secs_until(&oldest.plus_secs(window_secs)))
                .unwrap_or(window_secs)
                .max(1);
            return RateDecision::Limited { retry_after_secs };
        }

        self.timestamps.push(now);
        RateDecision::Recorded {
            remaining: limit.saturating_sub(self.count() as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64) -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000 + secs)
    }

    #[test]
    fn window_fills_then_limits() {
        let mut record = RateLimitRecord::default();
        for _ in 0..5 {
            assert!(matches!(
                record.try_record(at(0), 5, RATE_WINDOW_SECS),
                RateDecision::Recorded { .. }
            ));
        }
        assert_eq!(
            record.try_record(at(10), 5, RATE_WINDOW_SECS),
            RateDecision::Limited {
                retry_after_secs: 3590
            }
        );
        assert_eq!(record.count(), 5);
    }

    #[test]
    fn instants_older_than_an_hour_are_pruned() {
        let mut record = RateLimitRecord::default();
        for _ in 0..5 {
            record.try_record(at(0), 5, RATE_WINDOW_SECS);
        }

        let decision = record.try_record(at(3601), 5, RATE_WINDOW_SECS);
        assert_eq!(decision, RateDecision::Recorded { remaining: 4 });
        assert_eq!(record.timestamps, vec![at(3601)]);
    }

    #[test]
    fn instant_exactly_one_window_old_is_pruned() {
        let mut record = RateLimitRecord::default();
        record.try_record(at(0), 1, RATE_WINDOW_SECS);
        record.prune(at(3600), RATE_WINDOW_SECS);
        assert_eq!(record.count(), 0);
    }

    #[test]
    fn zero_limit_always_limits() {
        let mut record = RateLimitRecord::default();
        assert_eq!(
            record.try_record(at(0), 0, RATE_WINDOW_SECS),
            RateDecision::Limited {
                retry_after_secs: RATE_WINDOW_SECS
            }
        );
    }

    #[test]
    fn override_expires_lazily() {
        let mut record = RateLimitRecord::default();
        record.set_override(2, Some(at(60)));

        assert!(!record.expire_override(at(59)));
        assert_eq!(record.limit, Some(2));

        assert!(record.expire_override(at(60)));
        assert_eq!(record.limit, None);
        assert!(record.is_empty());
    }

    #[test]
    fn permanent_override_never_expires() {
        let mut record = RateLimitRecord::default();
        record.set_override(3, None);
        assert!(!record.expire_override(at(1_000_000)));
        assert!(!record.is_empty());
    }

    #[test]
    fn deserializes_sparse_original_entries() {
        let record: RateLimitRecord = serde_json::from_str(r#"{"expires": null}"#).unwrap();
        assert!(record.is_empty());
    }
}
