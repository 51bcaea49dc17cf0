//! Consent acceptance records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Days an acceptance stays valid.
pub const ACCEPTANCE_VALIDITY_DAYS: i64 = 30;

/// When a user last accepted the terms for standard-mode commands.
///
/// Serialized as a bare epoch-seconds number, the value type of
/// `user_acceptances.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcceptanceRecord {
    #[serde(with = "super::epoch")]
    accepted_at: Timestamp,
}

impl AcceptanceRecord {
    pub fn new(accepted_at: Timestamp) -> Self {
        Self { accepted_at }
    }

    pub fn accepted_at(&self) -> Timestamp {
        self.accepted_at
    }

    /// True while no more than `validity_days` have elapsed since acceptance.
    ///
    /// Evaluated at use time; records are never swept.
    pub fn is_valid_at(&self, now: Timestamp, validity_days: i64) -> bool {
        !now.is_after(&self.accepted_at.add_days(validity_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_29_days_ago_is_valid() {
        let now = Timestamp::from_unix_secs(1_700_000_000);
        let record = AcceptanceRecord::new(now.minus_days(29));
        assert!(record.is_valid_at(now, ACCEPTANCE_VALIDITY_DAYS));
    }

    #[test]
    fn record_from_31_days_ago_is_invalid() {
        let now = Timestamp::from_unix_secs(1_700_000_000);
        let record = AcceptanceRecord::new(now.minus_days(31));
        assert!(!record.is_valid_at(now, ACCEPTANCE_VALIDITY_DAYS));
    }

    #[test]
    fn serializes_as_bare_number() {
        let record = AcceptanceRecord::new(Timestamp::from_epoch_secs(1705276800.5));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, "1705276800.5");

        let back: AcceptanceRecord = serde_json::from_str("1705276800").unwrap();
        assert_eq!(back.accepted_at(), Timestamp::from_unix_secs(1705276800));
    }
}
