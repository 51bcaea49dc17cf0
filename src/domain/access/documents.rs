//! Persisted document schemas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::acceptance::AcceptanceRecord;
use super::availability::AvailabilityState;
use super::rate_window::RateLimitRecord;
use crate::domain::command::CommandCategory;
use crate::domain::foundation::{Timestamp, UserId};

/// The three documents kept in durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateDocument {
    RateLimits,
    Availability,
    Acceptances,
}

impl StateDocument {
    /// File name of the document.
    pub fn file_name(&self) -> &'static str {
        match self {
            StateDocument::RateLimits => "rate_limits.json",
            StateDocument::Availability => "bot_state.json",
            StateDocument::Acceptances => "user_acceptances.json",
        }
    }

    pub fn all() -> [StateDocument; 3] {
        [
            StateDocument::RateLimits,
            StateDocument::Availability,
            StateDocument::Acceptances,
        ]
    }
}

/// Global per-category limit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalLimit {
    pub limit: u32,
}

/// `rate_limits.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimitsDocument {
    #[serde(default)]
    pub global: BTreeMap<CommandCategory, GlobalLimit>,
    #[serde(default)]
    pub users: BTreeMap<UserId, BTreeMap<CommandCategory, RateLimitRecord>>,
}

impl RateLimitsDocument {
    pub fn global_limit(&self, category: CommandCategory) -> Option<u32> {
        self.global.get(&category).map(|g| g.limit)
    }

    pub fn record(&self, user_id: &UserId, category: CommandCategory) -> Option<&RateLimitRecord> {
        self.users.get(user_id).and_then(|records| records.get(&category))
    }

    /// Record for the pair, created empty if absent.
    pub fn record_mut(&mut self, user_id: &UserId, category: CommandCategory) -> &mut RateLimitRecord {
        self.users
            .entry(user_id.clone())
            .or_default()
            .entry(category)
            .or_default()
    }

    /// Drops lapsed instants and overrides from every record, then evicts
    /// empty records and users left with none. Returns the users evicted.
    pub fn prune_stale(&mut self, now: Timestamp, window_secs: u64) -> usize {
        let before = self.users.len();
        self.users.retain(|_, records| {
            records.retain(|_, record| {
                record.expire_override(now);
                record.prune(now, window_secs);
                !record.is_empty()
            });
            !records.is_empty()
        });
        before - self.users.len()
    }

    /// Removes the pair's record unconditionally.
    pub fn remove(&mut self, user_id: &UserId, category: CommandCategory) -> bool {
        let removed = self
            .users
            .get_mut(user_id)
            .and_then(|records| records.remove(&category))
            .is_some();
        if self.users.get(user_id).is_some_and(BTreeMap::is_empty) {
            self.users.remove(user_id);
        }
        removed
    }
}

/// `bot_state.json`.
pub type AvailabilityDocument = AvailabilityState;

/// `user_acceptances.json`.
pub type AcceptancesDocument = BTreeMap<UserId, AcceptanceRecord>;
