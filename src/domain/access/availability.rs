//! Global availability window.
//!
//! Persisted as `bot_state.json`:
//! `{"enabled": bool, "disable_until": <epoch-seconds|null>}`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Result of evaluating availability at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityCheck {
    /// Commands may run. `resumed` is true when this check flipped the
    /// state back on and the document needs saving.
    Available { resumed: bool },
    /// Commands are rejected until `resume_at`, or indefinitely when `None`.
    Unavailable { resume_at: Option<Timestamp> },
}

/// Whether the gateway accepts commands.
///
/// # Invariants
///
/// - `enabled == true` implies `disable_until == None`
/// - a past `disable_until` flips back to enabled on the next check, never
///   from a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityState {
    enabled: bool,
    #[serde(default, with = "super::epoch::option")]
    disable_until: Option<Timestamp>,
}

impl AvailabilityState {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            disable_until: None,
        }
    }

    /// Disabled until `until`, or until explicitly re-enabled when `None`.
    pub fn disabled(until: Option<Timestamp>) -> Self {
        Self {
            enabled: false,
            disable_until: until,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable_until(&self) -> Option<Timestamp> {
        self.disable_until
    }

    /// Evaluates the state at `now`, auto-resuming when the window has passed.
    pub fn check(&mut self, now: Timestamp) -> AvailabilityCheck {
        if self.enabled {
            return AvailabilityCheck::Available { resumed: false };
        }

        match self.disable_until {
            Some(until) if !now.is_before(&until) => {
                *self = Self::enabled();
                AvailabilityCheck::Available { resumed: true }
            }
            resume_at => AvailabilityCheck::Unavailable { resume_at },
        }
    }
}

impl Default for AvailabilityState {
    fn default() -> Self {
        Self::enabled()
    }
}
