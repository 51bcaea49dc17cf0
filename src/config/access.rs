//! Access control configuration (admins, rate limits, consent)

use serde::Deserialize;
use std::collections::HashMap;

use super::error::ValidationError;
use crate::domain::command::CommandCategory;
use crate::domain::foundation::UserId;

/// A consent prompt stays open at most a day.
const MAX_CONSENT_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Acceptances are valid at most ten years.
const MAX_ACCEPTANCE_VALIDITY_DAYS: i64 = 3650;

/// Access control configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Admin user ids (comma-separated)
    pub admin_ids: Option<String>,

    /// Role name granting admin rights
    #[serde(default = "default_admin_role")]
    pub admin_role_name: String,

    /// Hourly limit for categories without an explicit one
    #[serde(default = "default_hourly_limit")]
    pub default_hourly_limit: u32,

    /// Per-category hourly limits, overriding the built-in table
    #[serde(default)]
    pub hourly_limits: HashMap<String, u32>,

    /// Seconds a consent prompt stays open
    #[serde(default = "default_consent_window")]
    pub consent_window_secs: u64,

    /// Days an acceptance stays valid
    #[serde(default = "default_acceptance_validity")]
    pub acceptance_validity_days: i64,
}

impl AccessConfig {
    /// Get admin ids as user ids, skipping blanks
    pub fn admin_id_list(&self) -> Result<Vec<UserId>, ValidationError> {
        self.admin_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| UserId::new(s).map_err(|_| ValidationError::InvalidUserId("access.admin_ids")))
            .collect()
    }

    /// Get configured per-category limits
    pub fn category_limits(&self) -> Result<HashMap<CommandCategory, u32>, ValidationError> {
        self.hourly_limits
            .iter()
            .map(|(name, limit)| {
                name.parse::<CommandCategory>()
                    .map(|category| (category, *limit))
                    .map_err(|_| ValidationError::UnknownCategory(name.clone()))
            })
            .collect()
    }

    /// Validate access configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.admin_id_list()?;
        self.category_limits()?;
        if self.consent_window_secs == 0 || self.consent_window_secs > MAX_CONSENT_WINDOW_SECS {
            return Err(ValidationError::InvalidTimeout("access.consent_window_secs"));
        }
        if self.acceptance_validity_days <= 0
            || self.acceptance_validity_days > MAX_ACCEPTANCE_VALIDITY_DAYS
        {
            return Err(ValidationError::InvalidTimeout("access.acceptance_validity_days"));
        }
        Ok(())
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_ids: None,
            admin_role_name: default_admin_role(),
            default_hourly_limit: default_hourly_limit(),
            hourly_limits: HashMap::new(),
            consent_window_secs: default_consent_window(),
            acceptance_validity_days: default_acceptance_validity(),
        }
    }
}

fn default_admin_role() -> String {
    "Admin".to_string()
}

fn default_hourly_limit() -> u32 {
    30
}

fn default_consent_window() -> u64 {
    300
}

fn default_acceptance_validity() -> i64 {
    30
}
