//! Rate limit configuration types.
//!
//! Hourly limits per command category, with a fallback for categories
//! not listed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::access::RATE_WINDOW_SECS;
use crate::domain::command::{default_hourly_limit, CommandCategory};

/// Complete rate limit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sliding window length in seconds.
    pub window_secs: u64,
    /// Limit for categories without an entry in `limits`.
    pub default_limit: u32,
    /// Invocations allowed per window, by category.
    pub limits: HashMap<CommandCategory, u32>,
}

impl RateLimitConfig {
    /// Configured limit for a category.
    pub fn limit_for(&self, category: CommandCategory) -> u32 {
        self.limits
            .get(&category)
            .copied()
            .unwrap_or(self.default_limit)
    }

    /// Replaces the limit for one category.
    pub fn with_limit(mut self, category: CommandCategory, limit: u32) -> Self {
        self.limits.insert(category, limit);
        self
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: RATE_WINDOW_SECS,
            default_limit: 30,
            limits: CommandCategory::all()
                .into_iter()
                .map(|category| (category, default_hourly_limit(category)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_covers_every_category() {
        let config = RateLimitConfig::default();
        assert_eq!(config.window_secs, 3600);
        assert_eq!(config.limit_for(CommandCategory::Normal), 60);
        assert_eq!(config.limit_for(CommandCategory::ImagePlus), 5);
    }

    #[test]
    fn missing_category_uses_default_limit() {
        let mut config = RateLimitConfig::default();
        config.limits.clear();
        assert_eq!(config.limit_for(CommandCategory::Plus), 30);
    }

    #[test]
    fn with_limit_overrides_one_category() {
        let config = RateLimitConfig::default().with_limit(CommandCategory::Plus, 2);
        assert_eq!(config.limit_for(CommandCategory::Plus), 2);
        assert_eq!(config.limit_for(CommandCategory::Minus), 40);
    }
}
