//! Discord transport configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Discord REST transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token sent as `Authorization: Bot <token>`
    #[serde(default)]
    pub bot_token: String,

    /// REST API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Channels to poll (comma-separated)
    pub channel_ids: Option<String>,

    /// Delay between polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Messages fetched per poll
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,

    /// Outbound chunk size in characters
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl DiscordConfig {
    /// Get channel ids as a vector
    pub fn channel_id_list(&self) -> Vec<String> {
        self.channel_ids
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate transport configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TUTOR_GATEWAY__DISCORD__BOT_TOKEN"));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("discord.api_base"));
        }
        if self.poll_interval_ms < 100 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.fetch_limit == 0 || self.fetch_limit > 100 {
            return Err(ValidationError::InvalidFetchLimit);
        }
        if self.max_message_chars == 0 || self.max_message_chars > 2000 {
            return Err(ValidationError::InvalidMessageSize);
        }
        Ok(())
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: default_api_base(),
            channel_ids: None,
            poll_interval_ms: default_poll_interval(),
            fetch_limit: default_fetch_limit(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_fetch_limit() -> u32 {
    50
}

fn default_max_message_chars() -> usize {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> DiscordConfig {
        DiscordConfig {
            bot_token: "token".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_channel_ids_parsing() {
        let config = DiscordConfig {
            channel_ids: Some("111, 222,,333 ".to_string()),
            ..configured()
        };
        assert_eq!(config.channel_id_list(), vec!["111", "222", "333"]);
        assert!(configured().channel_id_list().is_empty());
    }

    #[test]
    fn test_validation_missing_token() {
        assert_eq!(
            DiscordConfig::default().validate(),
            Err(ValidationError::MissingRequired("TUTOR_GATEWAY__DISCORD__BOT_TOKEN"))
        );
    }

    #[test]
    fn test_validation_message_size() {
        let config = DiscordConfig {
            max_message_chars: 2001,
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMessageSize));
    }

    #[test]
    fn test_validation_poll_interval() {
        let config = DiscordConfig {
            poll_interval_ms: 10,
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPollInterval));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
        assert_eq!(configured().poll_interval(), Duration::from_secs(2));
    }
}
