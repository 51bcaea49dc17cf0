//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TUTOR_GATEWAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use tutor_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Liveness endpoint on {}", config.server.socket_addr().unwrap());
//! ```

mod access;
mod backend;
mod discord;
mod error;
mod server;
mod storage;

pub use access::AccessConfig;
pub use backend::BackendConfig;
pub use discord::DiscordConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (liveness bind address, environment, log filter)
    #[serde(default)]
    pub server: ServerConfig,

    /// Model backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Discord transport configuration
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Admins, rate limits and consent
    #[serde(default)]
    pub access: AccessConfig,

    /// Persisted document location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TUTOR_GATEWAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TUTOR_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TUTOR_GATEWAY__ACCESS__HOURLY_LIMITS__PLUS=10` -> `access.hourly_limits.plus = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TUTOR_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Missing credentials (backend API key, bot token) are reported here,
    /// so the binary can refuse to start.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.backend.validate()?;
        self.discord.validate()?;
        self.access.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
