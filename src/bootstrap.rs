//! Wiring of the gateway's state owners and handlers.
//!
//! `build_gateway` takes the I/O adapters as trait objects so tests can
//! assemble the whole pipeline over in-memory stores and a mock backend.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::ai::{OpenAICompatibleConfig, OpenAICompatibleProvider};
use crate::adapters::attachments::HttpAttachmentFetcher;
use crate::adapters::clock::SystemClock;
use crate::adapters::discord::{DiscordClient, DiscordPoller, PollerSettings};
use crate::adapters::rate_limiter::{RateLimitConfig, SlidingWindowRateLimiter};
use crate::adapters::storage::JsonFileDocumentStore;
use crate::application::{
    AccessGate, AttachmentIngestor, AvailabilitySwitch, CommandOrchestrator, ConsentCoordinator,
    ConsentLedger, ControlHandler, ConversationStore, MessageDispatcher,
};
use crate::config::{self, AppConfig};
use crate::domain::access::{AdminPolicy, ACCEPTANCE_VALIDITY_DAYS, CONSENT_WINDOW_SECS};
use crate::domain::command::default_command_table;
use crate::domain::foundation::ValidationError;
use crate::ports::{AIError, AIProvider, AttachmentFetcher, Clock, DocumentStore, TransportError};

/// Errors raised while assembling the gateway.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ValidationError),

    #[error("invalid command table: {0}")]
    CommandTable(#[from] ValidationError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error("backend setup failed: {0}")]
    Backend(#[from] AIError),
}

/// Tunables for the access gate and orchestrator.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub rate_limits: RateLimitConfig,
    pub admins: AdminPolicy,
    pub consent_window_secs: u64,
    pub acceptance_validity_days: i64,
    pub backend_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            rate_limits: RateLimitConfig::default(),
            admins: AdminPolicy::new(Vec::new(), "Admin"),
            consent_window_secs: CONSENT_WINDOW_SECS,
            acceptance_validity_days: ACCEPTANCE_VALIDITY_DAYS,
            backend_timeout: Duration::from_secs(120),
        }
    }
}

impl GatewaySettings {
    /// Derives settings from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for malformed admin ids or unknown categories.
    pub fn from_config(config: &AppConfig) -> Result<Self, config::ValidationError> {
        let access = &config.access;
        let mut rate_limits = RateLimitConfig {
            default_limit: access.default_hourly_limit,
            ..RateLimitConfig::default()
        };
        for (category, limit) in access.category_limits()? {
            rate_limits = rate_limits.with_limit(category, limit);
        }

        Ok(Self {
            rate_limits,
            admins: AdminPolicy::new(access.admin_id_list()?, access.admin_role_name.clone()),
            consent_window_secs: access.consent_window_secs,
            acceptance_validity_days: access.acceptance_validity_days,
            backend_timeout: config.backend.timeout(),
        })
    }
}

/// The I/O seams the gateway runs over.
#[derive(Clone)]
pub struct GatewayDeps {
    pub store: Arc<dyn DocumentStore>,
    pub clock: Arc<dyn Clock>,
    pub provider: Arc<dyn AIProvider>,
    pub fetcher: Arc<dyn AttachmentFetcher>,
}

/// A fully wired gateway.
pub struct Gateway {
    pub dispatcher: Arc<MessageDispatcher>,
    pub gate: Arc<AccessGate>,
    pub conversations: Arc<ConversationStore>,
}

/// Loads persisted state and wires every handler.
///
/// # Errors
///
/// Returns `BootstrapError::CommandTable` if the built-in table is invalid.
pub async fn build_gateway(settings: GatewaySettings, deps: GatewayDeps) -> Result<Gateway, BootstrapError> {
    let GatewayDeps {
        store,
        clock,
        provider,
        fetcher,
    } = deps;

    // 1. Command table
    let table = Arc::new(default_command_table()?);

    // 2. Persisted state owners
    let availability = Arc::new(AvailabilitySwitch::load(store.clone(), clock.clone()).await);
    let rate_limiter = Arc::new(
        SlidingWindowRateLimiter::load(settings.rate_limits, store.clone(), clock.clone()).await,
    );
    let ledger = Arc::new(
        ConsentLedger::load(store.clone(), clock.clone())
            .await
            .with_validity_days(settings.acceptance_validity_days),
    );
    let consent = Arc::new(ConsentCoordinator::with_window(
        clock.clone(),
        settings.consent_window_secs,
    ));

    // 3. Handlers
    let gate = Arc::new(AccessGate::new(
        availability,
        rate_limiter,
        ledger,
        consent,
        clock.clone(),
    ));
    let conversations = Arc::new(ConversationStore::new());
    let orchestrator = Arc::new(CommandOrchestrator::new(
        gate.clone(),
        conversations.clone(),
        provider,
        AttachmentIngestor::new(fetcher),
        clock.clone(),
        settings.backend_timeout,
    ));
    let control = ControlHandler::new(
        gate.clone(),
        conversations.clone(),
        table.clone(),
        settings.admins,
        clock,
    );
    let dispatcher = Arc::new(MessageDispatcher::new(table, orchestrator, control));

    tracing::info!(
        commands = dispatcher.table().definitions().len(),
        "Gateway assembled"
    );

    Ok(Gateway {
        dispatcher,
        gate,
        conversations,
    })
}

/// Builds the production gateway and its Discord poller from configuration.
///
/// # Errors
///
/// Returns `BootstrapError` if configuration is invalid or a client cannot be built.
pub async fn build_discord_gateway(config: &AppConfig) -> Result<(Gateway, DiscordPoller), BootstrapError> {
    let settings = GatewaySettings::from_config(config)?;

    let backend = &config.backend;
    let provider = OpenAICompatibleProvider::new(
        OpenAICompatibleConfig::new(backend.api_key.clone())
            .with_base_url(backend.base_url.clone())
            .with_timeout(backend.timeout())
            .with_max_retries(backend.max_retries),
    )?;

    let deps = GatewayDeps {
        store: Arc::new(JsonFileDocumentStore::new(&config.storage.data_dir)),
        clock: Arc::new(SystemClock),
        provider: Arc::new(provider),
        fetcher: Arc::new(HttpAttachmentFetcher::new(backend.timeout())?),
    };
    let gateway = build_gateway(settings, deps).await?;

    let discord = &config.discord;
    let client = Arc::new(DiscordClient::new(
        discord.api_base.clone(),
        discord.bot_token.clone(),
        Duration::from_secs(30),
    )?);
    let poller = DiscordPoller::new(
        client,
        gateway.dispatcher.clone(),
        PollerSettings {
            channel_ids: discord.channel_id_list(),
            fetch_limit: discord.fetch_limit,
            poll_interval: discord.poll_interval(),
            max_message_chars: discord.max_message_chars,
        },
    );

    Ok((gateway, poller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessConfig;
    use crate::domain::command::CommandCategory;
    use crate::domain::foundation::UserId;

    #[test]
    fn settings_follow_access_config() {
        let mut config = AppConfig::default();
        config.access = AccessConfig {
            admin_ids: Some("1, 2".to_string()),
            default_hourly_limit: 7,
            hourly_limits: [("plus".to_string(), 3)].into_iter().collect(),
            ..AccessConfig::default()
        };

        let settings = GatewaySettings::from_config(&config).unwrap();

        assert_eq!(settings.rate_limits.default_limit, 7);
        assert_eq!(settings.rate_limits.limit_for(CommandCategory::Plus), 3);
        assert!(settings
            .admins
            .is_admin(&UserId::new("2").unwrap(), &[]));
        assert_eq!(settings.consent_window_secs, 300);
        assert_eq!(settings.acceptance_validity_days, 30);
    }

    #[test]
    fn unknown_category_limit_is_rejected() {
        let mut config = AppConfig::default();
        config.access.hourly_limits.insert("bogus".to_string(), 1);

        assert!(GatewaySettings::from_config(&config).is_err());
    }
}
