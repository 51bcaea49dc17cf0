//! Channel poller feeding Discord messages into the dispatcher.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::client::{compare_message_ids, is_newer_message, DiscordClient};
use super::model::DiscordMessage;
use super::roles::RoleResolver;
use super::sink::DiscordReplySink;
use crate::application::{DispatchOutcome, InboundEvent, InboundMessage, MessageDispatcher};
use crate::domain::foundation::UserId;
use crate::ports::{AttachmentRef, TransportError};

/// Polling settings.
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub channel_ids: Vec<String>,
    pub fetch_limit: u32,
    pub poll_interval: Duration,
    pub max_message_chars: usize,
}

/// Polls channels and dispatches each new message on its own task.
///
/// The first poll of a channel only records the newest id, so history from
/// before startup is never replayed.
pub struct DiscordPoller {
    client: Arc<DiscordClient>,
    dispatcher: Arc<MessageDispatcher>,
    roles: Arc<RoleResolver>,
    settings: PollerSettings,
    last_seen: HashMap<String, String>,
    baselined: HashSet<String>,
}

impl DiscordPoller {
    pub fn new(
        client: Arc<DiscordClient>,
        dispatcher: Arc<MessageDispatcher>,
        settings: PollerSettings,
    ) -> Self {
        Self {
            roles: Arc::new(RoleResolver::new(client.clone())),
            client,
            dispatcher,
            settings,
            last_seen: HashMap::new(),
            baselined: HashSet::new(),
        }
    }

    /// Polls until `shutdown` resolves.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        tracing::info!(channels = ?self.settings.channel_ids, "Discord poller started");

        loop {
            self.poll_once().await;
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Discord poller stopping");
                    return;
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }
    }

    /// One pass over every channel. Returns the spawned dispatch tasks.
    pub async fn poll_once(&mut self) -> Vec<JoinHandle<DispatchOutcome>> {
        let mut tasks = Vec::new();
        for channel_id in self.settings.channel_ids.clone() {
            match self.poll_channel(&channel_id).await {
                Ok(mut spawned) => tasks.append(&mut spawned),
                Err(e) => tracing::warn!("Polling channel {} failed: {}", channel_id, e),
            }
        }
        tasks
    }

    async fn poll_channel(
        &mut self,
        channel_id: &str,
    ) -> Result<Vec<JoinHandle<DispatchOutcome>>, TransportError> {
        let previous = self.last_seen.get(channel_id).cloned();
        let mut messages = self
            .client
            .fetch_messages(channel_id, previous.as_deref(), self.settings.fetch_limit)
            .await?;
        messages.sort_by(|left, right| compare_message_ids(&left.id, &right.id));

        if let Some(newest) = messages.last() {
            if is_newer_message(&newest.id, previous.as_deref()) {
                self.last_seen.insert(channel_id.to_string(), newest.id.trim().to_string());
            }
        }

        if self.baselined.insert(channel_id.to_string()) {
            tracing::debug!(channel_id, skipped = messages.len(), "Channel baseline recorded");
            return Ok(Vec::new());
        }

        let mut tasks = Vec::new();
        for message in messages {
            if message.author.bot || !is_newer_message(&message.id, previous.as_deref()) {
                continue;
            }
            if let Some(task) = self.spawn_dispatch(channel_id, message) {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    fn spawn_dispatch(
        &self,
        channel_id: &str,
        message: DiscordMessage,
    ) -> Option<JoinHandle<DispatchOutcome>> {
        let author_id = match UserId::new(message.author.id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping message {} with bad author: {}", message.id, e);
                return None;
            }
        };

        let dispatcher = self.dispatcher.clone();
        let roles = self.roles.clone();
        let sink = DiscordReplySink::new(
            self.client.clone(),
            channel_id,
            self.settings.max_message_chars,
        );
        let channel_id = channel_id.to_string();

        Some(tokio::spawn(async move {
            let author_roles = if dispatcher.needs_roles(&message.content) {
                roles.role_names(&channel_id, author_id.as_str()).await
            } else {
                Vec::new()
            };
            let event = InboundEvent::Message(InboundMessage {
                author_id,
                author_name: message.author.username,
                author_roles,
                text: message.content,
                attachments: message
                    .attachments
                    .into_iter()
                    .map(|a| AttachmentRef::new(a.filename, a.url))
                    .collect(),
            });
            dispatcher.dispatch(event, &sink).await
        }))
    }
}
