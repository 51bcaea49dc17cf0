//! ReplySink delivering to one Discord channel.

use async_trait::async_trait;
use std::sync::Arc;

use super::client::{chunk_text, DiscordClient, DISCORD_SAFE_MAX_CHARS};
use crate::ports::{OutboundReply, ReplySink, TransportError};

/// Posts replies into the channel a command came from.
///
/// Text and notices are chunked; an image reply is a single message.
pub struct DiscordReplySink {
    client: Arc<DiscordClient>,
    channel_id: String,
    max_chars: usize,
}

impl DiscordReplySink {
    pub fn new(client: Arc<DiscordClient>, channel_id: impl Into<String>, max_chars: usize) -> Self {
        Self {
            client,
            channel_id: channel_id.into(),
            max_chars: max_chars.clamp(1, DISCORD_SAFE_MAX_CHARS),
        }
    }
}

#[async_trait]
impl ReplySink for DiscordReplySink {
    async fn send(&self, reply: OutboundReply) -> Result<(), TransportError> {
        match reply {
            OutboundReply::Text(text) | OutboundReply::Notice(text) => {
                for chunk in chunk_text(&text, self.max_chars) {
                    self.client.create_message(&self.channel_id, &chunk).await?;
                }
                Ok(())
            }
            image @ OutboundReply::Image { .. } => {
                self.client
                    .create_message(&self.channel_id, &image.render())
                    .await
            }
        }
    }

    async fn typing(&self) -> Result<(), TransportError> {
        self.client.trigger_typing(&self.channel_id).await
    }
}
