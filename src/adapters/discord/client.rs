//! Thin Discord REST client.

use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::cmp::Ordering;
use std::time::Duration;

use super::model::{DiscordChannel, DiscordMember, DiscordMessage, DiscordRole};
use crate::ports::TransportError;

/// Discord rejects message bodies longer than this.
pub const DISCORD_SAFE_MAX_CHARS: usize = 2000;

/// Authenticated client for the handful of endpoints the gateway uses.
pub struct DiscordClient {
    client: Client,
    api_base: String,
    token: Secret<String>,
}

impl DiscordClient {
    /// # Errors
    ///
    /// Returns `TransportError::Network` if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim().trim_end_matches('/').to_string(),
            token: Secret::new(token.into()),
        })
    }

    /// Messages in a channel, newest first as Discord returns them.
    pub async fn fetch_messages(
        &self,
        channel_id: &str,
        after: Option<&str>,
        limit: u32,
    ) -> Result<Vec<DiscordMessage>, TransportError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let mut request = self.client.get(url).query(&[("limit", limit.to_string())]);
        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }
        decode(self.send(request).await?).await
    }

    pub async fn create_message(&self, channel_id: &str, content: &str) -> Result<(), TransportError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        self.send(self.client.post(url).json(&json!({ "content": content })))
            .await
            .map(|_| ())
    }

    pub async fn trigger_typing(&self, channel_id: &str) -> Result<(), TransportError> {
        let url = format!("{}/channels/{}/typing", self.api_base, channel_id);
        self.send(self.client.post(url)).await.map(|_| ())
    }

    pub async fn channel(&self, channel_id: &str) -> Result<DiscordChannel, TransportError> {
        let url = format!("{}/channels/{}", self.api_base, channel_id);
        decode(self.send(self.client.get(url)).await?).await
    }

    pub async fn member(&self, guild_id: &str, user_id: &str) -> Result<DiscordMember, TransportError> {
        let url = format!("{}/guilds/{}/members/{}", self.api_base, guild_id, user_id);
        decode(self.send(self.client.get(url)).await?).await
    }

    pub async fn guild_roles(&self, guild_id: &str) -> Result<Vec<DiscordRole>, TransportError> {
        let url = format!("{}/guilds/{}/roles", self.api_base, guild_id);
        decode(self.send(self.client.get(url)).await?).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request
            .header("authorization", format!("Bot {}", self.token.expose_secret()))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    response
        .json()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

/// Orders snowflake ids numerically, falling back to string order.
pub fn compare_message_ids(left: &str, right: &str) -> Ordering {
    match (left.parse::<u128>(), right.parse::<u128>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => left.cmp(right),
    }
}

pub fn is_newer_message(candidate: &str, previous: Option<&str>) -> bool {
    let Some(previous) = previous else {
        return !candidate.trim().is_empty();
    };
    compare_message_ids(candidate.trim(), previous.trim()).is_gt()
}

/// Splits text into chunks of at most `max_chars` characters.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for ch in text.chars() {
        current.push(ch);
        current_len += 1;
        if current_len >= max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
