//! OpenAI-compatible Provider - AIProvider over a `/chat/completions` API.
//!
//! The default backend is Poe's OpenAI-compatible endpoint, but any server
//! speaking the same protocol works. The model is chosen per request.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAICompatibleConfig::new(api_key)
//!     .with_base_url("https://api.poe.com/v1")
//!     .with_max_retries(2);
//!
//! let provider = OpenAICompatibleProvider::new(config)?;
//! ```
//!
//! # Content
//!
//! Text-only messages are sent with plain string content. Messages carrying
//! images use the array form with `text` and `image_url` parts.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::ContentPart;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, TokenUsage,
};

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAICompatibleConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.poe.com/v1".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Chat-completions provider.
pub struct OpenAICompatibleProvider {
    config: OpenAICompatibleConfig,
    client: Client,
}

impl OpenAICompatibleProvider {
    /// Creates a provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Sends a request.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let wire_request = to_wire_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses a response, mapping error statuses.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status.as_u16(), &body));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        into_completion(wire)
    }
}

#[async_trait]
impl AIProvider for OpenAICompatibleProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut last_error = AIError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            let attempt = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match attempt {
                Ok(completion) => return Ok(completion),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    tracing::debug!(
                        "Backend call for {} failed (attempt {}), retrying: {}",
                        request.metadata.trace_id,
                        retry_count + 1,
                        err
                    );
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count.min(5));
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }
}

/// Maps a non-success status to an error.
fn map_error_status(status: u16, body: &str) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(body)),
        400 | 404 | 422 => AIError::InvalidRequest(error_message(body)),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, error_message(body))),
        _ => AIError::network(format!("Unexpected status {}: {}", status, error_message(body))),
    }
}

/// Extracts `error.message` from an error body, or returns the body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Parses "try again in Xs" from an error body. Defaults to 30 seconds.
fn parse_retry_after(body: &str) -> u32 {
    let message = error_message(body);
    message
        .find("try again in ")
        .map(|idx| &message[idx + "try again in ".len()..])
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(30)
}

fn to_wire_request(request: &CompletionRequest) -> WireRequest {
    WireRequest {
        model: request.model.clone(),
        messages: request.messages.iter().map(to_wire_message).collect(),
    }
}

fn to_wire_message(message: &Message) -> WireMessage {
    let role = match message.role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    };

    let content = match message.plain_text() {
        Some(text) => WireContent::Text(text),
        None => WireContent::Parts(
            message
                .content
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => WirePart::Text { text: text.clone() },
                    ContentPart::Image { url } => WirePart::ImageUrl {
                        image_url: WireImageUrl { url: url.clone() },
                    },
                })
                .collect(),
        ),
    };

    WireMessage {
        role: role.to_string(),
        content,
    }
}

fn into_completion(wire: WireResponse) -> Result<CompletionResponse, AIError> {
    let choice = wire
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| AIError::parse("Response message has no content"))?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("stop") | None => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some(_) => FinishReason::Other,
    };

    let usage = wire
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(CompletionResponse {
        content,
        model: wire.model.unwrap_or_default(),
        finish_reason,
        usage,
    })
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: WireContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: WireImageUrl },
}

#[derive(Debug, Serialize)]
struct WireImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::RequestMetadata;
    use serde_json::json;

    fn request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest::new(
            "tester-kimi-k2-non",
            RequestMetadata::new(UserId::new("1").unwrap(), "trace"),
        )
        .with_messages(messages)
    }

    // ─── Configuration ────────────────────────────────────────────────────

    #[test]
    fn config_builder_works() {
        let config = OpenAICompatibleConfig::new("test-key")
            .with_base_url("https://custom.api.com/v1/")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn completions_url_appends_path() {
        let provider = OpenAICompatibleProvider::new(OpenAICompatibleConfig::new("k")).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.poe.com/v1/chat/completions"
        );
    }

    // ─── Request encoding ─────────────────────────────────────────────────

    #[test]
    fn text_messages_use_string_content() {
        let wire = to_wire_request(&request(vec![
            Message::system("Be a tutor"),
            Message::user_text("Hello"),
        ]));
        let value = serde_json::to_value(&wire).unwrap();

        assert_eq!(
            value,
            json!({
                "model": "tester-kimi-k2-non",
                "messages": [
                    {"role": "system", "content": "Be a tutor"},
                    {"role": "user", "content": "Hello"}
                ]
            })
        );
    }

    #[test]
    fn image_parts_use_array_content() {
        let message = Message::new(
            MessageRole::User,
            vec![
                ContentPart::text("what is this"),
                ContentPart::image("data:image/jpeg;base64,AAAA"),
            ],
        );
        let value = serde_json::to_value(to_wire_message(&message)).unwrap();

        assert_eq!(
            value["content"],
            json!([
                {"type": "text", "text": "what is this"},
                {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,AAAA"}}
            ])
        );
    }

    // ─── Response decoding ────────────────────────────────────────────────

    #[test]
    fn decodes_completion() {
        let wire: WireResponse = serde_json::from_value(json!({
            "model": "tester-kimi-k2-non",
            "choices": [{"message": {"role": "assistant", "content": "4"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11}
        }))
        .unwrap();

        let completion = into_completion(wire).unwrap();
        assert_eq!(completion.content, "4");
        assert_eq!(completion.finish_reason, FinishReason::Stop);
        assert_eq!(completion.usage.total_tokens, 11);
    }

    #[test]
    fn empty_choices_is_parse_error() {
        let wire: WireResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(into_completion(wire), Err(AIError::Parse(_))));
    }

    #[test]
    fn null_content_is_parse_error() {
        let wire: WireResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert!(matches!(into_completion(wire), Err(AIError::Parse(_))));
    }

    // ─── Error mapping ────────────────────────────────────────────────────

    #[test]
    fn status_codes_map_to_errors() {
        assert_eq!(map_error_status(401, ""), AIError::AuthenticationFailed);
        assert!(matches!(
            map_error_status(400, r#"{"error":{"message":"unknown model"}}"#),
            AIError::InvalidRequest(m) if m == "unknown model"
        ));
        assert!(map_error_status(503, "down").is_retryable());
        assert!(matches!(
            map_error_status(429, ""),
            AIError::RateLimited { retry_after_secs: 30 }
        ));
    }

    #[test]
    fn parse_retry_after_from_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12 seconds."}}"#;
        assert_eq!(parse_retry_after(body), 12);
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(parse_retry_after(r#"{"error":{"message":"Something went wrong"}}"#), 30);
    }
}
