//! CommandOrchestrator - runs a resolved command through the gate and the backend.

use std::sync::Arc;
use std::time::Duration;

use crate::application::access::AccessGate;
use crate::application::ConversationStore;
use crate::domain::access::GateError;
use crate::domain::command::CommandDefinition;
use crate::domain::conversation::{ContentPart, ConversationTurn, TUTOR_SYSTEM_PROMPT};
use crate::domain::foundation::UserId;
use crate::ports::{
    AIError, AIProvider, AttachmentRef, Clock, CompletionRequest, CompletionResponse, Message,
    OutboundReply, ReplySink, RequestMetadata,
};

use super::AttachmentIngestor;

/// Query used when a chat command carries no text.
pub const DEFAULT_CHAT_QUERY: &str = "Hello";

/// Query used when an image command carries no text.
pub const DEFAULT_IMAGE_QUERY: &str = "AI Art";

/// A resolved command ready to run.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub user_id: UserId,
    /// Display name used in image captions.
    pub user_name: String,
    pub definition: CommandDefinition,
    pub query: String,
    pub attachments: Vec<AttachmentRef>,
}

/// Outcome of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// The backend answered and the reply was handed to the sink.
    Delivered(OutboundReply),
    /// The backend failed; the error text was handed to the sink instead.
    Failed { reply: OutboundReply, error: AIError },
    /// The gate refused the command; its notice was handed to the sink.
    Rejected(GateError),
}

/// Composes the access gate, conversation history and backend.
pub struct CommandOrchestrator {
    gate: Arc<AccessGate>,
    conversations: Arc<ConversationStore>,
    provider: Arc<dyn AIProvider>,
    attachments: AttachmentIngestor,
    clock: Arc<dyn Clock>,
    backend_timeout: Duration,
}

impl CommandOrchestrator {
    pub fn new(
        gate: Arc<AccessGate>,
        conversations: Arc<ConversationStore>,
        provider: Arc<dyn AIProvider>,
        attachments: AttachmentIngestor,
        clock: Arc<dyn Clock>,
        backend_timeout: Duration,
    ) -> Self {
        Self {
            gate,
            conversations,
            provider,
            attachments,
            clock,
            backend_timeout,
        }
    }

    pub async fn handle(&self, cmd: CommandInvocation, sink: &dyn ReplySink) -> DeliveryResult {
        // 1. Gate (persists the rate window and any acceptance before the backend call)
        if let Err(e) = self.gate.check(&cmd.user_id, &cmd.definition, sink).await {
            tracing::debug!(
                user_id = %cmd.user_id,
                alias = cmd.definition.alias(),
                "Command rejected: {}",
                e
            );
            deliver(sink, OutboundReply::Notice(e.notice(self.clock.now()))).await;
            return DeliveryResult::Rejected(e);
        }

        // 2. Signal progress
        if let Err(e) = sink.typing().await {
            tracing::warn!("Failed to send typing indicator: {}", e);
        }

        // 3. Call the backend
        let outcome = if cmd.definition.is_image() {
            self.generate_image(&cmd).await
        } else {
            self.chat(&cmd).await
        };

        // 4. Deliver
        match outcome {
            Ok(reply) => {
                deliver(sink, reply.clone()).await;
                DeliveryResult::Delivered(reply)
            }
            Err(error) => {
                tracing::warn!(
                    user_id = %cmd.user_id,
                    model = cmd.definition.model_id(),
                    "Backend call failed: {}",
                    error
                );
                let reply = OutboundReply::Text(format!("Error: {}", error));
                deliver(sink, reply.clone()).await;
                DeliveryResult::Failed { reply, error }
            }
        }
    }

    /// Image commands never touch conversation history.
    async fn generate_image(&self, cmd: &CommandInvocation) -> Result<OutboundReply, AIError> {
        let query = non_empty_or(&cmd.query, DEFAULT_IMAGE_QUERY);
        let request = CompletionRequest::new(cmd.definition.model_id(), self.metadata(cmd))
            .with_message(Message::user_text(query));

        let response = self.complete(request).await?;
        Ok(OutboundReply::Image {
            caption: format!("🎨 **{}'s Image:**", cmd.user_name),
            content: response.content,
        })
    }

    async fn chat(&self, cmd: &CommandInvocation) -> Result<OutboundReply, AIError> {
        let mode = cmd.definition.mode();
        let query = non_empty_or(&cmd.query, DEFAULT_CHAT_QUERY);

        let mut content = vec![ContentPart::text(query)];
        content.extend(self.attachments.ingest(&cmd.attachments).await);
        self.conversations
            .append_turn(&cmd.user_id, mode, ConversationTurn::user(content))
            .await;

        let system_prompt = mode.uses_system_prompt().then_some(TUTOR_SYSTEM_PROMPT);
        let prompt = self
            .conversations
            .build_prompt(&cmd.user_id, mode, system_prompt)
            .await;

        let request = CompletionRequest::new(cmd.definition.model_id(), self.metadata(cmd))
            .with_messages(prompt);
        let response = self.complete(request).await?;

        self.conversations
            .append_turn(&cmd.user_id, mode, ConversationTurn::assistant(response.content.clone()))
            .await;
        Ok(OutboundReply::Text(response.content))
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        match tokio::time::timeout(self.backend_timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(AIError::Timeout {
                timeout_secs: self.backend_timeout.as_secs(),
            }),
        }
    }

    fn metadata(&self, cmd: &CommandInvocation) -> RequestMetadata {
        RequestMetadata::new(cmd.user_id.clone(), uuid::Uuid::new_v4().to_string())
    }

    pub fn conversations(&self) -> &Arc<ConversationStore> {
        &self.conversations
    }

    pub fn gate(&self) -> &Arc<AccessGate> {
        &self.gate
    }
}

fn non_empty_or<'a>(query: &'a str, default: &'a str) -> &'a str {
    if query.trim().is_empty() {
        default
    } else {
        query
    }
}

async fn deliver(sink: &dyn ReplySink, reply: OutboundReply) {
    if let Err(e) = sink.send(reply).await {
        tracing::warn!("Failed to deliver reply: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::attachments::StaticAttachmentFetcher;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::rate_limiter::{RateLimitConfig, SlidingWindowRateLimiter};
    use crate::adapters::reply::RecordingReplySink;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::application::access::{AvailabilitySwitch, ConsentCoordinator, ConsentLedger};
    use crate::domain::command::{default_command_table, CommandCategory, ConversationMode};
    use crate::domain::foundation::Timestamp;
    use crate::ports::{DocumentStore, MessageRole};

    struct Fixture {
        orchestrator: CommandOrchestrator,
        provider: MockAIProvider,
        sink: RecordingReplySink,
    }

    async fn fixture(provider: MockAIProvider, limits: RateLimitConfig) -> Fixture {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(Timestamp::from_unix_secs(1_700_000_000)));
        let gate = AccessGate::new(
            Arc::new(AvailabilitySwitch::load(store.clone(), clock.clone()).await),
            Arc::new(SlidingWindowRateLimiter::load(limits, store.clone(), clock.clone()).await),
            Arc::new(ConsentLedger::load(store.clone(), clock.clone()).await),
            Arc::new(ConsentCoordinator::new(clock.clone())),
            clock.clone(),
        );
        let fetcher = StaticAttachmentFetcher::new().with_file("https://cdn/q.txt", b"2+2".to_vec());

        Fixture {
            orchestrator: CommandOrchestrator::new(
                Arc::new(gate),
                Arc::new(ConversationStore::new()),
                Arc::new(provider.clone()),
                AttachmentIngestor::new(Arc::new(fetcher)),
                clock,
                Duration::from_secs(120),
            ),
            provider,
            sink: RecordingReplySink::new(),
        }
    }

    fn invocation(alias: &str, query: &str) -> CommandInvocation {
        let table = default_command_table().unwrap();
        CommandInvocation {
            user_id: UserId::new("42").unwrap(),
            user_name: "ana".to_string(),
            definition: table.by_alias(alias).unwrap().clone(),
            query: query.to_string(),
            attachments: Vec::new(),
        }
    }

    fn user() -> UserId {
        UserId::new("42").unwrap()
    }

    // ─── Chat commands ───

    #[tokio::test]
    async fn tutor_chat_sends_system_prompt_and_records_both_turns() {
        let f = fixture(MockAIProvider::new().with_response("4"), RateLimitConfig::default()).await;

        let result = f.orchestrator.handle(invocation("tutor", "what is 2+2?"), &f.sink).await;

        assert_eq!(result, DeliveryResult::Delivered(OutboundReply::Text("4".into())));
        let call = f.provider.last_call().unwrap();
        assert_eq!(call.model, "tester-kimi-k2-non");
        assert_eq!(call.messages[0].role, MessageRole::System);
        assert_eq!(call.messages[1].plain_text().as_deref(), Some("what is 2+2?"));

        let turns = f.orchestrator.conversations().turns(&user(), ConversationMode::Tutor).await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].text(), "4");
        assert_eq!(f.sink.texts().await, vec!["4"]);
        assert_eq!(f.sink.typing_count(), 1);
    }

    #[tokio::test]
    async fn empty_chat_query_defaults_to_hello() {
        let f = fixture(MockAIProvider::new(), RateLimitConfig::default()).await;

        f.orchestrator.handle(invocation("t", "   "), &f.sink).await;

        let call = f.provider.last_call().unwrap();
        assert_eq!(call.messages.last().unwrap().plain_text().as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn attachments_follow_the_query_in_the_user_turn() {
        let f = fixture(MockAIProvider::new(), RateLimitConfig::default()).await;
        let mut cmd = invocation("tutor", "solve");
        cmd.attachments.push(AttachmentRef::new("q.txt", "https://cdn/q.txt"));

        f.orchestrator.handle(cmd, &f.sink).await;

        let call = f.provider.last_call().unwrap();
        assert_eq!(
            call.messages[1].content,
            vec![ContentPart::text("solve"), ContentPart::text("File: q.txt\n```2+2```")]
        );
    }

    #[tokio::test]
    async fn backend_error_is_delivered_as_text() {
        let f = fixture(
            MockAIProvider::new().with_error(AIError::unavailable("overloaded")),
            RateLimitConfig::default(),
        )
        .await;

        let result = f.orchestrator.handle(invocation("tutor", "hi"), &f.sink).await;

        assert!(matches!(result, DeliveryResult::Failed { .. }));
        assert_eq!(f.sink.texts().await, vec!["Error: provider unavailable: overloaded"]);
        let turns = f.orchestrator.conversations().turns(&user(), ConversationMode::Tutor).await;
        assert_eq!(turns.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let f = fixture(
            MockAIProvider::new().with_delay(Duration::from_secs(600)),
            RateLimitConfig::default(),
        )
        .await;

        let result = f.orchestrator.handle(invocation("tutor", "hi"), &f.sink).await;

        match result {
            DeliveryResult::Failed { error, .. } => {
                assert_eq!(error, AIError::Timeout { timeout_secs: 120 })
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    // ─── Image commands ───

    #[tokio::test]
    async fn image_command_skips_history_and_captions_reply() {
        let f = fixture(MockAIProvider::new().with_response("https://img/1.png"), RateLimitConfig::default()).await;

        let result = f.orchestrator.handle(invocation("ti", ""), &f.sink).await;

        assert_eq!(
            result,
            DeliveryResult::Delivered(OutboundReply::Image {
                caption: "🎨 **ana's Image:**".into(),
                content: "https://img/1.png".into(),
            })
        );
        let call = f.provider.last_call().unwrap();
        assert_eq!(call.model, "FLUX-schnell");
        assert_eq!(call.messages, vec![Message::user_text(DEFAULT_IMAGE_QUERY)]);
        assert_eq!(f.orchestrator.conversations().len(&user(), ConversationMode::Standard).await, 0);
    }

    // ─── Gate rejections ───

    #[tokio::test]
    async fn rejected_command_never_reaches_backend() {
        let f = fixture(
            MockAIProvider::new(),
            RateLimitConfig::default().with_limit(CommandCategory::Image, 0),
        )
        .await;

        let result = f.orchestrator.handle(invocation("image", "cat"), &f.sink).await;

        assert!(matches!(result, DeliveryResult::Rejected(GateError::RateLimited { .. })));
        assert_eq!(f.provider.call_count(), 0);
        assert_eq!(f.sink.typing_count(), 0);
        assert!(f.sink.texts().await[0].contains("Rate limit reached"));
    }
}
