//! MessageDispatcher - entry point for inbound transport events.

use std::sync::Arc;

use crate::application::handlers::command::{CommandInvocation, CommandOrchestrator, DeliveryResult};
use crate::application::handlers::control::{ControlHandler, ControlOutcome};
use crate::domain::command::{CommandTable, ControlCommand, SLASH_TUTOR_ALIAS};
use crate::domain::foundation::UserId;
use crate::ports::{AttachmentRef, OutboundReply, ReplySink};

/// A chat message as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub author_id: UserId,
    pub author_name: String,
    /// Role names; only needed for admin control commands.
    pub author_roles: Vec<String>,
    pub text: String,
    pub attachments: Vec<AttachmentRef>,
}

/// Something the transport received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Free-text message, parsed with the trigger prefix.
    Message(InboundMessage),
    /// Structured single-argument invocation, always routed to the tutor command.
    SlashTutor {
        author_id: UserId,
        author_name: String,
        message: String,
    },
}

/// What the dispatcher did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not addressed to the gateway.
    Ignored,
    /// A control command with malformed arguments; usage was sent back.
    Invalid,
    Control(ControlOutcome),
    Command(DeliveryResult),
}

/// Routes events to control commands or model commands.
pub struct MessageDispatcher {
    table: Arc<CommandTable>,
    orchestrator: Arc<CommandOrchestrator>,
    control: ControlHandler,
}

impl MessageDispatcher {
    pub fn new(
        table: Arc<CommandTable>,
        orchestrator: Arc<CommandOrchestrator>,
        control: ControlHandler,
    ) -> Self {
        Self {
            table,
            orchestrator,
            control,
        }
    }

    /// True when `text` is an admin control command, so the caller's roles
    /// have to be looked up before dispatching.
    pub fn needs_roles(&self, text: &str) -> bool {
        matches!(
            ControlCommand::parse(self.table.trigger(), text),
            Ok(Some(cmd)) if cmd.requires_admin()
        )
    }

    pub fn table(&self) -> &Arc<CommandTable> {
        &self.table
    }

    pub fn orchestrator(&self) -> &Arc<CommandOrchestrator> {
        &self.orchestrator
    }

    pub async fn dispatch(&self, event: InboundEvent, sink: &dyn ReplySink) -> DispatchOutcome {
        match event {
            InboundEvent::Message(message) => self.dispatch_message(message, sink).await,
            InboundEvent::SlashTutor {
                author_id,
                author_name,
                message,
            } => {
                let Some(definition) = self.table.by_alias(SLASH_TUTOR_ALIAS) else {
                    tracing::warn!("No '{}' command registered for slash invocation", SLASH_TUTOR_ALIAS);
                    return DispatchOutcome::Ignored;
                };
                let cmd = CommandInvocation {
                    user_id: author_id,
                    user_name: author_name,
                    definition: definition.clone(),
                    query: message,
                    attachments: Vec::new(),
                };
                DispatchOutcome::Command(self.orchestrator.handle(cmd, sink).await)
            }
        }
    }

    async fn dispatch_message(&self, message: InboundMessage, sink: &dyn ReplySink) -> DispatchOutcome {
        // 1. Control commands (exempt from the gate)
        match ControlCommand::parse(self.table.trigger(), &message.text) {
            Ok(Some(cmd)) => {
                let outcome = self
                    .control
                    .handle(cmd, &message.author_id, &message.author_roles, sink)
                    .await;
                return DispatchOutcome::Control(outcome);
            }
            Ok(None) => {}
            Err(e) => {
                if let Err(send_err) = sink.send(OutboundReply::Notice(format!("⚠️ {}", e))).await {
                    tracing::warn!("Failed to deliver usage notice: {}", send_err);
                }
                return DispatchOutcome::Invalid;
            }
        }

        // 2. Alias resolution; anything unresolved is silently ignored
        let parsed = match self.table.parse(&message.text) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::trace!("Ignoring message: {}", e);
                return DispatchOutcome::Ignored;
            }
        };
        tracing::debug!(
            user_id = %message.author_id,
            alias = parsed.definition.alias(),
            "Command resolved"
        );

        // 3. Run
        let cmd = CommandInvocation {
            user_id: message.author_id.clone(),
            user_name: message.author_name.clone(),
            definition: parsed.definition.clone(),
            query: parsed.query.to_string(),
            attachments: message.attachments.clone(),
        };
        DispatchOutcome::Command(self.orchestrator.handle(cmd, sink).await)
    }
}
