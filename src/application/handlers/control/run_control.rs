//! ControlHandler - gateway control commands (`$accept`, `$help`, admin switches).

use std::sync::Arc;

use crate::application::access::AccessGate;
use crate::application::ConversationStore;
use crate::domain::access::AdminPolicy;
use crate::domain::command::{CommandTable, ControlCommand, ConversationMode};
use crate::domain::foundation::UserId;
use crate::ports::{Clock, OutboundReply, RateLimitKey, ReplySink};

/// What a control command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Accepted,
    NothingPending,
    Help,
    HistoryCleared,
    Enabled,
    Disabled,
    LimitSet,
    LimitCleared,
    NotPermitted,
    Failed,
}

/// Executes control commands and replies with a notice.
pub struct ControlHandler {
    gate: Arc<AccessGate>,
    conversations: Arc<ConversationStore>,
    table: Arc<CommandTable>,
    admins: AdminPolicy,
    clock: Arc<dyn Clock>,
}

impl ControlHandler {
    pub fn new(
        gate: Arc<AccessGate>,
        conversations: Arc<ConversationStore>,
        table: Arc<CommandTable>,
        admins: AdminPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gate,
            conversations,
            table,
            admins,
            clock,
        }
    }

    pub fn admins(&self) -> &AdminPolicy {
        &self.admins
    }

    pub async fn handle(
        &self,
        cmd: ControlCommand,
        caller: &UserId,
        roles: &[String],
        sink: &dyn ReplySink,
    ) -> ControlOutcome {
        // 1. Authorize
        if cmd.requires_admin() && !self.admins.is_admin(caller, roles) {
            tracing::info!(user_id = %caller, "Admin command refused: {:?}", cmd);
            return reply(
                sink,
                ControlOutcome::NotPermitted,
                "⛔ You are not permitted to use this command.".to_string(),
            )
            .await;
        }

        // 2. Execute
        let (outcome, notice) = match cmd {
            ControlCommand::Accept => {
                if self.gate.consent().affirm(caller).await {
                    (ControlOutcome::Accepted, "✅ Accepted!".to_string())
                } else {
                    (
                        ControlOutcome::NothingPending,
                        "ℹ️ You have no pending consent request.".to_string(),
                    )
                }
            }
            ControlCommand::Help => (ControlOutcome::Help, self.help_text()),
            ControlCommand::Reset(mode) => {
                let modes = match mode {
                    Some(mode) => vec![mode],
                    None => ConversationMode::all().to_vec(),
                };
                for mode in &modes {
                    self.conversations.clear(caller, *mode).await;
                }
                let scope = match mode {
                    Some(mode) => format!("Your {} history", mode),
                    None => "Your conversation history".to_string(),
                };
                (ControlOutcome::HistoryCleared, format!("🧹 {} was cleared.", scope))
            }
            ControlCommand::Enable => {
                self.gate.availability().enable().await;
                (ControlOutcome::Enabled, "▶️ Bot enabled.".to_string())
            }
            ControlCommand::Disable { minutes } => {
                self.gate.availability().disable(minutes).await;
                let notice = match minutes {
                    Some(m) => format!("⏸️ Bot disabled for {} minute(s).", m),
                    None => "⏸️ Bot disabled until re-enabled.".to_string(),
                };
                (ControlOutcome::Disabled, notice)
            }
            ControlCommand::SetLimit {
                user_id,
                category,
                limit,
                minutes,
            } => {
                let expires = minutes.map(|m| self.clock.now().plus_secs(m.saturating_mul(60)));
                let key = RateLimitKey::new(user_id.clone(), category);
                match self.gate.rate_limiter().set_override(key, limit, expires).await {
                    Ok(()) => {
                        let duration = match minutes {
                            Some(m) => format!(" for {} minute(s)", m),
                            None => String::new(),
                        };
                        (
                            ControlOutcome::LimitSet,
                            format!(
                                "✅ `{}` limit for <@{}> set to {}/hour{}.",
                                category, user_id, limit, duration
                            ),
                        )
                    }
                    Err(e) => (ControlOutcome::Failed, format!("⚠️ Could not set limit: {}", e)),
                }
            }
            ControlCommand::ClearLimit { user_id, category } => {
                let key = RateLimitKey::new(user_id.clone(), category);
                match self.gate.rate_limiter().reset(key).await {
                    Ok(()) => (
                        ControlOutcome::LimitCleared,
                        format!("✅ `{}` limit for <@{}> cleared.", category, user_id),
                    ),
                    Err(e) => (ControlOutcome::Failed, format!("⚠️ Could not clear limit: {}", e)),
                }
            }
        };

        reply(sink, outcome, notice).await
    }

    fn help_text(&self) -> String {
        let trigger = self.table.trigger();
        let mut lines = vec!["📚 **Commands**".to_string()];
        lines.extend(self.table.definitions().iter().map(|definition| {
            format!(
                "`{}{}` {} · {}",
                trigger,
                definition.alias(),
                definition.mode(),
                definition.category()
            )
        }));
        lines.push(format!(
            "`{t}accept` · `{t}reset [tutor|standard]` · `{t}help`",
            t = trigger
        ));
        lines.join("\n")
    }
}

async fn reply(sink: &dyn ReplySink, outcome: ControlOutcome, notice: String) -> ControlOutcome {
    if let Err(e) = sink.send(OutboundReply::Notice(notice)).await {
        tracing::warn!("Failed to deliver control reply: {}", e);
    }
    outcome
}
