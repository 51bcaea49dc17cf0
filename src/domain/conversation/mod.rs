//! Conversation domain module.
//!
//! Turns, bounded per-(user, mode) history and the tutor system prompt.

mod history;
mod prompt;
mod turn;

pub use history::{BoundedHistory, MAX_HISTORY_LENGTH};
pub use prompt::TUTOR_SYSTEM_PROMPT;
pub use turn::{ContentPart, ConversationTurn, TurnRole};
