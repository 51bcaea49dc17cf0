//! Command domain module.
//!
//! Maps raw input text to command definitions (alias, model, conversation
//! mode, category) and recognises the gateway's own control commands.

mod catalog;
mod control;
mod definition;
mod table;

pub use catalog::{default_command_table, default_hourly_limit, COMMAND_TRIGGER, SLASH_TUTOR_ALIAS};
pub use control::{ControlCommand, MAX_CONTROL_MINUTES};
pub use definition::{CommandCategory, CommandDefinition, ConversationMode};
pub use table::{CommandTable, ParsedCommand, ResolutionError};
