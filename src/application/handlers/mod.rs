//! Application handlers, one area per directory.

pub mod command;
pub mod control;
pub mod dispatch;

pub use command::{
    AttachmentIngestor, CommandInvocation, CommandOrchestrator, DeliveryResult,
    DEFAULT_CHAT_QUERY, DEFAULT_IMAGE_QUERY, MAX_FILE_EXCERPT_CHARS,
};
pub use control::{ControlHandler, ControlOutcome};
pub use dispatch::{DispatchOutcome, InboundEvent, InboundMessage, MessageDispatcher};
