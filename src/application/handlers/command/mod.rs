//! Command handlers.

mod ingest_attachments;
mod run_command;

pub use ingest_attachments::{AttachmentIngestor, MAX_FILE_EXCERPT_CHARS};
pub use run_command::{
    CommandInvocation, CommandOrchestrator, DeliveryResult, DEFAULT_CHAT_QUERY, DEFAULT_IMAGE_QUERY,
};
