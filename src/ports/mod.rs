//! Ports - traits at the I/O seams.
//!
//! - `DocumentStore` - persisted state documents
//! - `AIProvider` - chat-completion backend
//! - `RateLimiter` - per-user, per-category quotas
//! - `Clock` - current time
//! - `ReplySink` - outbound delivery
//! - `AttachmentFetcher` - attachment downloads

mod ai_provider;
mod attachment_fetcher;
mod clock;
mod document_store;
mod rate_limiter;
mod reply_sink;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, TokenUsage,
};
pub use attachment_fetcher::{AttachmentFetcher, AttachmentRef};
pub use clock::Clock;
pub use document_store::{load_or_default, save_document, DocumentStore, PersistenceError};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};
pub use reply_sink::{OutboundReply, ReplySink, TransportError};
