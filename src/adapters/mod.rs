//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gateway to external systems:
//! - `ai` - chat-completions backend
//! - `attachments` - attachment downloads
//! - `clock` - system and manual clocks
//! - `discord` - Discord REST transport (polling, replies, roles)
//! - `http` - liveness endpoint
//! - `rate_limiter` - sliding-window limiter over the persisted document
//! - `reply` - recording reply sink
//! - `storage` - JSON document stores

pub mod ai;
pub mod attachments;
pub mod clock;
pub mod discord;
pub mod http;
pub mod rate_limiter;
pub mod reply;
pub mod storage;
