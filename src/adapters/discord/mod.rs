//! Discord REST transport.
//!
//! - **DiscordClient** - authenticated REST calls
//! - **DiscordReplySink** - chunked delivery into a channel
//! - **RoleResolver** - role names for the admin check
//! - **DiscordPoller** - polls channels and feeds the dispatcher

mod client;
mod model;
mod poller;
mod roles;
mod sink;

pub use client::{chunk_text, compare_message_ids, is_newer_message, DiscordClient, DISCORD_SAFE_MAX_CHARS};
pub use model::{DiscordAttachment, DiscordChannel, DiscordMember, DiscordMessage, DiscordRole, DiscordUser};
pub use poller::{DiscordPoller, PollerSettings};
pub use roles::RoleResolver;
pub use sink::DiscordReplySink;
