//! AI adapters.
//!
//! - **OpenAICompatibleProvider** - chat-completions over HTTP
//! - **MockAIProvider** - scripted responses for tests

mod mock_provider;
mod openai_compatible_provider;

pub use mock_provider::MockAIProvider;
pub use openai_compatible_provider::{OpenAICompatibleConfig, OpenAICompatibleProvider};
