//! Inbound event dispatch.

mod dispatch_message;

pub use dispatch_message::{DispatchOutcome, InboundEvent, InboundMessage, MessageDispatcher};
