//! Application layer - the gateway's use cases.
//!
//! State owners (`ConversationStore`, the access gate and its parts) are
//! constructed once at startup and shared by reference with the handlers.

pub mod access;
mod conversation_store;
pub mod handlers;

pub use access::{AccessGate, AvailabilitySwitch, ConsentCoordinator, ConsentLedger, ConsentTicket};
pub use conversation_store::ConversationStore;
pub use handlers::{
    AttachmentIngestor, CommandInvocation, CommandOrchestrator, ControlHandler, ControlOutcome,
    DeliveryResult, DispatchOutcome, InboundEvent, InboundMessage, MessageDispatcher,
};
