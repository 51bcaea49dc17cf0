//! Control command handlers.

mod run_control;

pub use run_control::{ControlHandler, ControlOutcome};
