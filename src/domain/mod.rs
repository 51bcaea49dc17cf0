//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machines)
//! - `command` - Command definitions, alias table, built-in catalog, control commands
//! - `conversation` - Turns, bounded history and the tutor prompt
//! - `access` - Availability, rate window, consent and admin rules

pub mod access;
pub mod command;
pub mod conversation;
pub mod foundation;
