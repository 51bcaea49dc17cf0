//! Tutor Gateway - chat command gateway for tutoring and model commands.
//!
//! Messages prefixed with the command trigger are resolved against an alias
//! table, checked by the access gate (availability, hourly rate window,
//! consent) and forwarded to a chat-completions backend. Tutor-mode
//! conversations keep a bounded per-user history.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
