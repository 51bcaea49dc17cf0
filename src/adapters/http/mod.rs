//! HTTP adapters.
//!
//! Only the liveness endpoint is exposed over HTTP.

mod health;

pub use health::{liveness_router, serve_liveness};
