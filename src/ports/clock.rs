//! Clock port.
//!
//! Every window computation (rate window, acceptance validity, availability
//! resume) reads time through this trait so tests can control it.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
