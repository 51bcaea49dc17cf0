//! Access domain module.
//!
//! Value types and rules behind the access gate: global availability,
//! the sliding rate window, consent acceptance and pending consent
//! requests, admin authorization, and the persisted document schemas.
//! Everything here is pure; the application layer owns the state and
//! persists it.

mod acceptance;
mod admin;
mod availability;
mod consent;
mod documents;
mod epoch;
mod error;
mod rate_window;

pub use acceptance::{AcceptanceRecord, ACCEPTANCE_VALIDITY_DAYS};
pub use admin::AdminPolicy;
pub use availability::{AvailabilityCheck, AvailabilityState};
pub use consent::{ConsentStatus, PendingConsentRequest, CONSENT_WINDOW_SECS};
pub use documents::{
    AcceptancesDocument, AvailabilityDocument, GlobalLimit, RateLimitsDocument, StateDocument,
};
pub use error::GateError;
pub use rate_window::{RateDecision, RateLimitRecord, RATE_WINDOW_SECS};
