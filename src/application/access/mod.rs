//! Access control: global availability, rate windows and consent.

mod availability_switch;
mod consent_coordinator;
mod consent_ledger;
mod gate;

pub use availability_switch::AvailabilitySwitch;
pub use consent_coordinator::{ConsentCoordinator, ConsentTicket};
pub use consent_ledger::ConsentLedger;
pub use gate::AccessGate;
