//! AvailabilitySwitch - owner of the persisted global enable/disable state.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::access::{AvailabilityCheck, AvailabilityDocument, AvailabilityState, GateError, StateDocument};
use crate::ports::{load_or_default, save_document, Clock, DocumentStore};

/// Single writer of `bot_state.json`.
pub struct AvailabilitySwitch {
    state: Mutex<AvailabilityDocument>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl AvailabilitySwitch {
    pub fn new(state: AvailabilityState, store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(state),
            store,
            clock,
        }
    }

    /// Starts from the persisted snapshot, or enabled when there is none.
    pub async fn load(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        let state = load_or_default(store.as_ref(), StateDocument::Availability).await;
        Self::new(state, store, clock)
    }

    /// Passes when enabled, resuming lazily once the disable window is over.
    pub async fn check(&self) -> Result<(), GateError> {
        let mut state = self.state.lock().await;
        match state.check(self.clock.now()) {
            AvailabilityCheck::Available { resumed } => {
                if resumed {
                    tracing::info!("Disable window elapsed, gateway resumed");
                    self.persist(&state).await;
                }
                Ok(())
            }
            AvailabilityCheck::Unavailable { resume_at } => Err(GateError::Unavailable { resume_at }),
        }
    }

    /// Disables the gateway for `minutes`, or until re-enabled.
    pub async fn disable(&self, minutes: Option<u64>) -> AvailabilityState {
        let mut state = self.state.lock().await;
        let until = minutes.map(|m| self.clock.now().plus_secs(m.saturating_mul(60)));
        *state = AvailabilityState::disabled(until);
        tracing::info!(?minutes, "Gateway disabled");
        self.persist(&state).await;
        *state
    }

    pub async fn enable(&self) {
        let mut state = self.state.lock().await;
        *state = AvailabilityState::enabled();
        tracing::info!("Gateway enabled");
        self.persist(&state).await;
    }

    pub async fn snapshot(&self) -> AvailabilityState {
        *self.state.lock().await
    }

    async fn persist(&self, state: &AvailabilityState) {
        if let Err(e) = save_document(self.store.as_ref(), StateDocument::Availability, state).await {
            tracing::warn!("Failed to save availability state: {}", e);
        }
    }
}
