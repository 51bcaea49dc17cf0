//! ConsentLedger - owner of persisted consent acceptances.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::access::{AcceptanceRecord, AcceptancesDocument, StateDocument, ACCEPTANCE_VALIDITY_DAYS};
use crate::domain::foundation::UserId;
use crate::ports::{load_or_default, save_document, Clock, DocumentStore};

/// Single writer of `user_acceptances.json`.
///
/// Expiry is evaluated at lookup time; stale records are never swept.
pub struct ConsentLedger {
    acceptances: Mutex<AcceptancesDocument>,
    validity_days: i64,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl ConsentLedger {
    pub fn new(
        acceptances: AcceptancesDocument,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            acceptances: Mutex::new(acceptances),
            validity_days: ACCEPTANCE_VALIDITY_DAYS,
            store,
            clock,
        }
    }

    pub async fn load(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        let acceptances = load_or_default(store.as_ref(), StateDocument::Acceptances).await;
        Self::new(acceptances, store, clock)
    }

    pub fn with_validity_days(mut self, days: i64) -> Self {
        self.validity_days = days;
        self
    }

    pub async fn has_valid_acceptance(&self, user_id: &UserId) -> bool {
        let now = self.clock.now();
        self.acceptances
            .lock()
            .await
            .get(user_id)
            .is_some_and(|record| record.is_valid_at(now, self.validity_days))
    }

    /// Stores a fresh acceptance dated now.
    pub async fn record_acceptance(&self, user_id: &UserId) -> AcceptanceRecord {
        let record = AcceptanceRecord::new(self.clock.now());
        let mut acceptances = self.acceptances.lock().await;
        acceptances.insert(user_id.clone(), record);
        tracing::info!(user_id = %user_id, "Consent accepted");

        if let Err(e) = save_document(self.store.as_ref(), StateDocument::Acceptances, &*acceptances).await {
            tracing::warn!("Failed to save acceptances: {}", e);
        }
        record
    }

    pub async fn acceptance(&self, user_id: &UserId) -> Option<AcceptanceRecord> {
        self.acceptances.lock().await.get(user_id).copied()
    }
}
