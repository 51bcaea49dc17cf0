//! ConsentCoordinator - pending consent requests and their affirmation channel.
//!
//! Each pending request pairs a `PendingConsentRequest` with a oneshot
//! sender. The gate waits on the receiver with a timeout; `$accept` takes the
//! entry and fires the sender. Whichever side removes the entry decides the
//! outcome, so a deferred command runs at most once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

use crate::domain::access::{GateError, PendingConsentRequest, CONSENT_WINDOW_SECS};
use crate::domain::foundation::UserId;
use crate::ports::Clock;

struct PendingEntry {
    request: PendingConsentRequest,
    affirm: oneshot::Sender<()>,
}

/// Handle held by the task waiting for an affirmation.
#[derive(Debug)]
pub struct ConsentTicket {
    request: PendingConsentRequest,
    affirmed: oneshot::Receiver<()>,
}

impl ConsentTicket {
    pub fn request(&self) -> &PendingConsentRequest {
        &self.request
    }
}

/// Tracks at most one pending consent request per user.
pub struct ConsentCoordinator {
    pending: Mutex<HashMap<UserId, PendingEntry>>,
    window_secs: u64,
    clock: Arc<dyn Clock>,
}

impl ConsentCoordinator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_window(clock, CONSENT_WINDOW_SECS)
    }

    pub fn with_window(clock: Arc<dyn Clock>, window_secs: u64) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window_secs,
            clock,
        }
    }

    /// Seconds a request stays open.
    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Opens a request for `user_id`.
    ///
    /// # Errors
    ///
    /// `ConsentAlreadyPending` if the user already has one open.
    pub async fn open(&self, user_id: &UserId) -> Result<ConsentTicket, GateError> {
        let mut pending = self.pending.lock().await;
        if pending.contains_key(user_id) {
            return Err(GateError::ConsentAlreadyPending);
        }

        let request = PendingConsentRequest::new(user_id.clone(), self.clock.now(), self.window_secs);
        let (affirm, affirmed) = oneshot::channel();
        pending.insert(
            user_id.clone(),
            PendingEntry {
                request: request.clone(),
                affirm,
            },
        );
        tracing::debug!(user_id = %user_id, request_id = %request.id(), "Consent request opened");

        Ok(ConsentTicket { request, affirmed })
    }

    /// Affirms the user's pending request. Returns false when none was open.
    pub async fn affirm(&self, user_id: &UserId) -> bool {
        let mut pending = self.pending.lock().await;
        let Some(mut entry) = pending.remove(user_id) else {
            return false;
        };
        if let Err(e) = entry.request.affirm() {
            tracing::warn!("Consent request in unexpected state: {}", e);
            return false;
        }
        // Sent under the lock so an expiring waiter sees either the entry or the value.
        entry.affirm.send(()).is_ok()
    }

    /// Waits for affirmation until the window closes.
    ///
    /// # Errors
    ///
    /// `ConsentExpired` when the window elapses first. The entry is removed
    /// and the deferred command must be dropped.
    pub async fn wait(&self, ticket: ConsentTicket) -> Result<(), GateError> {
        let ConsentTicket {
            mut request,
            mut affirmed,
        } = ticket;
        let window = Duration::from_secs(self.window_secs);

        match tokio::time::timeout(window, &mut affirmed).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => {
                self.discard(&request).await;
                Err(GateError::ConsentExpired)
            }
            Err(_) => {
                let removed = self.discard(&request).await;
                if !removed && affirmed.try_recv().is_ok() {
                    return Ok(());
                }
                if let Err(e) = request.expire() {
                    tracing::warn!("Consent request in unexpected state: {}", e);
                }
                tracing::info!(
                    user_id = %request.user_id(),
                    request_id = %request.id(),
                    "Consent request expired"
                );
                Err(GateError::ConsentExpired)
            }
        }
    }

    /// The user's open request, if any.
    pub async fn pending(&self, user_id: &UserId) -> Option<PendingConsentRequest> {
        self.pending
            .lock()
            .await
            .get(user_id)
            .map(|entry| entry.request.clone())
    }

    /// Removes the entry only if it is still the one `request` opened.
    async fn discard(&self, request: &PendingConsentRequest) -> bool {
        let mut pending = self.pending.lock().await;
        let owned = pending
            .get(request.user_id())
            .is_some_and(|entry| entry.request.id() == request.id());
        if owned {
            pending.remove(request.user_id());
        }
        owned
    }
}
