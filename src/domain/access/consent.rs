//! Pending consent requests.
//!
//! A request is created when a standard-mode command meets a user without a
//! valid acceptance. It is never persisted: it lives only while its timer runs.

use crate::domain::foundation::{ConsentRequestId, StateMachine, Timestamp, UserId, ValidationError};

/// Default seconds a consent prompt waits for affirmation.
pub const CONSENT_WINDOW_SECS: u64 = 300;

/// Lifecycle of a consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsentStatus {
    /// Waiting for the user to affirm.
    Pending,
    /// The user affirmed in time; the deferred command runs once.
    Affirmed,
    /// The window closed without affirmation; the deferred command is dropped.
    Expired,
}

impl StateMachine for ConsentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConsentStatus::*;
        matches!((self, target), (Pending, Affirmed) | (Pending, Expired))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConsentStatus::*;
        match self {
            Pending => vec![Affirmed, Expired],
            Affirmed | Expired => vec![],
        }
    }
}

/// An outstanding consent prompt for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConsentRequest {
    id: ConsentRequestId,
    user_id: UserId,
    issued_at: Timestamp,
    expires_at: Timestamp,
    status: ConsentStatus,
}

impl PendingConsentRequest {
    pub fn new(user_id: UserId, issued_at: Timestamp, window_secs: u64) -> Self {
        Self {
            id: ConsentRequestId::new(),
            user_id,
            issued_at,
            expires_at: issued_at.plus_secs(window_secs),
            status: ConsentStatus::Pending,
        }
    }

    pub fn id(&self) -> ConsentRequestId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn status(&self) -> ConsentStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == ConsentStatus::Pending
    }

    /// Marks the request affirmed.
    ///
    /// # Errors
    ///
    /// Fails if the request already left `Pending`.
    pub fn affirm(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(ConsentStatus::Affirmed)?;
        Ok(())
    }

    /// Marks the request expired.
    ///
    /// # Errors
    ///
    /// Fails if the request already left `Pending`.
    pub fn expire(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(ConsentStatus::Expired)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PendingConsentRequest {
        PendingConsentRequest::new(
            UserId::new("42").unwrap(),
            Timestamp::from_unix_secs(1_000),
            CONSENT_WINDOW_SECS,
        )
    }

    #[test]
    fn new_request_is_pending_with_window() {
        let request = request();
        assert!(request.is_pending());
        assert_eq!(request.expires_at(), Timestamp::from_unix_secs(1_300));
    }

    #[test]
    fn affirm_is_terminal() {
        let mut request = request();
        request.affirm().unwrap();
        assert_eq!(request.status(), ConsentStatus::Affirmed);
        assert!(request.status().is_terminal());
        assert!(request.expire().is_err());
        assert!(request.affirm().is_err());
    }

    #[test]
    fn expire_is_terminal() {
        let mut request = request();
        request.expire().unwrap();
        assert_eq!(request.status(), ConsentStatus::Expired);
        assert!(request.affirm().is_err());
    }

    #[test]
    fn pending_transitions() {
        assert_eq!(
            ConsentStatus::Pending.valid_transitions(),
            vec![ConsentStatus::Affirmed, ConsentStatus::Expired]
        );
        assert!(!ConsentStatus::Affirmed.can_transition_to(&ConsentStatus::Pending));
    }
}
