//! AccessGate - availability, rate limit and consent checks, in that order.

use std::sync::Arc;

use crate::domain::access::GateError;
use crate::domain::command::CommandDefinition;
use crate::domain::foundation::UserId;
use crate::ports::{Clock, OutboundReply, RateLimitKey, RateLimitResult, RateLimiter, ReplySink};

use super::{AvailabilitySwitch, ConsentCoordinator, ConsentLedger};

/// Decides whether a command may run.
///
/// Every write the gate makes (rate window timestamp, acceptance record) is
/// persisted before `check` returns, so it lands before any backend call.
pub struct AccessGate {
    availability: Arc<AvailabilitySwitch>,
    rate_limiter: Arc<dyn RateLimiter>,
    ledger: Arc<ConsentLedger>,
    consent: Arc<ConsentCoordinator>,
    clock: Arc<dyn Clock>,
}

impl AccessGate {
    pub fn new(
        availability: Arc<AvailabilitySwitch>,
        rate_limiter: Arc<dyn RateLimiter>,
        ledger: Arc<ConsentLedger>,
        consent: Arc<ConsentCoordinator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            availability,
            rate_limiter,
            ledger,
            consent,
            clock,
        }
    }

    /// Runs the gate for one invocation.
    ///
    /// When consent is missing the prompt is sent through `sink` and the call
    /// suspends until the user affirms or the window closes.
    pub async fn check(
        &self,
        user_id: &UserId,
        definition: &CommandDefinition,
        sink: &dyn ReplySink,
    ) -> Result<(), GateError> {
        // 1. Global availability
        self.availability.check().await?;

        // A second consent-gated command while a prompt is open is refused
        // before it can consume a rate slot.
        let needs_consent =
            definition.requires_consent() && !self.ledger.has_valid_acceptance(user_id).await;
        if needs_consent && self.consent.pending(user_id).await.is_some() {
            return Err(GateError::ConsentAlreadyPending);
        }

        // 2. Sliding rate window (records the invocation on pass)
        let key = RateLimitKey::new(user_id.clone(), definition.category());
        match self.rate_limiter.check(key).await {
            Ok(RateLimitResult::Allowed(status)) => {
                tracing::debug!(
                    user_id = %user_id,
                    category = %definition.category(),
                    remaining = status.remaining,
                    "Rate limit passed"
                );
            }
            Ok(RateLimitResult::Denied(denied)) => {
                return Err(GateError::RateLimited {
                    category: denied.category,
                    retry_after_secs: denied.retry_after_secs,
                });
            }
            Err(e) => {
                // Continue on error - fail open for availability
                tracing::warn!("Rate limiter error, allowing request: {}", e);
            }
        }

        // 3. Consent, only for categories that need it
        if !needs_consent {
            return Ok(());
        }

        let ticket = self.consent.open(user_id).await?;
        let prompt = GateError::ConsentRequired {
            window_secs: self.consent.window_secs(),
        }
        .notice(self.clock.now());
        if let Err(e) = sink.send(OutboundReply::Notice(prompt)).await {
            tracing::warn!("Failed to deliver consent prompt: {}", e);
        }

        self.consent.wait(ticket).await?;
        self.ledger.record_acceptance(user_id).await;
        Ok(())
    }

    pub fn availability(&self) -> &Arc<AvailabilitySwitch> {
        &self.availability
    }

    pub fn rate_limiter(&self) -> &Arc<dyn RateLimiter> {
        &self.rate_limiter
    }

    pub fn ledger(&self) -> &Arc<ConsentLedger> {
        &self.ledger
    }

    pub fn consent(&self) -> &Arc<ConsentCoordinator> {
        &self.consent
    }
}
