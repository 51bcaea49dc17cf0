//! Sliding-window rate limiter backed by the persisted rate-limits document.
//!
//! The limiter is the single owner of `rate_limits.json`. Every mutation
//! happens under one async mutex and is saved before the lock is released,
//! so writes to the document are serialized and ordered.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::access::{RateDecision, RateLimitsDocument, StateDocument};
use crate::domain::foundation::Timestamp;
use crate::ports::{
    load_or_default, save_document, Clock, DocumentStore, RateLimitDenied, RateLimitError,
    RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

/// Per-(user, category) sliding window limiter.
///
/// Limit precedence: an unexpired per-user override, then the document's
/// global per-category limit, then the configured limit.
pub struct SlidingWindowRateLimiter {
    config: RateLimitConfig,
    document: Mutex<RateLimitsDocument>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowRateLimiter {
    /// Creates a limiter over an already loaded document.
    pub fn new(
        config: RateLimitConfig,
        document: RateLimitsDocument,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            document: Mutex::new(document),
            store,
            clock,
        }
    }

    /// Creates a limiter from the persisted snapshot, or an empty document.
    pub async fn load(
        config: RateLimitConfig,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let document = load_or_default(store.as_ref(), StateDocument::RateLimits).await;
        Self::new(config, document, store, clock)
    }

    /// Copy of the current document.
    pub async fn snapshot(&self) -> RateLimitsDocument {
        self.document.lock().await.clone()
    }

    fn effective_limit(&self, document: &RateLimitsDocument, key: &RateLimitKey) -> u32 {
        document
            .record(&key.user_id, key.category)
            .and_then(|record| record.limit)
            .or_else(|| document.global_limit(key.category))
            .unwrap_or_else(|| self.config.limit_for(key.category))
    }

    async fn persist(&self, document: &RateLimitsDocument) {
        if let Err(e) = save_document(self.store.as_ref(), StateDocument::RateLimits, document).await {
            tracing::warn!("Failed to save rate limits: {}", e);
        }
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let now = self.clock.now();
        let window_secs = self.config.window_secs;
        let mut document = self.document.lock().await;

        if document.record_mut(&key.user_id, key.category).expire_override(now) {
            tracing::info!(
                "Rate limit override for {} on {} expired",
                key.user_id,
                key.category
            );
        }

        let limit = self.effective_limit(&document, &key);
        let decision = document
            .record_mut(&key.user_id, key.category)
            .try_record(now, limit, window_secs);
        let evicted = document.prune_stale(now, window_secs);
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle rate limit users");
        }

        self.persist(&document).await;

        Ok(match decision {
            RateDecision::Recorded { remaining } => RateLimitResult::Allowed(RateLimitStatus {
                limit,
                remaining,
                window_secs,
            }),
            RateDecision::Limited { retry_after_secs } => {
                tracing::debug!(
                    "Rate limit hit for {} on {} ({}/h)",
                    key.user_id,
                    key.category,
                    limit
                );
                RateLimitResult::Denied(RateLimitDenied {
                    limit,
                    retry_after_secs,
                    category: key.category,
                })
            }
        })
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let now = self.clock.now();
        let document = self.document.lock().await;

        let mut record = document
            .record(&key.user_id, key.category)
            .cloned()
            .unwrap_or_default();
        record.expire_override(now);
        record.prune(now, self.config.window_secs);

        let limit = record
            .limit
            .or_else(|| document.global_limit(key.category))
            .unwrap_or_else(|| self.config.limit_for(key.category));

        Ok(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(record.count() as u32),
            window_secs: self.config.window_secs,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let mut document = self.document.lock().await;
        if document.remove(&key.user_id, key.category) {
            self.persist(&document).await;
        }
        Ok(())
    }

    async fn set_override(
        &self,
        key: RateLimitKey,
        limit: u32,
        expires: Option<Timestamp>,
    ) -> Result<(), RateLimitError> {
        let mut document = self.document.lock().await;
        document
            .record_mut(&key.user_id, key.category)
            .set_override(limit, expires);
        self.persist(&document).await;
        Ok(())
    }
}
