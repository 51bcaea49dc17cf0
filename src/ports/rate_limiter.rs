//! Rate limiting port for per-user, per-category command quotas.
//!
//! Implementations keep a sliding window of invocation instants for each
//! key and decide whether one more invocation fits.

use async_trait::async_trait;

use crate::domain::command::CommandCategory;
use crate::domain::foundation::{Timestamp, UserId};

/// Port for rate limiting operations.
///
/// Implementations must be thread-safe and serialize mutations of their
/// backing state.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if the invocation is allowed, recording it if so.
    ///
    /// Returns `Allowed` with remaining quota or `Denied` with retry info.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Get current status without recording anything.
    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;

    /// Drop the window and any override for a key (admin operation).
    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError>;

    /// Override the limit for a key, until `expires` or permanently.
    async fn set_override(
        &self,
        key: RateLimitKey,
        limit: u32,
        expires: Option<Timestamp>,
    ) -> Result<(), RateLimitError>;
}

/// Key identifying what to rate limit.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub user_id: UserId,
    pub category: CommandCategory,
}

impl RateLimitKey {
    pub fn new(user_id: UserId, category: CommandCategory) -> Self {
        Self { user_id, category }
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Invocation recorded; includes current status.
    Allowed(RateLimitStatus),
    /// Invocation refused; includes denial details.
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Maximum invocations allowed in the window.
    pub limit: u32,
    /// Remaining invocations in the window.
    pub remaining: u32,
    /// Window duration in seconds.
    pub window_secs: u64,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDenied {
    pub limit: u32,
    /// Seconds until the oldest recorded invocation leaves the window.
    pub retry_after_secs: u64,
    pub category: CommandCategory,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Rate limiter backend is unavailable.
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}
