//! Rate limiter adapters.
//!
//! The sliding-window limiter keeps per-(user, category) invocation
//! instants in the persisted rate-limits document.
//!
//! # Usage
//!
//! ```ignore
//! let limiter = SlidingWindowRateLimiter::load(RateLimitConfig::default(), store, clock).await;
//! let result = limiter.check(RateLimitKey::new(user_id, CommandCategory::Plus)).await?;
//! ```

mod config;
mod sliding_window;

pub use config::RateLimitConfig;
pub use sliding_window::SlidingWindowRateLimiter;
