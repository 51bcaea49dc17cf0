//! Gate rejection reasons.

use thiserror::Error;

use crate::domain::command::CommandCategory;
use crate::domain::foundation::Timestamp;

/// Why the access gate refused a command.
///
/// Every variant is recoverable: the user may retry later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("gateway unavailable")]
    Unavailable { resume_at: Option<Timestamp> },

    #[error("rate limit reached for {category}, retry in {retry_after_secs}s")]
    RateLimited {
        category: CommandCategory,
        retry_after_secs: u64,
    },

    #[error("consent required within {window_secs}s")]
    ConsentRequired { window_secs: u64 },

    #[error("consent request expired")]
    ConsentExpired,

    #[error("consent request already pending")]
    ConsentAlreadyPending,
}

impl GateError {
    /// Text shown to the user.
    pub fn notice(&self, now: Timestamp) -> String {
        match self {
            GateError::Unavailable { resume_at: Some(at) } => format!(
                "⏸️ The bot is currently disabled. It resumes in about {} minute(s).",
                now.secs_until(at).div_ceil(60).max(1)
            ),
            GateError::Unavailable { resume_at: None } => {
                "⏸️ The bot is currently disabled.".to_string()
            }
            GateError::RateLimited {
                category,
                retry_after_secs,
            } => format!(
                "⏳ Rate limit reached for `{}`. Try again in {} minute(s).",
                category,
                retry_after_secs.div_ceil(60).max(1)
            ),
            GateError::ConsentRequired { window_secs } => format!(
                "⚠️ You must accept terms for non-tutor models. Reply `$accept` within {} minute(s).",
                window_secs.div_ceil(60).max(1)
            ),
            GateError::ConsentExpired => {
                "⌛ Consent request expired. Send the command again to retry.".to_string()
            }
            GateError::ConsentAlreadyPending => {
                "⚠️ You already have a pending consent request. Reply `$accept` first."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_notice_rounds_minutes_up() {
        let err = GateError::RateLimited {
            category: CommandCategory::Plus,
            retry_after_secs: 61,
        };
        let notice = err.notice(Timestamp::from_unix_secs(0));
        assert!(notice.contains("`plus`"));
        assert!(notice.contains("2 minute(s)"));
    }

    #[test]
    fn unavailable_notice_mentions_resume() {
        let now = Timestamp::from_unix_secs(1_000);
        let err = GateError::Unavailable {
            resume_at: Some(now.plus_secs(600)),
        };
        assert!(err.notice(now).contains("10 minute(s)"));
    }

    #[test]
    fn consent_prompt_follows_the_window() {
        let now = Timestamp::from_unix_secs(0);
        let prompt = GateError::ConsentRequired { window_secs: 120 }.notice(now);
        assert!(prompt.contains("`$accept` within 2 minute(s)"));
        let short = GateError::ConsentRequired { window_secs: 10 }.notice(now);
        assert!(short.contains("within 1 minute(s)"));
    }
}
