//! Control commands handled by the gateway itself rather than a model.
//!
//! A control command is recognised only when the first word after the
//! trigger is exactly one of the reserved words, so aliases that merely
//! start with the same letters are unaffected.

use super::definition::{CommandCategory, ConversationMode};
use crate::domain::foundation::{UserId, ValidationError};

/// A parsed control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Affirm the caller's pending consent request.
    Accept,
    /// List available aliases.
    Help,
    /// Clear the caller's history for one mode, or both.
    Reset(Option<ConversationMode>),
    /// Re-enable the gateway (admin).
    Enable,
    /// Disable the gateway, optionally for a number of minutes (admin).
    Disable { minutes: Option<u64> },
    /// Override a user's hourly limit for a category (admin).
    SetLimit {
        user_id: UserId,
        category: CommandCategory,
        limit: u32,
        minutes: Option<u64>,
    },
    /// Remove a user's override and window for a category (admin).
    ClearLimit {
        user_id: UserId,
        category: CommandCategory,
    },
}

impl ControlCommand {
    /// Parses `input` as a control command.
    ///
    /// Returns `Ok(None)` when the first word is not a reserved word and
    /// `Err` when it is but the arguments are malformed.
    pub fn parse(trigger: char, input: &str) -> Result<Option<Self>, ValidationError> {
        let Some(rest) = input.strip_prefix(trigger) else {
            return Ok(None);
        };
        let mut words = rest.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        // A reserved word must be the whole first token, not a prefix of it.
        if rest.starts_with(char::is_whitespace) {
            return Ok(None);
        }
        let args: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "accept" => ControlCommand::Accept,
            "help" => ControlCommand::Help,
            "reset" => match args.first() {
                None => ControlCommand::Reset(None),
                Some(mode) => ControlCommand::Reset(Some(mode.parse()?)),
            },
            "enable" => ControlCommand::Enable,
            "disable" => ControlCommand::Disable {
                minutes: args.first().map(|m| parse_minutes(m)).transpose()?,
            },
            "setlimit" => {
                if args.len() < 3 || args.len() > 4 {
                    return Err(ValidationError::invalid_format(
                        "setlimit",
                        "usage: setlimit <user> <category> <limit> [minutes]",
                    ));
                }
                ControlCommand::SetLimit {
                    user_id: parse_user_reference(args[0])?,
                    category: args[1].parse()?,
                    limit: args[2].parse().map_err(|_| {
                        ValidationError::invalid_format("limit", format!("'{}' is not a number", args[2]))
                    })?,
                    minutes: args.get(3).map(|m| parse_minutes(m)).transpose()?,
                }
            }
            "clearlimit" => {
                if args.len() != 2 {
                    return Err(ValidationError::invalid_format(
                        "clearlimit",
                        "usage: clearlimit <user> <category>",
                    ));
                }
                ControlCommand::ClearLimit {
                    user_id: parse_user_reference(args[0])?,
                    category: args[1].parse()?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Admin commands require the admin policy to pass.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            ControlCommand::Enable
                | ControlCommand::Disable { .. }
                | ControlCommand::SetLimit { .. }
                | ControlCommand::ClearLimit { .. }
        )
    }
}

/// Longest timed disable or override: one year.
pub const MAX_CONTROL_MINUTES: u64 = 365 * 24 * 60;

fn parse_minutes(raw: &str) -> Result<u64, ValidationError> {
    let minutes: u64 = raw
        .parse()
        .map_err(|_| ValidationError::invalid_format("minutes", format!("'{}' is not a number", raw)))?;
    if minutes == 0 || minutes > MAX_CONTROL_MINUTES {
        return Err(ValidationError::out_of_range(
            "minutes",
            1,
            MAX_CONTROL_MINUTES as i64,
            i64::try_from(minutes).unwrap_or(i64::MAX),
        ));
    }
    Ok(minutes)
}

/// Accepts a raw id or a transport mention such as `<@123>` / `<@!123>`.
fn parse_user_reference(raw: &str) -> Result<UserId, ValidationError> {
    let trimmed = raw
        .strip_prefix("<@")
        .and_then(|inner| inner.strip_suffix('>'))
        .map(|inner| inner.trim_start_matches('!'))
        .unwrap_or(raw);
    UserId::new(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Option<ControlCommand>, ValidationError> {
        ControlCommand::parse('$', input)
    }

    #[test]
    fn user_commands_parse() {
        assert_eq!(parse("$accept").unwrap(), Some(ControlCommand::Accept));
        assert_eq!(parse("$HELP").unwrap(), Some(ControlCommand::Help));
        assert_eq!(parse("$reset").unwrap(), Some(ControlCommand::Reset(None)));
        assert_eq!(
            parse("$reset standard").unwrap(),
            Some(ControlCommand::Reset(Some(ConversationMode::Standard)))
        );
    }

    #[test]
    fn reserved_word_must_be_whole_token() {
        assert_eq!(parse("$acceptance").unwrap(), None);
        assert_eq!(parse("$ accept").unwrap(), None);
        assert_eq!(parse("$tutor accept").unwrap(), None);
        assert_eq!(parse("accept").unwrap(), None);
    }

    #[test]
    fn disable_takes_optional_minutes() {
        assert_eq!(parse("$disable").unwrap(), Some(ControlCommand::Disable { minutes: None }));
        assert_eq!(
            parse("$disable 15").unwrap(),
            Some(ControlCommand::Disable { minutes: Some(15) })
        );
        assert!(parse("$disable soon").is_err());
        assert!(parse("$disable 0").is_err());
    }

    #[test]
    fn minutes_beyond_a_year_are_rejected() {
        assert_eq!(
            parse("$disable 525600").unwrap(),
            Some(ControlCommand::Disable { minutes: Some(MAX_CONTROL_MINUTES) })
        );
        assert!(matches!(
            parse("$disable 1000000000000"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(parse("$setlimit 42 plus 3 99999999999999999").is_err());
    }

    #[test]
    fn setlimit_parses_mentions_and_categories() {
        let command = parse("$setlimit <@!42> plus 3 60").unwrap().unwrap();
        assert_eq!(
            command,
            ControlCommand::SetLimit {
                user_id: UserId::new("42").unwrap(),
                category: CommandCategory::Plus,
                limit: 3,
                minutes: Some(60),
            }
        );
        assert!(command.requires_admin());
    }

    #[test]
    fn setlimit_rejects_bad_arguments() {
        assert!(parse("$setlimit 42 plus").is_err());
        assert!(parse("$setlimit 42 nope 3").is_err());
        assert!(parse("$setlimit 42 plus many").is_err());
    }

    #[test]
    fn clearlimit_parses() {
        assert_eq!(
            parse("$clearlimit 42 image").unwrap(),
            Some(ControlCommand::ClearLimit {
                user_id: UserId::new("42").unwrap(),
                category: CommandCategory::Image,
            })
        );
    }

    #[test]
    fn only_admin_commands_require_admin() {
        assert!(!ControlCommand::Accept.requires_admin());
        assert!(!ControlCommand::Reset(None).requires_admin());
        assert!(ControlCommand::Enable.requires_admin());
    }
}
