//! Command definitions: alias, backend model, conversation mode and category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Which conversation a command takes part in.
///
/// Tutor conversations are guided by a system prompt and never need consent;
/// standard conversations talk to the model directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    Tutor,
    Standard,
}

impl ConversationMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationMode::Tutor => "tutor",
            ConversationMode::Standard => "standard",
        }
    }

    /// Returns true if prompts for this mode start with the tutor system prompt.
    pub fn uses_system_prompt(&self) -> bool {
        matches!(self, ConversationMode::Tutor)
    }

    /// All modes, in a stable order.
    pub fn all() -> [ConversationMode; 2] {
        [ConversationMode::Tutor, ConversationMode::Standard]
    }
}

impl fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConversationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tutor" => Ok(ConversationMode::Tutor),
            "standard" => Ok(ConversationMode::Standard),
            other => Err(ValidationError::invalid_format(
                "conversation_mode",
                format!("unknown mode '{}'", other),
            )),
        }
    }
}

/// Rate-limit and gating category of a command.
///
/// Categories are the keys of the persisted rate-limit document, so the
/// string forms must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Normal,
    Plus,
    Minus,
    NonNormal,
    NonPlus,
    NonMinus,
    Image,
    ImagePlus,
}

impl CommandCategory {
    /// Returns the string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandCategory::Normal => "normal",
            CommandCategory::Plus => "plus",
            CommandCategory::Minus => "minus",
            CommandCategory::NonNormal => "nonnormal",
            CommandCategory::NonPlus => "nonplus",
            CommandCategory::NonMinus => "nonminus",
            CommandCategory::Image => "image",
            CommandCategory::ImagePlus => "imageplus",
        }
    }

    /// Returns true for image-generation categories.
    pub fn is_image(&self) -> bool {
        matches!(self, CommandCategory::Image | CommandCategory::ImagePlus)
    }

    /// All categories, in declaration order.
    pub fn all() -> [CommandCategory; 8] {
        [
            CommandCategory::Normal,
            CommandCategory::Plus,
            CommandCategory::Minus,
            CommandCategory::NonNormal,
            CommandCategory::NonPlus,
            CommandCategory::NonMinus,
            CommandCategory::Image,
            CommandCategory::ImagePlus,
        ]
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommandCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CommandCategory::all()
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| {
                ValidationError::invalid_format("category", format!("unknown category '{}'", wanted))
            })
    }
}

/// An immutable command definition, registered once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    alias: String,
    model_id: String,
    mode: ConversationMode,
    category: CommandCategory,
}

impl CommandDefinition {
    /// Creates a definition. The alias is normalized to lower case.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if alias or model id is blank
    /// - `InvalidFormat` if the alias contains whitespace or non-ASCII characters
    pub fn new(
        alias: impl Into<String>,
        model_id: impl Into<String>,
        mode: ConversationMode,
        category: CommandCategory,
    ) -> Result<Self, ValidationError> {
        let alias = alias.into();
        let model_id = model_id.into();
        if alias.is_empty() {
            return Err(ValidationError::empty_field("alias"));
        }
        if model_id.trim().is_empty() {
            return Err(ValidationError::empty_field("model_id"));
        }
        if !alias.is_ascii() || alias.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "alias",
                format!("'{}' must be ASCII without whitespace", alias),
            ));
        }
        Ok(Self {
            alias: alias.to_ascii_lowercase(),
            model_id: model_id.trim().to_string(),
            mode,
            category,
        })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn mode(&self) -> ConversationMode {
        self.mode
    }

    pub fn category(&self) -> CommandCategory {
        self.category
    }

    /// Image commands bypass conversation history entirely.
    pub fn is_image(&self) -> bool {
        self.category.is_image()
    }

    /// Standard, non-image commands require a valid acceptance record.
    pub fn requires_consent(&self) -> bool {
        self.mode == ConversationMode::Standard && !self.is_image()
    }
}
