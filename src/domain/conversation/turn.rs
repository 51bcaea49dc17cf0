//! Conversation turns.
//!
//! A turn is one user or assistant contribution. Its content is an ordered
//! sequence of parts so that a single user turn can carry the typed query
//! together with any attached images or files.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One piece of turn content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    /// Image reference, either a remote URL or a `data:` URL.
    Image { url: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::Image { url: url.into() }
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::Image { .. } => None,
        }
    }
}

/// An immutable conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: TurnRole,
    content: Vec<ContentPart>,
}

impl ConversationTurn {
    /// Creates a user turn from content parts.
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: TurnRole::User,
            content,
        }
    }

    /// Creates a user turn holding only text.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentPart::text(text)])
    }

    /// Creates an assistant turn holding the reply text.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: vec![ContentPart::text(text)],
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &[ContentPart] {
        &self.content
    }

    /// Concatenated text parts, for logging and tests.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_turn_keeps_part_order() {
        let turn = ConversationTurn::user(vec![
            ContentPart::text("look at this"),
            ContentPart::image("data:image/png;base64,AAAA"),
        ]);
        assert_eq!(turn.role(), TurnRole::User);
        assert_eq!(turn.content().len(), 2);
        assert_eq!(turn.content()[0].as_text(), Some("look at this"));
        assert!(turn.content()[1].as_text().is_none());
    }

    #[test]
    fn text_joins_text_parts_only() {
        let turn = ConversationTurn::user(vec![
            ContentPart::text("a"),
            ContentPart::image("http://x"),
            ContentPart::text("b"),
        ]);
        assert_eq!(turn.text(), "a\nb");
    }

    #[test]
    fn content_part_serializes_with_type_tag() {
        let json = serde_json::to_value(ContentPart::text("hi")).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hi");
    }
}
