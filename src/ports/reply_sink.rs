//! Reply Sink Port - outbound delivery to the conversation a command came from.

use async_trait::async_trait;

/// Errors from the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("transport returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode payload: {0}")]
    Decode(String),
}

/// What to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundReply {
    /// Model reply; long text is chunked by the sink.
    Text(String),
    /// Image result, delivered as one captioned message.
    Image { caption: String, content: String },
    /// Gate rejections, consent prompts and control command feedback.
    Notice(String),
}

impl OutboundReply {
    /// Body text as it would appear in the channel.
    pub fn render(&self) -> String {
        match self {
            OutboundReply::Text(text) | OutboundReply::Notice(text) => text.clone(),
            OutboundReply::Image { caption, content } => format!("{} {}", caption, content),
        }
    }
}

/// Port for delivering replies.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Delivers one reply.
    async fn send(&self, reply: OutboundReply) -> Result<(), TransportError>;

    /// Signals that a slow operation is in progress.
    async fn typing(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_reply_renders_caption_then_content() {
        let reply = OutboundReply::Image {
            caption: "🎨 **ana's Image:**".into(),
            content: "https://img".into(),
        };
        assert_eq!(reply.render(), "🎨 **ana's Image:** https://img");
    }
}
