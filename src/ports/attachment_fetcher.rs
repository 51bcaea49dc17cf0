//! Attachment Fetcher Port - downloads the bytes behind an attachment reference.

use async_trait::async_trait;

use super::reply_sink::TransportError;

/// An attachment as announced by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub filename: String,
    pub url: String,
}

impl AttachmentRef {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
        }
    }
}

/// Port for attachment downloads.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, TransportError>;
}
