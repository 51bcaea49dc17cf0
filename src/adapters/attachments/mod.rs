//! Attachment fetcher adapters.
//!
//! - **HttpAttachmentFetcher** - plain HTTP GET of the attachment URL
//! - **StaticAttachmentFetcher** - canned bytes by URL (tests)

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::ports::{AttachmentFetcher, AttachmentRef, TransportError};

/// Downloads attachments over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAttachmentFetcher {
    client: Client,
}

impl HttpAttachmentFetcher {
    /// Creates a fetcher with its own client.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Creates a fetcher sharing an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttachmentFetcher for HttpAttachmentFetcher {
    async fn fetch(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(&attachment.url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                message: format!("failed to fetch {}", attachment.filename),
            });
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

/// Serves fixed bytes per URL; unknown URLs answer 404.
#[derive(Debug, Clone, Default)]
pub struct StaticAttachmentFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl StaticAttachmentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.into(), bytes.into());
        self
    }
}

#[async_trait]
impl AttachmentFetcher for StaticAttachmentFetcher {
    async fn fetch(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, TransportError> {
        self.files
            .get(&attachment.url)
            .cloned()
            .ok_or_else(|| TransportError::Http {
                status: 404,
                message: format!("no such file {}", attachment.url),
            })
    }
}
