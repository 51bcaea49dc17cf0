//! AttachmentIngestor - turns message attachments into prompt content parts.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

use crate::domain::conversation::ContentPart;
use crate::ports::{AttachmentFetcher, AttachmentRef};

/// Longest file excerpt, in characters, included in a prompt.
pub const MAX_FILE_EXCERPT_CHARS: usize = 2000;

const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Fetches attachments and converts them to content parts.
///
/// Images become base64 data URLs. Other files are included as text,
/// truncated to [`MAX_FILE_EXCERPT_CHARS`]. Failed downloads and files that
/// are not UTF-8 are skipped.
pub struct AttachmentIngestor {
    fetcher: Arc<dyn AttachmentFetcher>,
}

impl AttachmentIngestor {
    pub fn new(fetcher: Arc<dyn AttachmentFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn ingest(&self, attachments: &[AttachmentRef]) -> Vec<ContentPart> {
        let mut parts = Vec::with_capacity(attachments.len());

        for attachment in attachments {
            let bytes = match self.fetcher.fetch(attachment).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping attachment {}: {}", attachment.filename, e);
                    continue;
                }
            };

            if is_image(&attachment.filename) {
                parts.push(ContentPart::image(format!(
                    "data:image/jpeg;base64,{}",
                    STANDARD.encode(&bytes)
                )));
                continue;
            }

            match String::from_utf8(bytes) {
                Ok(text) => {
                    let excerpt: String = text.chars().take(MAX_FILE_EXCERPT_CHARS).collect();
                    parts.push(ContentPart::text(format!(
                        "File: {}\n```{}```",
                        attachment.filename, excerpt
                    )));
                }
                Err(_) => {
                    tracing::warn!("Skipping attachment {}: not UTF-8 text", attachment.filename);
                }
            }
        }

        parts
    }
}

fn is_image(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::attachments::StaticAttachmentFetcher;

    fn ingestor(fetcher: StaticAttachmentFetcher) -> AttachmentIngestor {
        AttachmentIngestor::new(Arc::new(fetcher))
    }

    #[tokio::test]
    async fn images_become_data_urls() {
        let fetcher = StaticAttachmentFetcher::new().with_file("https://cdn/a.PNG", b"abc".to_vec());
        let parts = ingestor(fetcher)
            .ingest(&[AttachmentRef::new("a.PNG", "https://cdn/a.PNG")])
            .await;

        assert_eq!(parts, vec![ContentPart::image("data:image/jpeg;base64,YWJj")]);
    }

    #[tokio::test]
    async fn text_files_are_truncated_to_excerpt() {
        let body = "é".repeat(MAX_FILE_EXCERPT_CHARS + 10);
        let fetcher = StaticAttachmentFetcher::new().with_file("https://cdn/notes.txt", body.into_bytes());
        let parts = ingestor(fetcher)
            .ingest(&[AttachmentRef::new("notes.txt", "https://cdn/notes.txt")])
            .await;

        let text = parts[0].as_text().unwrap();
        assert!(text.starts_with("File: notes.txt\n```"));
        assert!(text.ends_with("```"));
        assert_eq!(text.matches('é').count(), MAX_FILE_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn failed_and_binary_attachments_are_skipped() {
        let fetcher = StaticAttachmentFetcher::new()
            .with_file("https://cdn/blob.bin", vec![0xff, 0xfe, 0x00])
            .with_file("https://cdn/ok.md", b"# ok".to_vec());
        let parts = ingestor(fetcher)
            .ingest(&[
                AttachmentRef::new("missing.txt", "https://cdn/missing.txt"),
                AttachmentRef::new("blob.bin", "https://cdn/blob.bin"),
                AttachmentRef::new("ok.md", "https://cdn/ok.md"),
            ])
            .await;

        assert_eq!(parts, vec![ContentPart::text("File: ok.md\n```# ok```")]);
    }
}
