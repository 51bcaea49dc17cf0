//! Document Store Port - durable storage for the persisted state documents.
//!
//! Pure key-value document I/O: one JSON document per [`StateDocument`].
//! Business rules live with the document owners in the application layer.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::access::StateDocument;

/// Errors that can occur during document storage operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to serialize {document:?}: {message}")]
    SerializationFailed {
        document: StateDocument,
        message: String,
    },

    #[error("document {document:?} is corrupt: {message}")]
    Corrupt {
        document: StateDocument,
        message: String,
    },

    #[error("IO error on {document:?}: {message}")]
    Io {
        document: StateDocument,
        message: String,
    },
}

/// Port for loading and saving whole documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a document. `Ok(None)` when it was never saved.
    ///
    /// # Errors
    ///
    /// `Corrupt` when the stored bytes are not JSON, `Io` on read failure.
    async fn load(&self, document: StateDocument) -> Result<Option<Value>, PersistenceError>;

    /// Replaces a document.
    async fn save(&self, document: StateDocument, value: &Value) -> Result<(), PersistenceError>;
}

/// Loads and decodes a document, falling back to `T::default()`.
///
/// Missing documents are silent; read failures and corrupt content are
/// logged and swallowed.
pub async fn load_or_default<T>(store: &dyn DocumentStore, document: StateDocument) -> T
where
    T: DeserializeOwned + Default,
{
    let value = match store.load(document).await {
        Ok(Some(value)) => value,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!("Failed to load {}, using default: {}", document.file_name(), e);
            return T::default();
        }
    };

    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(
                "Document {} has unexpected shape, using default: {}",
                document.file_name(),
                e
            );
            T::default()
        }
    }
}

/// Encodes and saves a document.
pub async fn save_document<T>(
    store: &dyn DocumentStore,
    document: StateDocument,
    value: &T,
) -> Result<(), PersistenceError>
where
    T: Serialize + ?Sized,
{
    let encoded =
        serde_json::to_value(value).map_err(|e| PersistenceError::SerializationFailed {
            document,
            message: e.to_string(),
        })?;
    store.save(document, &encoded).await
}
