//! File-based Document Store Adapter
//!
//! Stores each state document as a pretty-printed JSON file in one
//! directory. Writes go to a temporary sibling file that is renamed over
//! the target, so a crash mid-write leaves the previous version intact.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::access::StateDocument;
use crate::ports::{DocumentStore, PersistenceError};

/// JSON file storage for the state documents.
#[derive(Debug, Clone)]
pub struct JsonFileDocumentStore {
    base_path: PathBuf,
}

impl JsonFileDocumentStore {
    /// Create a store rooted at `base_path`.
    ///
    /// # Example
    /// ```ignore
    /// let store = JsonFileDocumentStore::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Path of a document's file.
    pub fn path_for(&self, document: StateDocument) -> PathBuf {
        self.base_path.join(document.file_name())
    }

    fn temp_path_for(&self, document: StateDocument) -> PathBuf {
        self.base_path.join(format!(".{}.tmp", document.file_name()))
    }
}

fn io_error(document: StateDocument, e: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        document,
        message: e.to_string(),
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn load(&self, document: StateDocument) -> Result<Option<Value>, PersistenceError> {
        let bytes = match fs::read(self.path_for(document)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(document, e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| PersistenceError::Corrupt {
                document,
                message: e.to_string(),
            })
    }

    async fn save(&self, document: StateDocument, value: &Value) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| io_error(document, e))?;

        let json = serde_json::to_vec_pretty(value).map_err(|e| {
            PersistenceError::SerializationFailed {
                document,
                message: e.to_string(),
            }
        })?;

        let temp_path = self.temp_path_for(document);
        fs::write(&temp_path, json)
            .await
            .map_err(|e| io_error(document, e))?;
        fs::rename(&temp_path, self.path_for(document))
            .await
            .map_err(|e| io_error(document, e))?;

        Ok(())
    }
}
