//! In-Memory Document Store Adapter
//!
//! Keeps documents in a map. Used by tests, which can also make saves fail
//! to exercise the persistence-error paths.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::access::StateDocument;
use crate::ports::{DocumentStore, PersistenceError};

/// In-memory document storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<StateDocument, Value>>>,
    fail_saves: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document with raw JSON.
    pub async fn insert(&self, document: StateDocument, value: Value) {
        self.documents.write().await.insert(document, value);
    }

    /// Current raw content of a document.
    pub async fn get(&self, document: StateDocument) -> Option<Value> {
        self.documents.read().await.get(&document).cloned()
    }

    /// Makes every following save fail with an IO error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, document: StateDocument) -> Result<Option<Value>, PersistenceError> {
        Ok(self.documents.read().await.get(&document).cloned())
    }

    async fn save(&self, document: StateDocument, value: &Value) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io {
                document,
                message: "simulated write failure".to_string(),
            });
        }
        self.documents.write().await.insert(document, value.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
