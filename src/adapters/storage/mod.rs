//! Storage Adapters
//!
//! Implementations of the DocumentStore port for the persisted state documents.
//!
//! ## Available Adapters
//!
//! - **JsonFileDocumentStore** - Pretty-printed JSON files in one directory
//! - **InMemoryDocumentStore** - Documents in memory (testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryDocumentStore, JsonFileDocumentStore};
//!
//! // Production: file-based storage
//! let store = JsonFileDocumentStore::new(".");
//!
//! // Testing: in-memory storage
//! let store = InMemoryDocumentStore::new();
//! ```

mod in_memory_document_store;
mod json_file_document_store;

pub use in_memory_document_store::InMemoryDocumentStore;
pub use json_file_document_store::JsonFileDocumentStore;
