//! # Storage Traits
//!
//! The record store abstraction the domain services are written against.
//! Implementations can be swapped (files, an embedded database, a hosted
//! document database) without touching the integrity rules.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::StorageError;

/// A schemaless document: field name to JSON value
pub type Document = Map<String, Value>;

/// Identifier injected into every document returned by a store
pub const ID_FIELD: &str = "id";
/// Store-managed creation timestamp (RFC 3339)
pub const CREATED_AT_FIELD: &str = "created_at";
/// Store-managed last-update timestamp (RFC 3339)
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Trait defining the interface for document storage operations
///
/// Every call is an independent round trip. Implementations must stamp
/// `created_at`/`updated_at` on insert and `updated_at` on update, and must
/// return documents with their id under [`ID_FIELD`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new document and return its generated id
    async fn insert(&self, collection: &str, fields: Document) -> Result<String, StorageError>;

    /// Fetch a single document, `None` when absent
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError>;

    /// Fetch every document of a collection
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StorageError>;

    /// Fetch the documents whose `field` equals `value`
    async fn find_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StorageError>;

    /// Merge `patch` into an existing document; a `null` value removes the field
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StorageError>;

    /// Remove a document
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StorageError>;
}
