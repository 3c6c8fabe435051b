//! # Storage Module
//!
//! Persistence for the registration backend.
//!
//! The domain layer only sees the [`RecordStore`] trait: schemaless document
//! collections keyed by store-generated ids, with get-by-id, get-all,
//! single-field equality filtering, insert, partial update and delete. There
//! are no multi-document transactions; integrity rules that span documents
//! live in the domain services.
//!
//! ## Layout
//!
//! - **traits**: the `RecordStore` abstraction and document field names
//! - **error**: `StorageError`, the only error this layer produces
//! - **collection**: typed wrapper mapping documents to serde records
//! - **locks**: per-key async locks used to serialize check-then-write paths
//! - **yaml**: file-backed store, one YAML document per record

pub mod collection;
pub mod error;
pub mod locks;
pub mod traits;
pub mod yaml;

pub use collection::{Collection, Stored};
pub use error::StorageError;
pub use locks::{KeyGuard, KeyedLocks};
pub use traits::{Document, RecordStore};
pub use yaml::{YamlConnection, YamlDocumentStore};

/// Collection names, one per entity kind
pub mod collections {
    pub const CLIENTS: &str = "clients";
    pub const GUARDIANS: &str = "guardians";
    pub const ACTIVITIES: &str = "activities";
    pub const ENROLLMENTS: &str = "enrollments";
    pub const EVALUATIONS: &str = "evaluations";
    pub const ADMINISTRATORS: &str = "admins";
}
