use thiserror::Error;

/// Failure raised by a record store
///
/// Nothing in the storage layer retries; callers receive these as-is.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode or decode document: {0}")]
    Serialization(String),

    #[error("document {id} not found in collection {collection}")]
    MissingDocument { collection: String, id: String },
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for StorageError {
    fn from(e: serde_yaml::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}
