use thiserror::Error;

use crate::storage::StorageError;

/// Every failure a domain service can report
///
/// The REST layer maps each variant to exactly one status code.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A business rule rejected the write; the caller can fix the input
    #[error("{0}")]
    Validation(String),

    /// The targeted or referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }
}
