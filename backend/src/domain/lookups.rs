//! Read-only views one service hands to another.
//!
//! Services that validate foreign keys or embed related entities receive
//! these traits instead of the concrete services.

use async_trait::async_trait;
use tracing::debug;

use super::errors::{DomainError, DomainResult};
use super::models::activity::Activity;
use super::models::client::Client;
use super::models::guardian::Guardian;

#[async_trait]
pub trait ClientLookup: Send + Sync {
    /// `NotFound` when the client does not exist
    async fn find_client(&self, client_id: &str) -> DomainResult<Client>;
}

#[async_trait]
pub trait GuardianLookup: Send + Sync {
    async fn find_guardian(&self, guardian_id: &str) -> DomainResult<Guardian>;
}

#[async_trait]
pub trait ActivityLookup: Send + Sync {
    /// The activity with its enrollment count, without the responsible guardian
    async fn find_activity(&self, activity_id: &str) -> DomainResult<Activity>;
}

/// Turn a lookup made for display into an optional value
///
/// A dangling reference leaves the related field empty; storage failures
/// still propagate.
pub fn optional_relation<T>(result: DomainResult<T>) -> DomainResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DomainError::NotFound(message)) => {
            debug!("Omitting missing relation: {}", message);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
