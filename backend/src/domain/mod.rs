//! # Domain Module
//!
//! Contains the business rules of the registration backend.
//!
//! Every write goes through a service in this module, which validates the
//! input, checks references and uniqueness, and only then touches storage.
//! The services know nothing about HTTP; the REST layer translates their
//! [`DomainError`] into status codes.
//!
//! ## Module Organization
//!
//! - **client_service**: Clients and the (name, birth date) identity
//! - **guardian_service**: Guardians and their unique registration
//! - **activity_service**: Activities, their responsible guardian and enrollment counts
//! - **enrollment_service**: The admission rule and enrollment date guards
//! - **evaluation_service**: Complaints, suggestions and compliments with their statistics
//! - **admin_service**: Administrator accounts and login
//! - **lookups**: Read-only views one service hands to another
//!
//! ## Business Rules
//!
//! - A client holds at most one admitting (active or pending) enrollment per activity
//! - Enrollments cannot start in the past and must end after they start
//! - Clients, guardians and activities cannot be deleted while something refers to them
//! - Related entities are embedded in reads; a dangling reference is omitted

pub mod activity_service;
pub mod admin_service;
pub mod client_service;
pub mod commands;
pub mod enrollment_service;
pub mod errors;
pub mod evaluation_service;
pub mod guardian_service;
pub mod lookups;
pub mod models;
pub mod password;
pub mod timestamps;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

pub use activity_service::ActivityService;
pub use admin_service::AdminService;
pub use client_service::ClientService;
pub use enrollment_service::EnrollmentService;
pub use errors::{DomainError, DomainResult};
pub use evaluation_service::EvaluationService;
pub use guardian_service::GuardianService;

use crate::storage::{KeyedLocks, RecordStore};

/// Every domain service wired against one store
#[derive(Clone)]
pub struct DomainServices {
    pub clients: ClientService,
    pub guardians: GuardianService,
    pub activities: ActivityService,
    pub enrollments: EnrollmentService,
    pub evaluations: EvaluationService,
    pub admins: AdminService,
}

impl DomainServices {
    /// All services share the store and the lock table, so uniqueness and
    /// admission checks are serialized across entry points.
    pub fn new(store: Arc<dyn RecordStore>, locks: KeyedLocks) -> Self {
        let clients = ClientService::new(store.clone(), locks.clone());
        let guardians = GuardianService::new(store.clone(), locks.clone());
        let activities = ActivityService::new(store.clone(), Arc::new(guardians.clone()), locks.clone());
        let enrollments = EnrollmentService::new(
            store.clone(),
            Arc::new(clients.clone()),
            Arc::new(activities.clone()),
            locks.clone(),
        );
        let evaluations = EvaluationService::new(
            store.clone(),
            Arc::new(clients.clone()),
            Arc::new(activities.clone()),
        );
        let admins = AdminService::new(store, locks);

        Self {
            clients,
            guardians,
            activities,
            enrollments,
            evaluations,
            admins,
        }
    }
}
