//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.
//!
//! Dates arrive as raw `YYYY-MM-DD` strings; the services parse and validate them.

pub mod client {
    /// Input for registering a new client.
    #[derive(Debug, Clone)]
    pub struct CreateClientCommand {
        pub name: String,
        pub birth_date: String,
        pub street: String,
        pub number: String,
        pub district: String,
        pub city: String,
        pub state: String,
        pub postal_code: String,
        pub complement: Option<String>,
    }

    /// Partial update; `None` leaves the stored value alone.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateClientCommand {
        pub client_id: String,
        pub name: Option<String>,
        pub birth_date: Option<String>,
        pub street: Option<String>,
        pub number: Option<String>,
        pub district: Option<String>,
        pub city: Option<String>,
        pub state: Option<String>,
        pub postal_code: Option<String>,
        pub complement: Option<String>,
    }
}

pub mod guardian {
    #[derive(Debug, Clone)]
    pub struct CreateGuardianCommand {
        pub name: String,
        pub registration: String,
        pub client_id: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateGuardianCommand {
        pub guardian_id: String,
        pub name: Option<String>,
        pub registration: Option<String>,
        pub client_id: Option<String>,
    }
}

pub mod activity {
    #[derive(Debug, Clone)]
    pub struct CreateActivityCommand {
        pub name: String,
        pub description: String,
        pub unit: String,
        pub responsible_id: String,
        pub capacity: Option<u32>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateActivityCommand {
        pub activity_id: String,
        pub name: Option<String>,
        pub description: Option<String>,
        pub unit: Option<String>,
        pub responsible_id: Option<String>,
        pub capacity: Option<u32>,
    }

    /// How much of the related data to embed in activity reads.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ActivityReadOptions {
        pub include_responsible: bool,
    }
}

pub mod enrollment {
    use shared::EnrollmentStatus;

    #[derive(Debug, Clone)]
    pub struct CreateEnrollmentCommand {
        pub client_id: String,
        pub activity_id: String,
        pub start_date: String,
        pub end_date: Option<String>,
        /// Defaults to active
        pub status: Option<EnrollmentStatus>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateEnrollmentCommand {
        pub enrollment_id: String,
        pub client_id: Option<String>,
        pub activity_id: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub status: Option<EnrollmentStatus>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CancelEnrollmentCommand {
        pub enrollment_id: String,
        pub reason: Option<String>,
    }
}

pub mod evaluation {
    use shared::EvaluationCategory;

    #[derive(Debug, Clone)]
    pub struct CreateEvaluationCommand {
        pub client_id: String,
        pub activity_id: Option<String>,
        pub category: EvaluationCategory,
        pub title: String,
        pub body: String,
        pub rating: Option<u8>,
        pub unit: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateEvaluationCommand {
        pub evaluation_id: String,
        pub client_id: Option<String>,
        pub activity_id: Option<String>,
        pub category: Option<EvaluationCategory>,
        pub title: Option<String>,
        pub body: Option<String>,
        pub rating: Option<u8>,
        pub unit: Option<String>,
    }

    /// Staff reply to an evaluation.
    #[derive(Debug, Clone)]
    pub struct RespondEvaluationCommand {
        pub evaluation_id: String,
        pub response: String,
        pub responded_by: String,
    }
}

pub mod admin {
    #[derive(Debug, Clone)]
    pub struct CreateAdministratorCommand {
        pub name: String,
        pub email: String,
        pub password: String,
        pub registration: String,
        pub role: Option<String>,
        pub unit: Option<String>,
    }

    /// A new password is re-hashed before it is stored.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateAdministratorCommand {
        pub admin_id: String,
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
        pub registration: Option<String>,
        pub role: Option<String>,
        pub unit: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Clone)]
    pub struct SetAdministratorStatusCommand {
        pub admin_id: String,
        pub active: bool,
    }
}

/// Embedding of client/activity data in enrollment and evaluation reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationOptions {
    pub include_client: bool,
    pub include_activity: bool,
}

impl RelationOptions {
    pub fn all() -> Self {
        Self {
            include_client: true,
            include_activity: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}
