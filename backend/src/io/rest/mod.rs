//! # REST API Interface Layer
//!
//! HTTP endpoints for the registration backend, one module per resource.
//! Each module exposes a `router()` that is nested under `/api/<resource>`.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: CRUD plus the filtered reads of every resource
//! - **Error Handling**: Domain errors become `{error, message}` bodies
//! - **Request Logging**: Every handler logs its method and path

pub mod activities_apis;
pub mod admins_apis;
pub mod clients_apis;
pub mod enrollments_apis;
pub mod error;
pub mod evaluations_apis;
pub mod guardians_apis;
pub mod health_apis;
pub mod mappers;

use axum::Router;

use crate::AppState;

/// Every resource router under its path prefix
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/health", health_apis::router())
        .nest("/clients", clients_apis::router())
        .nest("/guardians", guardians_apis::router())
        .nest("/activities", activities_apis::router())
        .nest("/enrollments", enrollments_apis::router())
        .nest("/evaluations", evaluations_apis::router())
        .nest("/admins", admins_apis::router())
}

/// Query flags accept `true`/`false` as well as `1`/`0`
pub(crate) fn flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}
