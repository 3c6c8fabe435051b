//! # Registration Backend
//!
//! HTTP backend for a registration office: clients, the guardians who run
//! activities, enrollments of clients in activities, client evaluations and
//! the administrators who manage it all.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (services, integrity rules)
//!     ↓
//! Storage Layer (record store, keyed locks)
//! ```
//!
//! The binary in `main.rs` reads [`config::AppConfig`], calls
//! [`initialize_backend`] and serves [`create_router`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    ActivityService, AdminService, ClientService, DomainServices, EnrollmentService,
    EvaluationService, GuardianService,
};
use crate::storage::{KeyedLocks, RecordStore, YamlConnection, YamlDocumentStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub client_service: ClientService,
    pub guardian_service: GuardianService,
    pub activity_service: ActivityService,
    pub enrollment_service: EnrollmentService,
    pub evaluation_service: EvaluationService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let services = DomainServices::new(store, KeyedLocks::new());
        Self {
            client_service: services.clients,
            guardian_service: services.guardians,
            activity_service: services.activities,
            enrollment_service: services.enrollments,
            evaluation_service: services.evaluations,
            admin_service: services.admins,
        }
    }
}

/// Open the record store under the configured data directory and wire every service
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Opening record store at {}", config.data_dir.display());
    let connection = YamlConnection::new(&config.data_dir).with_context(|| {
        format!("Failed to open data directory {}", config.data_dir.display())
    })?;

    info!("Setting up domain services");
    let store: Arc<dyn RecordStore> = Arc::new(YamlDocumentStore::new(connection));
    Ok(AppState::new(store))
}

/// Create the Axum router with all routes under `/api`
pub fn create_router(app_state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    // CORS setup to allow the configured frontends to make requests
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(cors)
        .with_state(app_state))
}
