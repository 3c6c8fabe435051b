//! # REST API for Administrators
//!
//! Account management plus login. Responses never include the password hash.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::io::rest::error::{error_response, UNAUTHORIZED};
use crate::io::rest::mappers::admin_mapper::AdminMapper;
use crate::AppState;
use shared::{
    CreateAdministratorRequest, LoginRequest, SetAdministratorStatusRequest,
    UpdateAdministratorRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/login", post(login))
        .route("/:id", get(get_admin).patch(update_admin).delete(delete_admin))
        .route("/:id/status", put(set_admin_status))
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    pub name: Option<String>,
    pub registration: Option<String>,
}

pub async fn create_admin(
    State(state): State<AppState>,
    Json(request): Json<CreateAdministratorRequest>,
) -> impl IntoResponse {
    info!("POST /api/admins - email: {}", request.email);

    let command = AdminMapper::to_create_command(request);
    match state.admin_service.create(command).await {
        Ok(admin) => (StatusCode::CREATED, Json(AdminMapper::to_dto(admin))).into_response(),
        Err(e) => {
            error!("Failed to create administrator: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_admins(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> impl IntoResponse {
    info!("GET /api/admins - query: {:?}", query);

    let result = if let Some(registration) = query.registration.as_deref() {
        state.admin_service.find_by_registration(registration).await
    } else if let Some(name) = query.name.as_deref() {
        state.admin_service.find_by_name(name).await
    } else {
        state.admin_service.find_all().await
    };

    match result {
        Ok(admins) => (StatusCode::OK, Json(AdminMapper::to_dto_list(admins))).into_response(),
        Err(e) => {
            error!("Failed to list administrators: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/admins/{}", admin_id);

    match state.admin_service.find_by_id(&admin_id).await {
        Ok(admin) => (StatusCode::OK, Json(AdminMapper::to_dto(admin))).into_response(),
        Err(e) => {
            error!("Failed to get administrator: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
    Json(request): Json<UpdateAdministratorRequest>,
) -> impl IntoResponse {
    // Body is not logged; it may carry a password
    info!("PATCH /api/admins/{}", admin_id);

    let command = AdminMapper::to_update_command(admin_id, request);
    match state.admin_service.update(command).await {
        Ok(admin) => (StatusCode::OK, Json(AdminMapper::to_dto(admin))).into_response(),
        Err(e) => {
            error!("Failed to update administrator: {}", e);
            e.into_response()
        }
    }
}

pub async fn delete_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/admins/{}", admin_id);

    match state.admin_service.delete(&admin_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete administrator: {}", e);
            e.into_response()
        }
    }
}

/// Activate or deactivate an administrator
pub async fn set_admin_status(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
    Json(request): Json<SetAdministratorStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/admins/{}/status - active: {}", admin_id, request.active);

    let command = AdminMapper::to_status_command(admin_id, request);
    match state.admin_service.set_status(command).await {
        Ok(admin) => (StatusCode::OK, Json(AdminMapper::to_dto(admin))).into_response(),
        Err(e) => {
            error!("Failed to set administrator status: {}", e);
            e.into_response()
        }
    }
}

/// Check credentials; every rejection looks the same to the caller
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/admins/login - email: {}", request.email);

    let command = AdminMapper::to_login_command(request);
    match state.admin_service.login(command).await {
        Ok(Some(admin)) => (StatusCode::OK, Json(AdminMapper::to_dto(admin))).into_response(),
        Ok(None) => {
            warn!("Rejected login attempt");
            error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED, "Invalid email or password")
        }
        Err(e) => {
            error!("Failed to log in: {}", e);
            e.into_response()
        }
    }
}
