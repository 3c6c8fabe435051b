//! # REST API for Guardian Management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::io::rest::mappers::guardian_mapper::GuardianMapper;
use crate::AppState;
use shared::{CreateGuardianRequest, UpdateGuardianRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_guardians).post(create_guardian))
        .route("/:id", get(get_guardian).patch(update_guardian).delete(delete_guardian))
}

/// `registration` wins over `name` when both are given
#[derive(Debug, Default, Deserialize)]
pub struct GuardianListQuery {
    pub name: Option<String>,
    pub registration: Option<String>,
}

pub async fn create_guardian(
    State(state): State<AppState>,
    Json(request): Json<CreateGuardianRequest>,
) -> impl IntoResponse {
    info!("POST /api/guardians - request: {:?}", request);

    let command = GuardianMapper::to_create_command(request);
    match state.guardian_service.create(command).await {
        Ok(guardian) => (StatusCode::CREATED, Json(GuardianMapper::to_dto(guardian))).into_response(),
        Err(e) => {
            error!("Failed to create guardian: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_guardians(
    State(state): State<AppState>,
    Query(query): Query<GuardianListQuery>,
) -> impl IntoResponse {
    info!("GET /api/guardians - query: {:?}", query);

    let result = if let Some(registration) = query.registration.as_deref() {
        state.guardian_service.find_by_registration(registration).await
    } else if let Some(name) = query.name.as_deref() {
        state.guardian_service.find_by_name(name).await
    } else {
        state.guardian_service.find_all().await
    };

    match result {
        Ok(guardians) => (StatusCode::OK, Json(GuardianMapper::to_dto_list(guardians))).into_response(),
        Err(e) => {
            error!("Failed to list guardians: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_guardian(
    State(state): State<AppState>,
    Path(guardian_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/guardians/{}", guardian_id);

    match state.guardian_service.find_by_id(&guardian_id).await {
        Ok(guardian) => (StatusCode::OK, Json(GuardianMapper::to_dto(guardian))).into_response(),
        Err(e) => {
            error!("Failed to get guardian: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_guardian(
    State(state): State<AppState>,
    Path(guardian_id): Path<String>,
    Json(request): Json<UpdateGuardianRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/guardians/{} - request: {:?}", guardian_id, request);

    let command = GuardianMapper::to_update_command(guardian_id, request);
    match state.guardian_service.update(command).await {
        Ok(guardian) => (StatusCode::OK, Json(GuardianMapper::to_dto(guardian))).into_response(),
        Err(e) => {
            error!("Failed to update guardian: {}", e);
            e.into_response()
        }
    }
}

pub async fn delete_guardian(
    State(state): State<AppState>,
    Path(guardian_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/guardians/{}", guardian_id);

    match state.guardian_service.delete(&guardian_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete guardian: {}", e);
            e.into_response()
        }
    }
}
