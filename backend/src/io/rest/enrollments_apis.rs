//! # REST API for Enrollment Management
//!
//! Enrollments link a client to an activity. Creation enforces the admission
//! rule and the date guards; see `EnrollmentService`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::commands::RelationOptions;
use crate::io::rest::flag;
use crate::io::rest::mappers::enrollment_mapper::EnrollmentMapper;
use crate::AppState;
use shared::{
    CancelEnrollmentRequest, CreateEnrollmentRequest, EnrollmentStatus, UpdateEnrollmentRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(create_enrollment))
        .route(
            "/:id",
            get(get_enrollment).patch(update_enrollment).delete(delete_enrollment),
        )
        .route("/:id/cancel", patch(cancel_enrollment))
}

/// Filters are exclusive; checked in the order client, activity, status
#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentListQuery {
    pub client: Option<String>,
    pub activity: Option<String>,
    pub status: Option<EnrollmentStatus>,
    pub include_relations: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentReadQuery {
    pub include_relations: Option<String>,
}

fn relation_options(include_relations: Option<&str>) -> RelationOptions {
    if flag(include_relations) {
        RelationOptions::all()
    } else {
        RelationOptions::none()
    }
}

pub async fn create_enrollment(
    State(state): State<AppState>,
    Json(request): Json<CreateEnrollmentRequest>,
) -> impl IntoResponse {
    info!("POST /api/enrollments - request: {:?}", request);

    let command = EnrollmentMapper::to_create_command(request);
    match state.enrollment_service.create(command).await {
        Ok(enrollment) => {
            (StatusCode::CREATED, Json(EnrollmentMapper::to_dto(enrollment))).into_response()
        }
        Err(e) => {
            error!("Failed to create enrollment: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(query): Query<EnrollmentListQuery>,
) -> impl IntoResponse {
    info!("GET /api/enrollments - query: {:?}", query);

    let service = &state.enrollment_service;
    let result = if let Some(client_id) = query.client.as_deref() {
        service.find_by_client(client_id).await
    } else if let Some(activity_id) = query.activity.as_deref() {
        service.find_by_activity(activity_id).await
    } else if let Some(status) = query.status {
        service.find_by_status(status).await
    } else {
        service
            .find_all(relation_options(query.include_relations.as_deref()))
            .await
    };

    match result {
        Ok(enrollments) => {
            (StatusCode::OK, Json(EnrollmentMapper::to_dto_list(enrollments))).into_response()
        }
        Err(e) => {
            error!("Failed to list enrollments: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<String>,
    Query(query): Query<EnrollmentReadQuery>,
) -> impl IntoResponse {
    info!("GET /api/enrollments/{}", enrollment_id);

    let options = relation_options(query.include_relations.as_deref());
    match state.enrollment_service.find_by_id(&enrollment_id, options).await {
        Ok(enrollment) => (StatusCode::OK, Json(EnrollmentMapper::to_dto(enrollment))).into_response(),
        Err(e) => {
            error!("Failed to get enrollment: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<String>,
    Json(request): Json<UpdateEnrollmentRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/enrollments/{} - request: {:?}", enrollment_id, request);

    let command = EnrollmentMapper::to_update_command(enrollment_id, request);
    match state.enrollment_service.update(command).await {
        Ok(enrollment) => (StatusCode::OK, Json(EnrollmentMapper::to_dto(enrollment))).into_response(),
        Err(e) => {
            error!("Failed to update enrollment: {}", e);
            e.into_response()
        }
    }
}

/// Cancel an enrollment; the body with a reason is optional
pub async fn cancel_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<String>,
    body: Option<Json<CancelEnrollmentRequest>>,
) -> impl IntoResponse {
    info!("PATCH /api/enrollments/{}/cancel", enrollment_id);

    let request = body.map(|Json(request)| request).unwrap_or_default();
    let command = EnrollmentMapper::to_cancel_command(enrollment_id, request);
    match state.enrollment_service.cancel(command).await {
        Ok(enrollment) => (StatusCode::OK, Json(EnrollmentMapper::to_dto(enrollment))).into_response(),
        Err(e) => {
            error!("Failed to cancel enrollment: {}", e);
            e.into_response()
        }
    }
}

pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/enrollments/{}", enrollment_id);

    match state.enrollment_service.delete(&enrollment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete enrollment: {}", e);
            e.into_response()
        }
    }
}
