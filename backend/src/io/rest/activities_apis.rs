//! # REST API for Activity Management
//!
//! Activities always carry their enrollment count; the responsible guardian
//! is embedded on request (`?include_responsible=true`) and always on create.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::commands::activity::ActivityReadOptions;
use crate::io::rest::flag;
use crate::io::rest::mappers::activity_mapper::ActivityMapper;
use crate::AppState;
use shared::{CreateActivityRequest, UpdateActivityRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route("/:id", get(get_activity).patch(update_activity).delete(delete_activity))
}

/// Filters are exclusive; checked in the order unit, responsible, name
#[derive(Debug, Default, Deserialize)]
pub struct ActivityListQuery {
    pub unit: Option<String>,
    pub responsible: Option<String>,
    pub name: Option<String>,
    pub include_responsible: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityReadQuery {
    pub include_responsible: Option<String>,
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(request): Json<CreateActivityRequest>,
) -> impl IntoResponse {
    info!("POST /api/activities - request: {:?}", request);

    let command = ActivityMapper::to_create_command(request);
    match state.activity_service.create(command).await {
        Ok(activity) => (StatusCode::CREATED, Json(ActivityMapper::to_dto(activity))).into_response(),
        Err(e) => {
            error!("Failed to create activity: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivityListQuery>,
) -> impl IntoResponse {
    info!("GET /api/activities - query: {:?}", query);

    let options = ActivityReadOptions {
        include_responsible: flag(query.include_responsible.as_deref()),
    };
    let service = &state.activity_service;

    let result = if let Some(unit) = query.unit.as_deref() {
        service.find_by_unit(unit, options).await
    } else if let Some(responsible_id) = query.responsible.as_deref() {
        service.find_by_responsible(responsible_id, options).await
    } else if let Some(name) = query.name.as_deref() {
        service.find_by_name(name, options).await
    } else {
        service.find_all(options).await
    };

    match result {
        Ok(activities) => (StatusCode::OK, Json(ActivityMapper::to_dto_list(activities))).into_response(),
        Err(e) => {
            error!("Failed to list activities: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    Query(query): Query<ActivityReadQuery>,
) -> impl IntoResponse {
    info!("GET /api/activities/{}", activity_id);

    let options = ActivityReadOptions {
        include_responsible: flag(query.include_responsible.as_deref()),
    };
    match state.activity_service.find_by_id(&activity_id, options).await {
        Ok(activity) => (StatusCode::OK, Json(ActivityMapper::to_dto(activity))).into_response(),
        Err(e) => {
            error!("Failed to get activity: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    Json(request): Json<UpdateActivityRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/activities/{} - request: {:?}", activity_id, request);

    let command = ActivityMapper::to_update_command(activity_id, request);
    match state.activity_service.update(command).await {
        Ok(activity) => (StatusCode::OK, Json(ActivityMapper::to_dto(activity))).into_response(),
        Err(e) => {
            error!("Failed to update activity: {}", e);
            e.into_response()
        }
    }
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/activities/{}", activity_id);

    match state.activity_service.delete(&activity_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete activity: {}", e);
            e.into_response()
        }
    }
}
