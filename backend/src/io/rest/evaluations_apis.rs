//! # REST API for Evaluations
//!
//! Complaints, suggestions and compliments, the staff responses to them,
//! and aggregate statistics.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::commands::RelationOptions;
use crate::io::rest::flag;
use crate::io::rest::mappers::evaluation_mapper::EvaluationMapper;
use crate::AppState;
use shared::{
    CreateEvaluationRequest, EvaluationCategory, RespondEvaluationRequest, UpdateEvaluationRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_evaluations).post(create_evaluation))
        .route("/stats", get(get_stats))
        .route(
            "/:id",
            get(get_evaluation).patch(update_evaluation).delete(delete_evaluation),
        )
        .route("/:id/respond", put(respond_evaluation))
}

/// Filters are exclusive; checked in the order client, activity, category,
/// unit, unanswered
#[derive(Debug, Default, Deserialize)]
pub struct EvaluationListQuery {
    pub client_id: Option<String>,
    pub activity_id: Option<String>,
    pub category: Option<EvaluationCategory>,
    pub unit: Option<String>,
    pub unanswered: Option<String>,
    pub include_relations: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EvaluationReadQuery {
    pub include_relations: Option<String>,
}

fn relation_options(include_relations: Option<&str>) -> RelationOptions {
    if flag(include_relations) {
        RelationOptions::all()
    } else {
        RelationOptions::none()
    }
}

pub async fn create_evaluation(
    State(state): State<AppState>,
    Json(request): Json<CreateEvaluationRequest>,
) -> impl IntoResponse {
    info!("POST /api/evaluations - request: {:?}", request);

    let command = EvaluationMapper::to_create_command(request);
    match state.evaluation_service.create(command).await {
        Ok(evaluation) => {
            (StatusCode::CREATED, Json(EvaluationMapper::to_dto(evaluation))).into_response()
        }
        Err(e) => {
            error!("Failed to create evaluation: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_evaluations(
    State(state): State<AppState>,
    Query(query): Query<EvaluationListQuery>,
) -> impl IntoResponse {
    info!("GET /api/evaluations - query: {:?}", query);

    let service = &state.evaluation_service;
    let result = if let Some(client_id) = query.client_id.as_deref() {
        service.find_by_client(client_id).await
    } else if let Some(activity_id) = query.activity_id.as_deref() {
        service.find_by_activity(activity_id).await
    } else if let Some(category) = query.category {
        service.find_by_category(category).await
    } else if let Some(unit) = query.unit.as_deref() {
        service.find_by_unit(unit).await
    } else if flag(query.unanswered.as_deref()) {
        service.find_unanswered().await
    } else {
        service
            .find_all(relation_options(query.include_relations.as_deref()))
            .await
    };

    match result {
        Ok(evaluations) => {
            (StatusCode::OK, Json(EvaluationMapper::to_dto_list(evaluations))).into_response()
        }
        Err(e) => {
            error!("Failed to list evaluations: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/evaluations/stats");

    match state.evaluation_service.stats().await {
        Ok(stats) => (StatusCode::OK, Json(EvaluationMapper::to_stats_dto(stats))).into_response(),
        Err(e) => {
            error!("Failed to compute evaluation stats: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_evaluation(
    State(state): State<AppState>,
    Path(evaluation_id): Path<String>,
    Query(query): Query<EvaluationReadQuery>,
) -> impl IntoResponse {
    info!("GET /api/evaluations/{}", evaluation_id);

    let options = relation_options(query.include_relations.as_deref());
    match state.evaluation_service.find_by_id(&evaluation_id, options).await {
        Ok(evaluation) => (StatusCode::OK, Json(EvaluationMapper::to_dto(evaluation))).into_response(),
        Err(e) => {
            error!("Failed to get evaluation: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_evaluation(
    State(state): State<AppState>,
    Path(evaluation_id): Path<String>,
    Json(request): Json<UpdateEvaluationRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/evaluations/{} - request: {:?}", evaluation_id, request);

    let command = EvaluationMapper::to_update_command(evaluation_id, request);
    match state.evaluation_service.update(command).await {
        Ok(evaluation) => (StatusCode::OK, Json(EvaluationMapper::to_dto(evaluation))).into_response(),
        Err(e) => {
            error!("Failed to update evaluation: {}", e);
            e.into_response()
        }
    }
}

/// Record the staff response to an evaluation
pub async fn respond_evaluation(
    State(state): State<AppState>,
    Path(evaluation_id): Path<String>,
    Json(request): Json<RespondEvaluationRequest>,
) -> impl IntoResponse {
    info!("PUT /api/evaluations/{}/respond", evaluation_id);

    let command = EvaluationMapper::to_respond_command(evaluation_id, request);
    match state.evaluation_service.respond(command).await {
        Ok(evaluation) => (StatusCode::OK, Json(EvaluationMapper::to_dto(evaluation))).into_response(),
        Err(e) => {
            error!("Failed to respond to evaluation: {}", e);
            e.into_response()
        }
    }
}

pub async fn delete_evaluation(
    State(state): State<AppState>,
    Path(evaluation_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/evaluations/{}", evaluation_id);

    match state.evaluation_service.delete(&evaluation_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete evaluation: {}", e);
            e.into_response()
        }
    }
}
