//! # REST API for Client Management
//!
//! Endpoints for registering, searching, updating and deleting clients.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::io::rest::mappers::client_mapper::ClientMapper;
use crate::AppState;
use shared::{CreateClientRequest, UpdateClientRequest};

/// Create a router for client related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client).patch(update_client).delete(delete_client))
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientListQuery {
    pub name: Option<String>,
}

/// Register a new client
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> impl IntoResponse {
    info!("POST /api/clients - request: {:?}", request);

    let command = ClientMapper::to_create_command(request);
    match state.client_service.create(command).await {
        Ok(client) => (StatusCode::CREATED, Json(ClientMapper::to_dto(client))).into_response(),
        Err(e) => {
            error!("Failed to create client: {}", e);
            e.into_response()
        }
    }
}

/// List clients, optionally filtered by a name fragment
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientListQuery>,
) -> impl IntoResponse {
    info!("GET /api/clients - query: {:?}", query);

    let result = match query.name.as_deref() {
        Some(name) => state.client_service.find_by_name(name).await,
        None => state.client_service.find_all().await,
    };

    match result {
        Ok(clients) => (StatusCode::OK, Json(ClientMapper::to_dto_list(clients))).into_response(),
        Err(e) => {
            error!("Failed to list clients: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/clients/{}", client_id);

    match state.client_service.find_by_id(&client_id).await {
        Ok(client) => (StatusCode::OK, Json(ClientMapper::to_dto(client))).into_response(),
        Err(e) => {
            error!("Failed to get client: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/clients/{} - request: {:?}", client_id, request);

    let command = ClientMapper::to_update_command(client_id, request);
    match state.client_service.update(command).await {
        Ok(client) => (StatusCode::OK, Json(ClientMapper::to_dto(client))).into_response(),
        Err(e) => {
            error!("Failed to update client: {}", e);
            e.into_response()
        }
    }
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/clients/{}", client_id);

    match state.client_service.delete(&client_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete client: {}", e);
            e.into_response()
        }
    }
}
