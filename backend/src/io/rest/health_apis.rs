//! Liveness endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::debug;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

pub async fn health() -> impl IntoResponse {
    debug!("GET /api/health");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
