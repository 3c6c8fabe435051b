//! Translation of domain failures into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::DomainError;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

/// Build the JSON error body every failing endpoint returns
pub fn error_response(status: StatusCode, kind: &str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: kind.to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        match self {
            DomainError::Validation(message) => {
                error_response(StatusCode::BAD_REQUEST, VALIDATION_ERROR, message)
            }
            DomainError::NotFound(message) => error_response(StatusCode::NOT_FOUND, NOT_FOUND, message),
            DomainError::Storage(e) => {
                error!("Storage failure: {}", e);
                // Storage details stay in the log
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    STORAGE_ERROR,
                    "The record store could not complete the request",
                )
            }
        }
    }
}
