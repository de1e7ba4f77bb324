//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_core::ChatResponse;
use chatrelay_core::completion::CompletionError;
use thiserror::Error;
use tracing::error;

/// Message returned to clients for every relay failure.
pub const RELAY_ERROR_MESSAGE: &str = "Error processing your request";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Relay failures. All of them answer `500 { "error": ... }`; the detail is
/// only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("chat request failed: {self}");
        let body = Json(ChatResponse::error(RELAY_ERROR_MESSAGE));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
