//! HTTP-facing error type.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::ollama::RunnerError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Body missing, not JSON, not an object, or empty.
    #[error("Invalid request data")]
    InvalidRequest(String),

    #[error("Failed to get recommendations from Ollama")]
    ModelUnavailable(#[source] RunnerError),

    #[error("Failed to get recommendations from Ollama")]
    EmptyModelOutput,

    #[error("Failed to parse recommendations from Ollama")]
    UnparseableOutput,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::InvalidRequest(reason) => {
                tracing::debug!(reason = %reason, "Rejected request");
            }
            Self::ModelUnavailable(source) => {
                tracing::error!(error = %source, "{self}");
            }
            _ => tracing::error!(error = ?self, "{self}"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
