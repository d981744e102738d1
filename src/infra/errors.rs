// src/infra/errors.rs — Error types for promptbench

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or missing request fields. Surfaces as 400.
    #[error("{0}")]
    Validation(String),

    /// Unknown execution identifier. Surfaces as 404.
    #[error("{0}")]
    NotFound(String),

    /// Transport, auth, or provider-side failure on the remote call.
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServiceError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "detail": msg }),
            ),
            ServiceError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "detail": msg }),
            ),
            other => {
                tracing::error!("internal error: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "detail": "Internal server error",
                        "error": other.to_string(),
                    }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
