use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use thiserror::Error;
use tracing::error;

/// Failure the envelope cannot express (storage down, KDF failure).
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self { ApiError(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // details stay in the log
        error!(code = self.0.code(), error = %self.0, "request failed");
        let (status, msg) = match self.0 {
            AuthError::StorageUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
