//! Server error types.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use film_service::ServiceError;
use serde_json::json;

/// Machine-readable codes carried in error bodies.
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request body or query could not be parsed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error raised by the film services.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ServerError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST)
            }
            ServerError::Service(ServiceError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_FAILED)
            }
            ServerError::Service(ServiceError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND)
            }
            ServerError::Service(ServiceError::Internal(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        };

        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
