//! Error types for the items API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use ombrelle_db::DbError;

/// Errors that can occur during item operations.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller has no membership in the target tenant.
    #[error("You do not have access to this tenant")]
    AccessDenied,

    /// Item does not exist in this tenant.
    #[error("Item {0} not found")]
    NotFound(Uuid),

    /// Unexpected database failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for ItemError {
    fn from(err: DbError) -> Self {
        ItemError::Database(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ItemError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ItemError::AccessDenied => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            ItemError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            ItemError::Database(detail) => {
                tracing::error!(error = %detail, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
