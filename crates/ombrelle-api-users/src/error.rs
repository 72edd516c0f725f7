//! Error types for the users API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use ombrelle_db::DbError;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The bearer token did not resolve to a local user.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User does not exist.
    #[error("User {0} not found")]
    NotFound(Uuid),

    /// Another user already owns this email address.
    #[error("Email '{0}' is already in use")]
    EmailExists(String),

    /// The caller has no membership in the requested tenant.
    #[error("You do not have access to tenant {0}")]
    NoTenantAccess(Uuid),

    /// Unexpected database failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for UserError {
    fn from(err: DbError) -> Self {
        UserError::Database(err.to_string())
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

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            UserError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            UserError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            UserError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            UserError::EmailExists(_) => (StatusCode::CONFLICT, "conflict", self.to_string()),
            UserError::NoTenantAccess(_) => {
                (StatusCode::FORBIDDEN, "forbidden", self.to_string())
            }
            UserError::Database(detail) => {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_exists_message() {
        let err = UserError::EmailExists("a@b.co".to_string());
        assert_eq!(err.to_string(), "Email 'a@b.co' is already in use");
    }
}
