//! Error types for the tenant API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use ombrelle_db::DbError;

/// Errors that can occur during tenant, membership, and invitation
/// operations.
#[derive(Debug, Error)]
pub enum TenantError {
    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller has no membership in the target tenant.
    #[error("You do not have access to this tenant")]
    AccessDenied,

    /// The caller's role is not sufficient for this action.
    #[error("Only {0} can perform this action")]
    InsufficientPermissions(&'static str),

    /// Tenant does not exist.
    #[error("Tenant {0} not found")]
    TenantNotFound(Uuid),

    /// User does not exist.
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// Target user has no membership in this tenant.
    #[error("User is not a member of this tenant")]
    NotAMember,

    /// Slug is already taken by another tenant.
    #[error("Tenant with slug '{0}' already exists")]
    SlugExists(String),

    /// Direct member add for a user who already has a membership.
    #[error("User is already a member of this tenant")]
    AlreadyMember,

    /// Existing OWNER memberships can neither change role nor be removed.
    #[error("Cannot change or remove OWNER role")]
    CannotModifyOwner,

    /// OWNER is only ever assigned at tenant creation.
    #[error("Cannot set user as OWNER")]
    CannotGrantOwner,

    /// The invited email already maps to a member of this tenant.
    #[error("This user is already a member of the tenant")]
    UserAlreadyMember,

    /// An active invitation for this email and tenant already exists.
    #[error("There is already a pending invitation for this email")]
    PendingInvitationExists,

    /// The invitation email could not be delivered; the invitation was
    /// rolled back.
    #[error("Failed to send invitation email")]
    InvitationSendFailed,

    /// Invitation does not exist (or was cancelled — indistinguishable).
    #[error("Invitation not found")]
    InvitationNotFound,

    /// The invitation belongs to a different tenant than the path tenant.
    #[error("This invitation does not belong to the specified tenant")]
    InvitationNotBelongToTenant,

    /// Accepted invitations are immutable and cannot be cancelled.
    #[error("Cannot cancel an invitation that has already been accepted")]
    CannotCancelAccepted,

    /// The invitation token was already used.
    #[error("This invitation has already been accepted")]
    InvitationAlreadyAccepted,

    /// The invitation's 24-hour validity window has passed.
    #[error("This invitation has expired")]
    InvitationExpired,

    /// Unexpected database failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for TenantError {
    fn from(err: DbError) -> Self {
        TenantError::Database(err.to_string())
    }
}

/// Error response body for API errors.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable, actionable message.
    pub message: String,
}

impl TenantError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            TenantError::Validation(_) | TenantError::CannotCancelAccepted => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            TenantError::AccessDenied
            | TenantError::InsufficientPermissions(_)
            | TenantError::CannotModifyOwner
            | TenantError::CannotGrantOwner
            | TenantError::InvitationNotBelongToTenant => (StatusCode::FORBIDDEN, "forbidden"),
            TenantError::TenantNotFound(_)
            | TenantError::UserNotFound(_)
            | TenantError::NotAMember
            | TenantError::InvitationNotFound => (StatusCode::NOT_FOUND, "not_found"),
            TenantError::SlugExists(_)
            | TenantError::AlreadyMember
            | TenantError::UserAlreadyMember
            | TenantError::PendingInvitationExists => (StatusCode::CONFLICT, "conflict"),
            TenantError::InvitationAlreadyAccepted | TenantError::InvitationExpired => {
                (StatusCode::GONE, "gone")
            }
            TenantError::InvitationSendFailed => (StatusCode::BAD_GATEWAY, "mail_delivery_failed"),
            TenantError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for TenantError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Infrastructure details stay in the logs, not in the response.
        let message = match &self {
            TenantError::Database(detail) => {
                tracing::error!(error = %detail, "Database error");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
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
    fn test_not_found_statuses() {
        let id = Uuid::new_v4();
        assert_eq!(
            TenantError::TenantNotFound(id).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TenantError::InvitationNotFound.status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TenantError::NotAMember.status_and_code().0,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_statuses() {
        assert_eq!(
            TenantError::SlugExists("acme".to_string()).status_and_code().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            TenantError::PendingInvitationExists.status_and_code().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            TenantError::UserAlreadyMember.status_and_code().0,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_forbidden_statuses() {
        assert_eq!(
            TenantError::AccessDenied.status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TenantError::InsufficientPermissions("OWNER").status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TenantError::CannotModifyOwner.status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TenantError::CannotGrantOwner.status_and_code().0,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_terminal_invitation_states_are_gone() {
        assert_eq!(
            TenantError::InvitationAlreadyAccepted.status_and_code().0,
            StatusCode::GONE
        );
        assert_eq!(
            TenantError::InvitationExpired.status_and_code().0,
            StatusCode::GONE
        );
    }

    #[test]
    fn test_mail_failure_is_bad_gateway() {
        assert_eq!(
            TenantError::InvitationSendFailed.status_and_code().0,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err = TenantError::Database("connection refused at 10.0.0.5".to_string());
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_insufficient_permissions_message() {
        let err = TenantError::InsufficientPermissions("OWNER or ADMIN");
        assert_eq!(
            err.to_string(),
            "Only OWNER or ADMIN can perform this action"
        );
    }
}
