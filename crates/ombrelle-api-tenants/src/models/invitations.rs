//! Invitation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ombrelle_db::models::{Invitation, TenantRole};

use super::validate_email;

/// Request to invite an email address into a tenant.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateInvitationRequest {
    /// Email address of the person to invite.
    pub email: String,

    /// Role granted on acceptance. Defaults to MEMBER.
    #[serde(default = "default_role")]
    pub role: TenantRole,
}

fn default_role() -> TenantRole {
    TenantRole::Member
}

impl CreateInvitationRequest {
    /// Validate the request and return an error message if invalid.
    ///
    /// OWNER can never be granted through acceptance; an invitation
    /// carries MEMBER or ADMIN only.
    pub fn validate(&self) -> Option<String> {
        if let Some(error) = validate_email(&self.email) {
            return Some(error);
        }
        if self.role == TenantRole::Owner {
            return Some("Role must be ADMIN or MEMBER".to_string());
        }
        None
    }
}

/// Request to accept an invitation by token.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AcceptInvitationRequest {
    /// Invitation token from the email link.
    pub token: String,
}

impl AcceptInvitationRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if self.token.is_empty() {
            return Some("Token is required".to_string());
        }
        None
    }
}

/// An invitation as returned to tenant administrators.
///
/// The token is never echoed back through the API; it travels only in
/// the invitation email.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvitationResponse {
    /// Unique invitation identifier.
    pub id: Uuid,

    /// Invitee email.
    pub email: String,

    /// Role granted on acceptance.
    pub role: TenantRole,

    /// Whether the invitation has been accepted.
    pub accepted: bool,

    /// Whether the invitation has expired (computed at read time).
    pub expired: bool,

    /// When the invitation was created.
    pub created_at: DateTime<Utc>,

    /// When the invitation expires.
    pub expires_at: DateTime<Utc>,

    /// User who issued the invitation.
    pub invited_by: Uuid,
}

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        let expired = invitation.is_expired();
        Self {
            id: invitation.id,
            email: invitation.email,
            role: invitation.role,
            accepted: invitation.accepted,
            expired,
            created_at: invitation.created_at,
            expires_at: invitation.expires_at,
            invited_by: invitation.invited_by,
        }
    }
}

/// Public details shown to an invitee before acceptance.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvitationDetailResponse {
    /// Invitee email.
    pub email: String,

    /// Name of the tenant the invitee would join.
    pub tenant_name: String,

    /// Display name of the inviting user.
    pub inviter_name: String,

    /// Role granted on acceptance.
    pub role: TenantRole,

    /// When the invitation expires.
    pub expires_at: DateTime<Utc>,
}

/// Response after a successful acceptance.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AcceptInvitationResponse {
    /// Status message for the client.
    pub message: String,

    /// The (possibly newly created) local user.
    pub user_id: Uuid,

    /// Tenant the user joined.
    pub tenant_id: Uuid,

    /// Granted role.
    pub role: TenantRole,

    /// The client should send the user through Keycloak login next;
    /// acceptance grants membership, not a session.
    pub redirect_to_login: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_invitation_request_valid() {
        let request = CreateInvitationRequest {
            email: "user@example.com".to_string(),
            role: TenantRole::Member,
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_create_invitation_request_admin_role() {
        let request = CreateInvitationRequest {
            email: "admin@example.com".to_string(),
            role: TenantRole::Admin,
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_create_invitation_request_rejects_owner() {
        let request = CreateInvitationRequest {
            email: "user@example.com".to_string(),
            role: TenantRole::Owner,
        };
        assert_eq!(
            request.validate(),
            Some("Role must be ADMIN or MEMBER".to_string())
        );
    }

    #[test]
    fn test_create_invitation_request_defaults_to_member() {
        let request: CreateInvitationRequest =
            serde_json::from_str(r#"{"email":"user@example.com"}"#).unwrap();
        assert_eq!(request.role, TenantRole::Member);
    }

    #[test]
    fn test_create_invitation_request_invalid_email() {
        let request = CreateInvitationRequest {
            email: "invalid-email".to_string(),
            role: TenantRole::Member,
        };
        assert_eq!(request.validate(), Some("Invalid email format".to_string()));
    }

    #[test]
    fn test_accept_invitation_request_empty_token() {
        let request = AcceptInvitationRequest {
            token: String::new(),
        };
        assert_eq!(request.validate(), Some("Token is required".to_string()));
    }

    #[test]
    fn test_invitation_response_never_contains_token() {
        let json = serde_json::to_string(&InvitationResponse {
            id: Uuid::new_v4(),
            email: "b@example.com".to_string(),
            role: TenantRole::Member,
            accepted: false,
            expired: false,
            created_at: Utc::now(),
            expires_at: Utc::now(),
            invited_by: Uuid::new_v4(),
        })
        .unwrap();
        assert!(!json.contains("token"));
    }
}
