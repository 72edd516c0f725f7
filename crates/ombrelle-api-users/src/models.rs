//! Request and response models for the users API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ombrelle_db::models::{TenantRole, TenantWithAccess, User};

/// A user profile as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier.
    pub id: Uuid,

    /// Email address.
    pub email: String,

    /// First name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Last name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

/// Request to update the caller's profile. Unset fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// New email address; must not belong to another user.
    #[serde(default)]
    pub email: Option<String>,

    /// New first name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// New last name.
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UpdateProfileRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if let Some(ref email) = self.email {
            if email.is_empty() {
                return Some("Email must not be empty".to_string());
            }
            if !email.contains('@') || !email.contains('.') {
                return Some("Invalid email format".to_string());
            }
            if email.len() > 254 {
                return Some("Email address too long (max 254 characters)".to_string());
            }
        }
        None
    }
}

/// One of the caller's tenant memberships.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MyTenantResponse {
    /// Tenant identifier.
    pub id: Uuid,

    /// Tenant display name.
    pub name: String,

    /// Tenant slug.
    pub slug: String,

    /// The caller's role in this tenant.
    pub role: TenantRole,

    /// Number of members in the tenant.
    pub member_count: i64,
}

impl From<TenantWithAccess> for MyTenantResponse {
    fn from(row: TenantWithAccess) -> Self {
        Self {
            id: row.tenant.id,
            name: row.tenant.name,
            slug: row.tenant.slug,
            role: row.my_role,
            member_count: row.member_count,
        }
    }
}

/// Request to switch the client's active tenant.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SwitchTenantRequest {
    /// Tenant to switch to; the caller must be a member.
    pub tenant_id: Uuid,
}

/// Confirmation of a tenant switch.
///
/// Tenancy of the session itself is a client/IdP concern: the backend
/// only certifies that the caller belongs to the tenant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SwitchTenantResponse {
    /// The now-active tenant.
    pub tenant_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_empty_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_none());
    }

    #[test]
    fn test_update_profile_rejects_bad_email() {
        let request = UpdateProfileRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.validate(),
            Some("Invalid email format".to_string())
        );
    }
}
