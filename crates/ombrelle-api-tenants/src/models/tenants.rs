//! Tenant and membership DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ombrelle_db::models::{Membership, MembershipWithUser, Tenant, TenantRole, TenantWithAccess};

use super::validate_slug;

/// Request to create a new tenant.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTenantRequest {
    /// Display name of the tenant (e.g. "Acme Corporation").
    pub name: String,

    /// Unique slug (lowercase alphanumeric and hyphens, e.g. "acme-corp").
    pub slug: String,
}

impl CreateTenantRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().len() < 2 {
            return Some("Name must be at least 2 characters".to_string());
        }
        if self.name.len() > 100 {
            return Some("Name must be at most 100 characters".to_string());
        }
        validate_slug(&self.slug)
    }
}

/// Request to update a tenant. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTenantRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,

    /// New slug; must still be unique.
    #[serde(default)]
    pub slug: Option<String>,
}

impl UpdateTenantRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if let Some(ref name) = self.name {
            if name.trim().len() < 2 {
                return Some("Name must be at least 2 characters".to_string());
            }
            if name.len() > 100 {
                return Some("Name must be at most 100 characters".to_string());
            }
        }
        if let Some(ref slug) = self.slug {
            return validate_slug(slug);
        }
        None
    }

    /// True when the request changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none()
    }
}

/// Request to add an existing user to a tenant directly (without an
/// invitation).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddMemberRequest {
    /// The user to add.
    pub user_id: Uuid,

    /// Role to grant.
    #[serde(default = "default_role")]
    pub role: TenantRole,
}

/// Request to change a member's role.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMemberRoleRequest {
    /// The new role.
    pub role: TenantRole,
}

fn default_role() -> TenantRole {
    TenantRole::Member
}

/// A tenant as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TenantResponse {
    /// Unique tenant identifier.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Unique slug.
    pub slug: String,

    /// The caller's role in this tenant, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_role: Option<TenantRole>,

    /// When the tenant was created.
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TenantResponse {
    /// Build a response from a tenant row and the caller's membership.
    pub fn from_tenant(tenant: Tenant, my_role: Option<TenantRole>) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            slug: tenant.slug,
            my_role,
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
        }
    }
}

/// A tenant in the caller's tenant listing, with the member count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TenantSummaryResponse {
    /// Unique tenant identifier.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Unique slug.
    pub slug: String,

    /// The caller's role in this tenant.
    pub my_role: TenantRole,

    /// Number of members in the tenant.
    pub member_count: i64,

    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
}

impl From<TenantWithAccess> for TenantSummaryResponse {
    fn from(row: TenantWithAccess) -> Self {
        Self {
            id: row.tenant.id,
            name: row.tenant.name,
            slug: row.tenant.slug,
            my_role: row.my_role,
            member_count: row.member_count,
            created_at: row.tenant.created_at,
        }
    }
}

/// A tenant member as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberResponse {
    /// Membership identifier.
    pub id: Uuid,

    /// Member user ID.
    pub user_id: Uuid,

    /// Member email.
    pub email: String,

    /// Member first name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Member last name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// The member's role.
    pub role: TenantRole,

    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}

impl From<MembershipWithUser> for MemberResponse {
    fn from(row: MembershipWithUser) -> Self {
        Self {
            id: row.membership.id,
            user_id: row.membership.user_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.membership.role,
            created_at: row.membership.created_at,
        }
    }
}

impl MemberResponse {
    /// Build a response for a bare membership (e.g. after a role change),
    /// joining user fields supplied by the caller.
    pub fn from_membership(membership: Membership, email: String) -> Self {
        Self {
            id: membership.id,
            user_id: membership.user_id,
            email,
            first_name: None,
            last_name: None,
            role: membership.role,
            created_at: membership.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tenant_request_valid() {
        let request = CreateTenantRequest {
            name: "Acme Corporation".to_string(),
            slug: "acme-corp".to_string(),
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_create_tenant_request_short_name() {
        let request = CreateTenantRequest {
            name: "A".to_string(),
            slug: "acme-corp".to_string(),
        };
        assert_eq!(
            request.validate(),
            Some("Name must be at least 2 characters".to_string())
        );
    }

    #[test]
    fn test_create_tenant_request_bad_slug() {
        let request = CreateTenantRequest {
            name: "Acme".to_string(),
            slug: "Acme-Corp".to_string(),
        };
        assert!(request.validate().is_some());
    }

    #[test]
    fn test_update_tenant_request_empty_is_valid() {
        let request = UpdateTenantRequest::default();
        assert!(request.validate().is_none());
        assert!(request.is_empty());
    }

    #[test]
    fn test_update_tenant_request_validates_slug() {
        let request = UpdateTenantRequest {
            name: None,
            slug: Some("-bad".to_string()),
        };
        assert!(request.validate().is_some());
    }

    #[test]
    fn test_add_member_request_defaults_to_member() {
        let request: AddMemberRequest =
            serde_json::from_str(&format!(r#"{{"user_id":"{}"}}"#, Uuid::new_v4())).unwrap();
        assert_eq!(request.role, TenantRole::Member);
    }

    #[test]
    fn test_add_member_request_accepts_explicit_owner() {
        // The direct-add path does not reject OWNER at the DTO level;
        // see DESIGN.md for why this asymmetry is preserved.
        let request: AddMemberRequest = serde_json::from_str(&format!(
            r#"{{"user_id":"{}","role":"OWNER"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert_eq!(request.role, TenantRole::Owner);
    }
}
