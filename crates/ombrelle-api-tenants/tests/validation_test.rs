//! Validation tests for the tenant API request models.

use ombrelle_api_tenants::models::{
    AcceptInvitationRequest, CreateInvitationRequest, CreateTenantRequest, UpdateTenantRequest,
};
use ombrelle_db::models::TenantRole;

#[test]
fn test_create_tenant_accepts_well_formed_slug() {
    let request = CreateTenantRequest {
        name: "Acme Corporation".to_string(),
        slug: "acme-corp".to_string(),
    };
    assert!(request.validate().is_none());
}

#[test]
fn test_create_tenant_rejects_malformed_slugs() {
    for slug in ["UPPER", "under_score", "-lead", "trail-", "a", "sp ace", "double--hyphen"] {
        let request = CreateTenantRequest {
            name: "Acme".to_string(),
            slug: slug.to_string(),
        };
        assert!(
            request.validate().is_some(),
            "slug '{slug}' should be rejected"
        );
    }
}

#[test]
fn test_create_tenant_rejects_overlong_slug() {
    let request = CreateTenantRequest {
        name: "Acme".to_string(),
        slug: "a".repeat(51),
    };
    assert_eq!(
        request.validate(),
        Some("Slug must be between 2 and 50 characters".to_string())
    );
}

#[test]
fn test_update_tenant_validates_only_provided_fields() {
    let request = UpdateTenantRequest {
        name: Some("New Name".to_string()),
        slug: None,
    };
    assert!(request.validate().is_none());

    let request = UpdateTenantRequest {
        name: None,
        slug: Some("Bad Slug".to_string()),
    };
    assert!(request.validate().is_some());
}

#[test]
fn test_invitation_role_is_member_by_default() {
    let request: CreateInvitationRequest =
        serde_json::from_str(r#"{"email":"someone@example.com"}"#).unwrap();
    assert_eq!(request.role, TenantRole::Member);
    assert!(request.validate().is_none());
}

#[test]
fn test_invitation_owner_role_is_rejected() {
    let request: CreateInvitationRequest =
        serde_json::from_str(r#"{"email":"someone@example.com","role":"OWNER"}"#).unwrap();
    assert_eq!(
        request.validate(),
        Some("Role must be ADMIN or MEMBER".to_string())
    );
}

#[test]
fn test_invitation_role_wire_values_are_uppercase() {
    assert!(serde_json::from_str::<CreateInvitationRequest>(
        r#"{"email":"x@y.co","role":"admin"}"#
    )
    .is_err());
    assert!(serde_json::from_str::<CreateInvitationRequest>(
        r#"{"email":"x@y.co","role":"ADMIN"}"#
    )
    .is_ok());
}

#[test]
fn test_accept_requires_token() {
    let request = AcceptInvitationRequest {
        token: String::new(),
    };
    assert!(request.validate().is_some());

    let request = AcceptInvitationRequest {
        token: "sSUoGMj1PyreLkDVUdNYYDpf9mkpK9bPBAZ_5Y7mcTA".to_string(),
    };
    assert!(request.validate().is_none());
}
