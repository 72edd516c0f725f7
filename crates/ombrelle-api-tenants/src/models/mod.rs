//! Request and response models for the tenant API.

mod invitations;
mod tenants;

pub use invitations::{
    AcceptInvitationRequest, AcceptInvitationResponse, CreateInvitationRequest,
    InvitationDetailResponse, InvitationResponse,
};
pub use tenants::{
    AddMemberRequest, CreateTenantRequest, MemberResponse, TenantResponse, TenantSummaryResponse,
    UpdateMemberRoleRequest, UpdateTenantRequest,
};

/// Confirmation body for operations without a resource to return.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validate an email address the way the rest of the platform does:
/// non-empty, plausible shape, bounded length.
pub(crate) fn validate_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !email.contains('@') || !email.contains('.') {
        return Some("Invalid email format".to_string());
    }
    if email.len() > 254 {
        return Some("Email address too long (max 254 characters)".to_string());
    }
    None
}

/// Validate a tenant slug: 2–50 chars, lowercase alphanumeric segments
/// joined by single hyphens, no leading/trailing hyphen.
pub(crate) fn validate_slug(slug: &str) -> Option<String> {
    if slug.len() < 2 || slug.len() > 50 {
        return Some("Slug must be between 2 and 50 characters".to_string());
    }

    let well_formed = !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .split('-')
            .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));

    if !well_formed {
        return Some(
            "Slug must be lowercase alphanumeric with hyphens only (no leading/trailing hyphens)"
                .to_string(),
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        for slug in ["acme-corp", "ab", "a1", "tenant-42", "x0-y1-z2"] {
            assert!(validate_slug(slug).is_none(), "{slug} should be valid");
        }
    }

    #[test]
    fn test_invalid_slugs() {
        for slug in [
            "a",
            "-acme",
            "acme-",
            "acme--corp",
            "Acme",
            "acme corp",
            "acme_corp",
            "",
        ] {
            assert!(validate_slug(slug).is_some(), "{slug} should be invalid");
        }
    }

    #[test]
    fn test_slug_length_bounds() {
        let max = "a".repeat(50);
        assert!(validate_slug(&max).is_none());
        let too_long = "a".repeat(51);
        assert!(validate_slug(&too_long).is_some());
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user@example.com").is_none());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("").is_some());
        assert!(validate_email("no-at-sign.example").is_some());
        assert!(validate_email("user@nodot").is_some());
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&long).is_some());
    }
}
