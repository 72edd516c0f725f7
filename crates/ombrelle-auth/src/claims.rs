//! Claims carried by Keycloak access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The subset of Keycloak's access-token claims the platform consumes.
///
/// `sub` is the Keycloak user ID; the local user record is resolved from
/// it (or from `email` for pre-provisioned accounts) by the sync service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeycloakClaims {
    /// Subject: the Keycloak user ID.
    pub sub: String,

    /// Issuer (the realm URL).
    #[serde(default)]
    pub iss: String,

    /// Expiration time as Unix timestamp.
    pub exp: i64,

    /// Issued-at as Unix timestamp.
    #[serde(default)]
    pub iat: i64,

    /// Email address, when the `email` scope is granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Whether Keycloak has verified the email.
    #[serde(default)]
    pub email_verified: bool,

    /// First name from the Keycloak profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Last name from the Keycloak profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Preferred username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
}

impl KeycloakClaims {
    /// Check if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// The email claim, or an error-friendly `None` when absent.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset: i64) -> KeycloakClaims {
        KeycloakClaims {
            sub: "kc-user-1".to_string(),
            iss: "https://idp.example.com/realms/ombrelle".to_string(),
            exp: Utc::now().timestamp() + exp_offset,
            iat: Utc::now().timestamp(),
            email: Some("jane@example.com".to_string()),
            email_verified: true,
            given_name: Some("Jane".to_string()),
            family_name: Some("Doe".to_string()),
            preferred_username: Some("jane".to_string()),
        }
    }

    #[test]
    fn test_is_expired() {
        assert!(!claims(3600).is_expired());
        assert!(claims(-3600).is_expired());
    }

    #[test]
    fn test_deserializes_minimal_token() {
        // Only sub and exp are guaranteed; everything else is optional.
        let json = r#"{"sub":"abc","exp":1999999999}"#;
        let c: KeycloakClaims = serde_json::from_str(json).unwrap();
        assert_eq!(c.sub, "abc");
        assert_eq!(c.email, None);
        assert!(!c.email_verified);
    }

    #[test]
    fn test_serde_roundtrip() {
        let original = claims(3600);
        let json = serde_json::to_string(&original).unwrap();
        let decoded: KeycloakClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }
}
