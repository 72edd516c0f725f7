//! Shared error type.
//!
//! A small, serializable error enum for failures that cross crate
//! boundaries. API crates define their own richer error enums and map
//! these variants onto HTTP responses.

use crate::ids::TenantId;
use serde::Serialize;
use thiserror::Error;

/// Standardized cross-crate error type.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreError {
    /// Authentication or authorization failure.
    #[error("Unauthorized{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Requested resource was not found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource (e.g. "Tenant", "Invitation").
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// An operation touched data belonging to a different tenant.
    #[error("Tenant mismatch: expected {expected}, got {actual}")]
    TenantMismatch {
        expected: TenantId,
        actual: TenantId,
    },

    /// Input validation failure.
    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },
}

/// Type alias for Results using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_display() {
        let err = CoreError::Unauthorized { message: None };
        assert_eq!(err.to_string(), "Unauthorized");

        let err = CoreError::Unauthorized {
            message: Some("token expired".to_string()),
        };
        assert_eq!(err.to_string(), "Unauthorized: token expired");
    }

    #[test]
    fn test_not_found_display() {
        let err = CoreError::NotFound {
            resource: "Tenant".to_string(),
            id: Some("abc".to_string()),
        };
        assert_eq!(err.to_string(), "Tenant not found: abc");
    }

    #[test]
    fn test_tenant_mismatch_display() {
        let expected = TenantId::new();
        let actual = TenantId::new();
        let err = CoreError::TenantMismatch { expected, actual };
        let text = err.to_string();
        assert!(text.contains(&expected.to_string()));
        assert!(text.contains(&actual.to_string()));
    }

    #[test]
    fn test_validation_serializes_with_tag() {
        let err = CoreError::Validation {
            field: "slug".to_string(),
            message: "too short".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"validation\""));
    }
}
