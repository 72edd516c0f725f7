//! The authenticated principal seen by request handlers.

use uuid::Uuid;

/// The resolved local identity of an authenticated request.
///
/// Inserted as a request extension by the user-sync middleware after the
/// bearer token has been verified and the Keycloak subject mapped onto a
/// local user record. Handlers take this; they never touch tokens or
/// Keycloak claims directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Local user ID.
    pub user_id: Uuid,

    /// Email address of the authenticated user.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_is_cloneable_for_extensions() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
        };
        let cloned = user.clone();
        assert_eq!(user, cloned);
    }
}
