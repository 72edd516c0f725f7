//! Keycloak → local user synchronization.
//!
//! Keycloak is the source of truth for identity; the local `users` table
//! carries the platform-side record memberships and invitations hang
//! off. On every authenticated request the verified claims are resolved
//! to a local user here.

use sqlx::PgPool;

use ombrelle_auth::KeycloakClaims;
use ombrelle_db::models::User;

use crate::error::UserError;

/// Resolves verified Keycloak claims into local user records.
#[derive(Clone)]
pub struct KeycloakSyncService {
    pool: PgPool,
}

impl KeycloakSyncService {
    /// Create a new sync service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sync or create the local user for a set of verified claims.
    ///
    /// Resolution order:
    /// 1. by `keycloak_id` — the common case; email is re-synced when it
    ///    changed on the IdP side, names only fill empty local fields
    ///    (the local profile wins once set);
    /// 2. by email — a record created by invitation acceptance before
    ///    the first login; it gets linked to the Keycloak subject;
    /// 3. otherwise a new record is created from the claims.
    pub async fn sync_user(&self, claims: &KeycloakClaims) -> Result<User, UserError> {
        let email = claims
            .email()
            .ok_or_else(|| UserError::Unauthorized("Token carries no email claim".to_string()))?
            .to_lowercase();

        if let Some(user) = User::find_by_keycloak_id(&self.pool, &claims.sub).await? {
            let needs_update = user.email != email
                || (user.first_name.is_none() && claims.given_name.is_some())
                || (user.last_name.is_none() && claims.family_name.is_some());

            if !needs_update {
                return Ok(user);
            }

            tracing::info!(user_id = %user.id, email = %email, "Updating user from Keycloak");

            let first = user
                .first_name
                .as_deref()
                .or(claims.given_name.as_deref());
            let last = user.last_name.as_deref().or(claims.family_name.as_deref());

            return User::update_profile(&self.pool, user.id, Some(&email), first, last)
                .await?
                .ok_or(UserError::NotFound(user.id));
        }

        if let Some(user) = User::find_by_email(&self.pool, &email).await? {
            tracing::info!(user_id = %user.id, email = %email, "Linking existing user to Keycloak");

            return User::link_keycloak(&self.pool, user.id, &claims.sub)
                .await?
                .ok_or(UserError::NotFound(user.id));
        }

        tracing::info!(email = %email, "Creating new user from Keycloak");

        Ok(User::create(
            &self.pool,
            &email,
            claims.given_name.as_deref(),
            claims.family_name.as_deref(),
            Some(&claims.sub),
        )
        .await?)
    }
}
