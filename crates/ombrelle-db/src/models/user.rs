//! User model.
//!
//! Users are global (one row per email); tenant access is granted through
//! memberships. Authentication is delegated to Keycloak — a user row may
//! exist before its owner ever logged in (invitation acceptance creates a
//! minimal record that the first Keycloak login completes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use ombrelle_core::UserId;

use crate::DbError;

/// A local user record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,

    /// Email address, unique across the platform.
    pub email: String,

    /// Keycloak subject this record is linked to, once the user has
    /// logged in through the identity provider.
    pub keycloak_id: Option<String>,

    /// First name, when known.
    pub first_name: Option<String>,

    /// Last name, when known.
    pub last_name: Option<String>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The strongly typed user ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.id)
    }

    /// Human-readable display name.
    ///
    /// "First Last" when both are set, otherwise whichever is present,
    /// otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}").trim().to_string(),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self.email.clone(),
        }
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// Find a user by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// Find a user by the linked Keycloak subject.
    pub async fn find_by_keycloak_id(
        pool: &PgPool,
        keycloak_id: &str,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM users WHERE keycloak_id = $1")
            .bind(keycloak_id)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// Create a user record.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        keycloak_id: Option<&str>,
    ) -> Result<Self, DbError> {
        sqlx::query_as(
            r"
            INSERT INTO users (email, first_name, last_name, keycloak_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(keycloak_id)
        .fetch_one(pool)
        .await
        .map_err(DbError::from)
    }

    /// Find a user by email inside an open transaction, creating a minimal
    /// record (no names, no identity-provider link) when none exists.
    ///
    /// Used by invitation acceptance so the lazily-created user commits or
    /// rolls back together with the membership write.
    pub async fn find_or_create_by_email_in(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Self, DbError> {
        if let Some(user) =
            sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&mut *conn)
                .await?
        {
            return Ok(user);
        }

        sqlx::query_as(
            r"
            INSERT INTO users (email)
            VALUES ($1)
            RETURNING *
            ",
        )
        .bind(email)
        .fetch_one(conn)
        .await
        .map_err(DbError::from)
    }

    /// Update profile fields; unset fields keep their current value.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        email: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as(
            r"
            UPDATE users
            SET email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
    }

    /// Link an existing user to a Keycloak subject.
    pub async fn link_keycloak(
        pool: &PgPool,
        id: Uuid,
        keycloak_id: &str,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as(
            r"
            UPDATE users
            SET keycloak_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(keycloak_id)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
    }

    /// Delete a user. Their memberships cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            keycloak_id: None,
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_full() {
        assert_eq!(user(Some("Jane"), Some("Doe")).display_name(), "Jane Doe");
    }

    #[test]
    fn test_display_name_first_only() {
        assert_eq!(user(Some("Jane"), None).display_name(), "Jane");
    }

    #[test]
    fn test_display_name_last_only() {
        assert_eq!(user(None, Some("Doe")).display_name(), "Doe");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(user(None, None).display_name(), "jane@example.com");
    }
}
