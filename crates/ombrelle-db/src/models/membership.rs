//! Tenant membership model.
//!
//! A membership is the (user, tenant, role) association granting access.
//! At most one membership exists per (user, tenant) pair, enforced by the
//! `tenant_users_user_tenant_key` unique constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool, Type};
use uuid::Uuid;

use ombrelle_core::{TenantId, TenantScoped, UserId};

use crate::DbError;

/// Role a user holds inside a tenant.
///
/// Wire values are exactly `OWNER`, `ADMIN`, `MEMBER` — in the database
/// enum, in JSON, and in API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(type_name = "tenant_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TenantRole {
    /// The tenant creator. Exactly one is written at tenant creation;
    /// the role is never granted or revoked through any other path.
    Owner,
    /// Tenant administrator: may manage members and invitations.
    Admin,
    /// Baseline access.
    Member,
}

impl TenantRole {
    /// True for roles allowed to perform tenant-admin actions.
    #[must_use]
    pub fn is_admin_or_owner(&self) -> bool {
        matches!(self, TenantRole::Owner | TenantRole::Admin)
    }
}

impl std::fmt::Display for TenantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenantRole::Owner => write!(f, "OWNER"),
            TenantRole::Admin => write!(f, "ADMIN"),
            TenantRole::Member => write!(f, "MEMBER"),
        }
    }
}

/// A user's membership in a tenant.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Membership {
    /// Unique membership identifier.
    pub id: Uuid,

    /// Member user.
    pub user_id: Uuid,

    /// Owning tenant.
    pub tenant_id: Uuid,

    /// Granted role.
    pub role: TenantRole,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A membership joined with the member's user record, for member listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MembershipWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub membership: Membership,

    /// Member email.
    pub email: String,

    /// Member first name, when known.
    pub first_name: Option<String>,

    /// Member last name, when known.
    pub last_name: Option<String>,
}

impl TenantScoped for Membership {
    fn tenant_id(&self) -> TenantId {
        TenantId::from_uuid(self.tenant_id)
    }
}

impl Membership {
    /// The strongly typed member user ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }

    /// True when this membership carries the OWNER role.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.role == TenantRole::Owner
    }

    /// True when this membership may perform tenant-admin actions.
    #[must_use]
    pub fn is_admin_or_owner(&self) -> bool {
        self.role.is_admin_or_owner()
    }

    /// Look up the membership for a (user, tenant) pair.
    ///
    /// This is the authorization primitive: every tenant-scoped operation
    /// starts here.
    pub async fn find(
        pool: &PgPool,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM tenant_users WHERE user_id = $1 AND tenant_id = $2")
            .bind(user_id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// List a tenant's memberships with user details, oldest first.
    pub async fn list_for_tenant(
        pool: &PgPool,
        tenant_id: Uuid,
    ) -> Result<Vec<MembershipWithUser>, DbError> {
        sqlx::query_as(
            r"
            SELECT tu.*, u.email, u.first_name, u.last_name
            FROM tenant_users tu
            JOIN users u ON u.id = tu.user_id
            WHERE tu.tenant_id = $1
            ORDER BY tu.created_at ASC
            ",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
        .map_err(DbError::from)
    }

    /// Count memberships in a tenant.
    pub async fn count_for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<i64, DbError> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tenant_users WHERE tenant_id = $1")
                .bind(tenant_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Insert a membership.
    ///
    /// A duplicate (user, tenant) pair fails on the unique constraint;
    /// callers map that to their already-a-member conflict.
    pub async fn insert(
        pool: &PgPool,
        user_id: Uuid,
        tenant_id: Uuid,
        role: TenantRole,
    ) -> Result<Self, DbError> {
        sqlx::query_as(
            r"
            INSERT INTO tenant_users (user_id, tenant_id, role)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(role)
        .fetch_one(pool)
        .await
        .map_err(DbError::from)
    }

    /// Insert a membership inside an open transaction.
    pub async fn insert_in(
        conn: &mut PgConnection,
        user_id: Uuid,
        tenant_id: Uuid,
        role: TenantRole,
    ) -> Result<Self, DbError> {
        sqlx::query_as(
            r"
            INSERT INTO tenant_users (user_id, tenant_id, role)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(role)
        .fetch_one(conn)
        .await
        .map_err(DbError::from)
    }

    /// Insert-or-overwrite the membership role inside an open transaction.
    ///
    /// Invitation acceptance overwrites an existing membership's role
    /// rather than duplicating the row.
    pub async fn upsert_in(
        conn: &mut PgConnection,
        user_id: Uuid,
        tenant_id: Uuid,
        role: TenantRole,
    ) -> Result<Self, DbError> {
        sqlx::query_as(
            r"
            INSERT INTO tenant_users (user_id, tenant_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, tenant_id)
            DO UPDATE SET role = EXCLUDED.role, updated_at = NOW()
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(role)
        .fetch_one(conn)
        .await
        .map_err(DbError::from)
    }

    /// Change a member's role.
    pub async fn update_role(
        pool: &PgPool,
        user_id: Uuid,
        tenant_id: Uuid,
        role: TenantRole,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as(
            r"
            UPDATE tenant_users
            SET role = $3, updated_at = NOW()
            WHERE user_id = $1 AND tenant_id = $2
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(role)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
    }

    /// Remove a member from a tenant.
    pub async fn delete(
        pool: &PgPool,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<u64, DbError> {
        let result =
            sqlx::query("DELETE FROM tenant_users WHERE user_id = $1 AND tenant_id = $2")
                .bind(user_id)
                .bind(tenant_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_values() {
        assert_eq!(serde_json::to_string(&TenantRole::Owner).unwrap(), "\"OWNER\"");
        assert_eq!(serde_json::to_string(&TenantRole::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&TenantRole::Member).unwrap(), "\"MEMBER\"");
    }

    #[test]
    fn test_role_deserializes_from_wire_values() {
        let role: TenantRole = serde_json::from_str("\"OWNER\"").unwrap();
        assert_eq!(role, TenantRole::Owner);
        let role: TenantRole = serde_json::from_str("\"MEMBER\"").unwrap();
        assert_eq!(role, TenantRole::Member);
        assert!(serde_json::from_str::<TenantRole>("\"owner\"").is_err());
    }

    #[test]
    fn test_role_display_matches_wire() {
        assert_eq!(TenantRole::Owner.to_string(), "OWNER");
        assert_eq!(TenantRole::Admin.to_string(), "ADMIN");
        assert_eq!(TenantRole::Member.to_string(), "MEMBER");
    }

    #[test]
    fn test_admin_or_owner() {
        assert!(TenantRole::Owner.is_admin_or_owner());
        assert!(TenantRole::Admin.is_admin_or_owner());
        assert!(!TenantRole::Member.is_admin_or_owner());
    }
}
