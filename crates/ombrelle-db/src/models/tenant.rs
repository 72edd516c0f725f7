//! Tenant model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use super::TenantRole;
use crate::DbError;

/// A tenant: an isolated customer workspace.
///
/// All domain resources (memberships, invitations, items) are scoped to
/// exactly one tenant and are cascade-deleted with it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: Uuid,

    /// Human-readable display name (e.g. "Acme Corporation").
    pub name: String,

    /// URL-safe slug, unique across all tenants (e.g. "acme-corp").
    pub slug: String,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A tenant annotated with the caller's own role and the member count.
///
/// Produced by [`Tenant::list_for_user`]; the extra columns come from the
/// membership join and a per-tenant count subquery.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TenantWithAccess {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tenant: Tenant,

    /// The querying user's role in this tenant.
    pub my_role: TenantRole,

    /// Total number of memberships in this tenant.
    pub member_count: i64,
}

impl Tenant {
    /// Find a tenant by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// Find a tenant by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM tenants WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// Check whether a slug is already taken.
    ///
    /// This is the precise-error pre-check; the `tenants_slug_key` unique
    /// constraint remains the authoritative guard against races.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, DbError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tenants WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Insert a tenant inside an open transaction.
    ///
    /// Used by tenant creation, which must write the tenant row and the
    /// initial OWNER membership atomically.
    pub async fn create_in(
        conn: &mut PgConnection,
        name: &str,
        slug: &str,
    ) -> Result<Self, DbError> {
        sqlx::query_as(
            r"
            INSERT INTO tenants (name, slug)
            VALUES ($1, $2)
            RETURNING *
            ",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(conn)
        .await
        .map_err(DbError::from)
    }

    /// Update name and/or slug; unset fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        slug: Option<&str>,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as(
            r"
            UPDATE tenants
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
    }

    /// Delete a tenant. Memberships and invitations cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// List the tenants a user belongs to, newest first.
    ///
    /// Each row carries the user's own role and the tenant's member count.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TenantWithAccess>, DbError> {
        sqlx::query_as(
            r"
            SELECT t.*,
                   tu.role AS my_role,
                   (SELECT COUNT(*) FROM tenant_users tc WHERE tc.tenant_id = t.id) AS member_count
            FROM tenants t
            JOIN tenant_users tu ON tu.tenant_id = t.id
            WHERE tu.user_id = $1
            ORDER BY t.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(DbError::from)
    }
}
