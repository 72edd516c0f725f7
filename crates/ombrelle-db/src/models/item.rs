//! Item model — the tenant-scoped sample resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use ombrelle_core::{TenantId, TenantScoped};

use crate::DbError;

/// A tenant-scoped item.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Item {
    /// Unique item identifier.
    pub id: Uuid,

    /// Owning tenant.
    pub tenant_id: Uuid,

    /// Item name.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// User who created the item.
    pub created_by: Option<Uuid>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create an item.
#[derive(Debug)]
pub struct NewItem<'a> {
    pub tenant_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub created_by: Uuid,
}

impl TenantScoped for Item {
    fn tenant_id(&self) -> TenantId {
        TenantId::from_uuid(self.tenant_id)
    }
}

impl Item {
    /// Insert a new item.
    pub async fn create(pool: &PgPool, data: &NewItem<'_>) -> Result<Self, DbError> {
        sqlx::query_as(
            r"
            INSERT INTO items (tenant_id, name, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(data.tenant_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.created_by)
        .fetch_one(pool)
        .await
        .map_err(DbError::from)
    }

    /// Find an item by ID within a tenant. Rows from other tenants are
    /// invisible.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM items WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// List a tenant's items, newest first.
    pub async fn list_for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Self>, DbError> {
        sqlx::query_as(
            r"
            SELECT * FROM items
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
        .map_err(DbError::from)
    }

    /// Update name and/or description; unset fields keep their value.
    pub async fn update(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as(
            r"
            UPDATE items
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(name)
        .bind(description)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
    }

    /// Delete an item within a tenant.
    pub async fn delete(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
