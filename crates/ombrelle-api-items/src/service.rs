//! Item service: tenant-scoped CRUD with membership checks.

use sqlx::PgPool;
use uuid::Uuid;

use ombrelle_db::models::{Item, Membership, NewItem};

use crate::error::ItemError;

/// Tenant-scoped item operations.
///
/// Every method resolves the caller's membership first; items never
/// leak across tenant boundaries because every query is keyed by the
/// path tenant.
#[derive(Clone)]
pub struct ItemService {
    pool: PgPool,
}

impl ItemService {
    /// Create a new item service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn require_membership(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<(), ItemError> {
        Membership::find(&self.pool, user_id, tenant_id)
            .await?
            .map(|_| ())
            .ok_or(ItemError::AccessDenied)
    }

    /// Create an item in a tenant.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        name: &str,
        description: Option<&str>,
        caller_id: Uuid,
    ) -> Result<Item, ItemError> {
        self.require_membership(caller_id, tenant_id).await?;

        let item = Item::create(
            &self.pool,
            &NewItem {
                tenant_id,
                name,
                description,
                created_by: caller_id,
            },
        )
        .await?;

        tracing::info!(tenant_id = %tenant_id, item_id = %item.id, created_by = %caller_id, "Item created");
        Ok(item)
    }

    /// List a tenant's items, newest first.
    pub async fn list(&self, tenant_id: Uuid, caller_id: Uuid) -> Result<Vec<Item>, ItemError> {
        self.require_membership(caller_id, tenant_id).await?;
        Ok(Item::list_for_tenant(&self.pool, tenant_id).await?)
    }

    /// Fetch one item.
    pub async fn get(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Item, ItemError> {
        self.require_membership(caller_id, tenant_id).await?;

        Item::find_by_id(&self.pool, tenant_id, item_id)
            .await?
            .ok_or(ItemError::NotFound(item_id))
    }

    /// Update an item.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        caller_id: Uuid,
    ) -> Result<Item, ItemError> {
        self.require_membership(caller_id, tenant_id).await?;

        Item::update(&self.pool, tenant_id, item_id, name, description)
            .await?
            .ok_or(ItemError::NotFound(item_id))
    }

    /// Delete an item.
    pub async fn delete(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(), ItemError> {
        self.require_membership(caller_id, tenant_id).await?;

        let deleted = Item::delete(&self.pool, tenant_id, item_id).await?;
        if deleted == 0 {
            return Err(ItemError::NotFound(item_id));
        }

        tracing::info!(tenant_id = %tenant_id, item_id = %item_id, deleted_by = %caller_id, "Item deleted");
        Ok(())
    }
}
