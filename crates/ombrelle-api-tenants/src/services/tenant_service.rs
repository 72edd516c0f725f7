//! Tenant directory service: tenant CRUD and membership management.

use sqlx::PgPool;
use uuid::Uuid;

use ombrelle_db::models::{Membership, MembershipWithUser, Tenant, TenantRole, TenantWithAccess};

use crate::error::TenantError;
use crate::services::authorize::{require_admin, require_membership, require_owner};

/// Tenant directory: the single source of truth for who belongs to which
/// tenant with what role.
#[derive(Clone)]
pub struct TenantService {
    pool: PgPool,
}

impl TenantService {
    /// Create a new tenant service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tenant with the creator as its OWNER.
    ///
    /// The tenant row and the OWNER membership are written in one
    /// transaction. The slug pre-check yields a precise error; the
    /// unique constraint closes the create/create race — a violation at
    /// commit time maps to the same conflict.
    pub async fn create_tenant(
        &self,
        name: &str,
        slug: &str,
        creator_user_id: Uuid,
    ) -> Result<Tenant, TenantError> {
        if Tenant::slug_exists(&self.pool, slug).await? {
            return Err(TenantError::SlugExists(slug.to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let tenant = match Tenant::create_in(&mut *tx, name, slug).await {
            Ok(tenant) => tenant,
            Err(err) if err.is_unique_violation() => {
                return Err(TenantError::SlugExists(slug.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        Membership::insert_in(&mut *tx, creator_user_id, tenant.id, TenantRole::Owner).await?;

        tx.commit().await.map_err(db_err)?;

        tracing::info!(
            tenant_id = %tenant.id,
            slug = %tenant.slug,
            owner = %creator_user_id,
            "Tenant created"
        );

        Ok(tenant)
    }

    /// Fetch a tenant the caller belongs to, with the caller's role.
    pub async fn get_tenant(
        &self,
        tenant_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(Tenant, TenantRole), TenantError> {
        let tenant = Tenant::find_by_id(&self.pool, tenant_id)
            .await?
            .ok_or(TenantError::TenantNotFound(tenant_id))?;

        let membership =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;

        Ok((tenant, membership.role))
    }

    /// List the caller's tenants, newest first, each with the caller's
    /// role and the member count.
    pub async fn list_tenants(&self, caller_id: Uuid) -> Result<Vec<TenantWithAccess>, TenantError> {
        Ok(Tenant::list_for_user(&self.pool, caller_id).await?)
    }

    /// Update a tenant's name and/or slug. Requires OWNER or ADMIN.
    pub async fn update_tenant(
        &self,
        tenant_id: Uuid,
        name: Option<&str>,
        slug: Option<&str>,
        caller_id: Uuid,
    ) -> Result<Tenant, TenantError> {
        let tenant = Tenant::find_by_id(&self.pool, tenant_id)
            .await?
            .ok_or(TenantError::TenantNotFound(tenant_id))?;

        let membership =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;
        require_admin(&membership)?;

        if let Some(new_slug) = slug {
            if new_slug != tenant.slug && Tenant::slug_exists(&self.pool, new_slug).await? {
                return Err(TenantError::SlugExists(new_slug.to_string()));
            }
        }

        match Tenant::update(&self.pool, tenant_id, name, slug).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(TenantError::TenantNotFound(tenant_id)),
            Err(err) if err.is_unique_violation() => Err(TenantError::SlugExists(
                slug.unwrap_or_default().to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a tenant and everything scoped to it. Requires OWNER.
    pub async fn delete_tenant(
        &self,
        tenant_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(), TenantError> {
        let tenant = Tenant::find_by_id(&self.pool, tenant_id)
            .await?
            .ok_or(TenantError::TenantNotFound(tenant_id))?;

        let membership =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;
        require_owner(&membership)?;

        Tenant::delete(&self.pool, tenant_id).await?;

        tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, deleted_by = %caller_id, "Tenant deleted");
        Ok(())
    }

    /// List a tenant's members, oldest first. Requires membership.
    pub async fn list_members(
        &self,
        tenant_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Vec<MembershipWithUser>, TenantError> {
        require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;

        Ok(Membership::list_for_tenant(&self.pool, tenant_id).await?)
    }

    /// Add an existing user to a tenant directly. Requires OWNER or
    /// ADMIN.
    ///
    /// Unlike role updates, this path does not restrict which role is
    /// granted; see DESIGN.md.
    pub async fn add_member(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role: TenantRole,
        caller_id: Uuid,
    ) -> Result<Membership, TenantError> {
        let caller =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;
        require_admin(&caller)?;

        let user = ombrelle_db::models::User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(TenantError::UserNotFound(user_id))?;

        if Membership::find(&self.pool, user_id, tenant_id).await?.is_some() {
            return Err(TenantError::AlreadyMember);
        }

        let membership = match Membership::insert(&self.pool, user_id, tenant_id, role).await {
            Ok(membership) => membership,
            // Concurrent double-add loses to the unique constraint.
            Err(err) if err.is_unique_violation() => return Err(TenantError::AlreadyMember),
            Err(err) => return Err(err.into()),
        };

        tracing::info!(
            tenant_id = %tenant_id,
            user_id = %user.id,
            role = %role,
            added_by = %caller_id,
            "Member added to tenant"
        );

        Ok(membership)
    }

    /// Change a member's role. Requires OWNER or ADMIN.
    ///
    /// OWNER rows are immutable and OWNER can never be granted here.
    pub async fn update_member_role(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        new_role: TenantRole,
        caller_id: Uuid,
    ) -> Result<Membership, TenantError> {
        let caller =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;
        require_admin(&caller)?;

        let target = Membership::find(&self.pool, user_id, tenant_id)
            .await?
            .ok_or(TenantError::NotAMember)?;

        if target.is_owner() {
            return Err(TenantError::CannotModifyOwner);
        }
        if new_role == TenantRole::Owner {
            return Err(TenantError::CannotGrantOwner);
        }

        let updated = Membership::update_role(&self.pool, user_id, tenant_id, new_role)
            .await?
            .ok_or(TenantError::NotAMember)?;

        tracing::info!(
            tenant_id = %tenant_id,
            user_id = %user_id,
            role = %new_role,
            changed_by = %caller_id,
            "Member role updated"
        );

        Ok(updated)
    }

    /// Remove a member from a tenant. Requires OWNER or ADMIN; OWNER
    /// rows cannot be removed.
    pub async fn remove_member(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(), TenantError> {
        let caller =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;
        require_admin(&caller)?;

        let target = Membership::find(&self.pool, user_id, tenant_id)
            .await?
            .ok_or(TenantError::NotAMember)?;

        if target.is_owner() {
            return Err(TenantError::CannotModifyOwner);
        }

        Membership::delete(&self.pool, user_id, tenant_id).await?;

        tracing::info!(
            tenant_id = %tenant_id,
            user_id = %user_id,
            removed_by = %caller_id,
            "Member removed from tenant"
        );

        Ok(())
    }
}

fn db_err(err: sqlx::Error) -> TenantError {
    TenantError::Database(err.to_string())
}
