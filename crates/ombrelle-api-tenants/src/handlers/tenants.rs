//! Tenant CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use ombrelle_auth::AuthUser;
use ombrelle_db::models::TenantRole;

use crate::error::{ErrorResponse, TenantError};
use crate::models::{
    CreateTenantRequest, MessageResponse, TenantResponse, TenantSummaryResponse,
    UpdateTenantRequest,
};
use crate::router::TenantsState;

/// POST /tenants
///
/// Create a tenant; the caller becomes its OWNER.
#[utoipa::path(
    post,
    path = "/tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = TenantResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Slug already exists", body = ErrorResponse),
    ),
    tag = "Tenants",
    security(("bearerAuth" = []))
)]
pub async fn create_tenant_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), TenantError> {
    if let Some(error) = request.validate() {
        return Err(TenantError::Validation(error));
    }

    let tenant = state
        .tenant_service
        .create_tenant(request.name.trim(), &request.slug, caller.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TenantResponse::from_tenant(tenant, Some(TenantRole::Owner))),
    ))
}

/// GET /tenants
///
/// List the caller's tenants with their role and each tenant's member
/// count, newest first.
#[utoipa::path(
    get,
    path = "/tenants",
    responses(
        (status = 200, description = "The caller's tenants", body = [TenantSummaryResponse]),
    ),
    tag = "Tenants",
    security(("bearerAuth" = []))
)]
pub async fn list_tenants_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<TenantSummaryResponse>>, TenantError> {
    let tenants = state.tenant_service.list_tenants(caller.user_id).await?;

    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// GET /tenants/{tenant_id}
#[utoipa::path(
    get,
    path = "/tenants/{tenant_id}",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "The tenant", body = TenantResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse),
    ),
    tag = "Tenants",
    security(("bearerAuth" = []))
)]
pub async fn get_tenant_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<TenantResponse>, TenantError> {
    let (tenant, my_role) = state
        .tenant_service
        .get_tenant(tenant_id, caller.user_id)
        .await?;

    Ok(Json(TenantResponse::from_tenant(tenant, Some(my_role))))
}

/// PATCH /tenants/{tenant_id}
///
/// Update name and/or slug. Requires OWNER or ADMIN.
#[utoipa::path(
    patch,
    path = "/tenants/{tenant_id}",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Updated tenant", body = TenantResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 409, description = "Slug already exists", body = ErrorResponse),
    ),
    tag = "Tenants",
    security(("bearerAuth" = []))
)]
pub async fn update_tenant_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
    Json(request): Json<UpdateTenantRequest>,
) -> Result<Json<TenantResponse>, TenantError> {
    if let Some(error) = request.validate() {
        return Err(TenantError::Validation(error));
    }

    let tenant = state
        .tenant_service
        .update_tenant(
            tenant_id,
            request.name.as_deref().map(str::trim),
            request.slug.as_deref(),
            caller.user_id,
        )
        .await?;

    Ok(Json(TenantResponse::from_tenant(tenant, None)))
}

/// DELETE /tenants/{tenant_id}
///
/// Delete a tenant and everything scoped to it. Requires OWNER.
#[utoipa::path(
    delete,
    path = "/tenants/{tenant_id}",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant deleted", body = MessageResponse),
        (status = 403, description = "Only OWNER can delete", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse),
    ),
    tag = "Tenants",
    security(("bearerAuth" = []))
)]
pub async fn delete_tenant_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, TenantError> {
    state
        .tenant_service
        .delete_tenant(tenant_id, caller.user_id)
        .await?;

    Ok(Json(MessageResponse::new("Tenant deleted successfully")))
}
