//! Membership management handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use ombrelle_auth::AuthUser;
use ombrelle_db::models::User;

use crate::error::{ErrorResponse, TenantError};
use crate::models::{AddMemberRequest, MemberResponse, MessageResponse, UpdateMemberRoleRequest};
use crate::router::TenantsState;

/// GET /tenants/{tenant_id}/members
///
/// List the tenant's members, oldest first. Requires membership.
#[utoipa::path(
    get,
    path = "/tenants/{tenant_id}/members",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant members", body = [MemberResponse]),
        (status = 403, description = "Not a member", body = ErrorResponse),
    ),
    tag = "Tenant Members",
    security(("bearerAuth" = []))
)]
pub async fn list_members_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<Vec<MemberResponse>>, TenantError> {
    let members = state
        .tenant_service
        .list_members(tenant_id, caller.user_id)
        .await?;

    Ok(Json(members.into_iter().map(Into::into).collect()))
}

/// POST /tenants/{tenant_id}/members
///
/// Add an existing user directly, without an invitation. Requires OWNER
/// or ADMIN.
#[utoipa::path(
    post,
    path = "/tenants/{tenant_id}/members",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = MemberResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
    ),
    tag = "Tenant Members",
    security(("bearerAuth" = []))
)]
pub async fn add_member_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), TenantError> {
    let membership = state
        .tenant_service
        .add_member(tenant_id, request.user_id, request.role, caller.user_id)
        .await?;

    let email = User::find_by_id(&state.pool, request.user_id)
        .await?
        .map(|u| u.email)
        .unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        Json(MemberResponse::from_membership(membership, email)),
    ))
}

/// PATCH /tenants/{tenant_id}/members/{user_id}
///
/// Change a member's role. Requires OWNER or ADMIN; OWNER rows are
/// immutable and OWNER cannot be granted here.
#[utoipa::path(
    patch,
    path = "/tenants/{tenant_id}/members/{user_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("user_id" = Uuid, Path, description = "Member user ID"),
    ),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MemberResponse),
        (status = 403, description = "Owner-protection or insufficient role", body = ErrorResponse),
        (status = 404, description = "Not a member", body = ErrorResponse),
    ),
    tag = "Tenant Members",
    security(("bearerAuth" = []))
)]
pub async fn update_member_role_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path((tenant_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> Result<Json<MemberResponse>, TenantError> {
    let membership = state
        .tenant_service
        .update_member_role(tenant_id, user_id, request.role, caller.user_id)
        .await?;

    let email = User::find_by_id(&state.pool, user_id)
        .await?
        .map(|u| u.email)
        .unwrap_or_default();

    Ok(Json(MemberResponse::from_membership(membership, email)))
}

/// DELETE /tenants/{tenant_id}/members/{user_id}
///
/// Remove a member. Requires OWNER or ADMIN; the OWNER row cannot be
/// removed.
#[utoipa::path(
    delete,
    path = "/tenants/{tenant_id}/members/{user_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("user_id" = Uuid, Path, description = "Member user ID"),
    ),
    responses(
        (status = 200, description = "Member removed", body = MessageResponse),
        (status = 403, description = "Owner-protection or insufficient role", body = ErrorResponse),
        (status = 404, description = "Not a member", body = ErrorResponse),
    ),
    tag = "Tenant Members",
    security(("bearerAuth" = []))
)]
pub async fn remove_member_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path((tenant_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, TenantError> {
    state
        .tenant_service
        .remove_member(tenant_id, user_id, caller.user_id)
        .await?;

    Ok(Json(MessageResponse::new(
        "User removed from tenant successfully",
    )))
}
