//! Invitation lifecycle handlers.
//!
//! The admin endpoints live under `/tenants/{tenant_id}/invitations`;
//! token lookup and acceptance are public — invitees do not have
//! accounts yet.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use ombrelle_auth::AuthUser;

use crate::error::{ErrorResponse, TenantError};
use crate::models::{
    AcceptInvitationRequest, AcceptInvitationResponse, CreateInvitationRequest,
    InvitationDetailResponse, InvitationResponse, MessageResponse,
};
use crate::router::TenantsState;

/// POST /tenants/{tenant_id}/invitations
///
/// Invite an email address into the tenant. Requires OWNER or ADMIN.
/// The invitation email is sent before this returns; a delivery failure
/// rolls the invitation back.
#[utoipa::path(
    post,
    path = "/tenants/{tenant_id}/invitations",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    request_body = CreateInvitationRequest,
    responses(
        (status = 201, description = "Invitation created and sent", body = InvitationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 409, description = "Already a member or pending invitation exists", body = ErrorResponse),
        (status = 502, description = "Invitation email could not be delivered", body = ErrorResponse),
    ),
    tag = "Tenant Invitations",
    security(("bearerAuth" = []))
)]
pub async fn create_invitation_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), TenantError> {
    if let Some(error) = request.validate() {
        return Err(TenantError::Validation(error));
    }

    let invitation = state
        .invitation_service
        .create_invitation(tenant_id, &request.email, request.role, caller.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(invitation.into())))
}

/// GET /tenants/{tenant_id}/invitations
///
/// List pending invitations, newest first. Requires OWNER or ADMIN.
#[utoipa::path(
    get,
    path = "/tenants/{tenant_id}/invitations",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Pending invitations", body = [InvitationResponse]),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
    ),
    tag = "Tenant Invitations",
    security(("bearerAuth" = []))
)]
pub async fn list_invitations_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<Vec<InvitationResponse>>, TenantError> {
    let invitations = state
        .invitation_service
        .list_invitations(tenant_id, caller.user_id)
        .await?;

    Ok(Json(invitations.into_iter().map(Into::into).collect()))
}

/// DELETE /tenants/{tenant_id}/invitations/{invitation_id}
///
/// Cancel a pending invitation. Accepted invitations cannot be
/// cancelled. Requires OWNER or ADMIN.
#[utoipa::path(
    delete,
    path = "/tenants/{tenant_id}/invitations/{invitation_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("invitation_id" = Uuid, Path, description = "Invitation ID"),
    ),
    responses(
        (status = 200, description = "Invitation cancelled", body = MessageResponse),
        (status = 400, description = "Already accepted", body = ErrorResponse),
        (status = 403, description = "Wrong tenant or insufficient role", body = ErrorResponse),
        (status = 404, description = "Invitation not found", body = ErrorResponse),
    ),
    tag = "Tenant Invitations",
    security(("bearerAuth" = []))
)]
pub async fn cancel_invitation_handler(
    State(state): State<TenantsState>,
    Extension(caller): Extension<AuthUser>,
    Path((tenant_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, TenantError> {
    state
        .invitation_service
        .cancel_invitation(tenant_id, invitation_id, caller.user_id)
        .await?;

    Ok(Json(MessageResponse::new(
        "Invitation cancelled successfully",
    )))
}

/// GET /invitations/{token}
///
/// Public pre-acceptance lookup: shows the invitee what they were
/// invited to before they accept.
#[utoipa::path(
    get,
    path = "/invitations/{token}",
    params(("token" = String, Path, description = "Invitation token from the email link")),
    responses(
        (status = 200, description = "Invitation details", body = InvitationDetailResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
        (status = 410, description = "Expired or already accepted", body = ErrorResponse),
    ),
    tag = "Tenant Invitations"
)]
pub async fn get_invitation_by_token_handler(
    State(state): State<TenantsState>,
    Path(token): Path<String>,
) -> Result<Json<InvitationDetailResponse>, TenantError> {
    let details = state.invitation_service.get_invitation_by_token(&token).await?;

    Ok(Json(InvitationDetailResponse {
        email: details.invitation.email,
        tenant_name: details.tenant_name,
        inviter_name: details.inviter_name,
        role: details.invitation.role,
        expires_at: details.invitation.expires_at,
    }))
}

/// POST /invitations/accept
///
/// Public acceptance endpoint. Grants the membership and marks the
/// invitation accepted atomically; the client then sends the user
/// through Keycloak login.
#[utoipa::path(
    post,
    path = "/invitations/accept",
    request_body = AcceptInvitationRequest,
    responses(
        (status = 200, description = "Invitation accepted", body = AcceptInvitationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
        (status = 410, description = "Expired or already accepted", body = ErrorResponse),
    ),
    tag = "Tenant Invitations"
)]
pub async fn accept_invitation_handler(
    State(state): State<TenantsState>,
    Json(request): Json<AcceptInvitationRequest>,
) -> Result<Json<AcceptInvitationResponse>, TenantError> {
    if let Some(error) = request.validate() {
        return Err(TenantError::Validation(error));
    }

    let accepted = state
        .invitation_service
        .accept_invitation(&request.token)
        .await?;

    Ok(Json(AcceptInvitationResponse {
        message: "Invitation accepted successfully. Log in to access the tenant.".to_string(),
        user_id: accepted.user.id,
        tenant_id: accepted.tenant.id,
        role: accepted.role,
        redirect_to_login: true,
    }))
}
