//! Router configuration for the tenant API.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;

use ombrelle_mail::EmailSender;

use crate::handlers::{
    accept_invitation_handler, add_member_handler, cancel_invitation_handler,
    create_invitation_handler, create_tenant_handler, delete_tenant_handler, get_invitation_by_token_handler,
    get_tenant_handler, list_invitations_handler, list_members_handler, list_tenants_handler,
    remove_member_handler, update_member_role_handler, update_tenant_handler,
};
use crate::services::{InvitationService, TenantService};

/// Application state for the tenant API.
#[derive(Clone)]
pub struct TenantsState {
    /// Database connection pool.
    pub pool: PgPool,
    /// Tenant directory operations.
    pub tenant_service: TenantService,
    /// Invitation lifecycle operations.
    pub invitation_service: InvitationService,
}

impl TenantsState {
    /// Build the state with its services.
    pub fn new(
        pool: PgPool,
        email_sender: Arc<dyn EmailSender>,
        invitation_base_url: String,
    ) -> Self {
        Self {
            tenant_service: TenantService::new(pool.clone()),
            invitation_service: InvitationService::new(
                pool.clone(),
                email_sender,
                invitation_base_url,
            ),
            pool,
        }
    }
}

/// Authenticated tenant routes, nested under `/tenants`.
///
/// Every handler resolves the caller's membership in the path tenant
/// before touching anything; the JWT and user-sync middleware are
/// layered on by the binary.
pub fn tenants_router(state: TenantsState) -> Router {
    Router::new()
        .route("/", post(create_tenant_handler).get(list_tenants_handler))
        .route(
            "/:tenant_id",
            get(get_tenant_handler)
                .patch(update_tenant_handler)
                .delete(delete_tenant_handler),
        )
        .route(
            "/:tenant_id/members",
            get(list_members_handler).post(add_member_handler),
        )
        .route(
            "/:tenant_id/members/:user_id",
            patch(update_member_role_handler).delete(remove_member_handler),
        )
        .route(
            "/:tenant_id/invitations",
            get(list_invitations_handler).post(create_invitation_handler),
        )
        .route(
            "/:tenant_id/invitations/:invitation_id",
            delete(cancel_invitation_handler),
        )
        .with_state(state)
}

/// Public invitation routes, nested under `/invitations`.
///
/// Token lookup and acceptance must work for people who do not have an
/// account yet, so no auth middleware is applied here.
pub fn public_invitations_router(state: TenantsState) -> Router {
    Router::new()
        .route("/accept", post(accept_invitation_handler))
        .route("/:token", get(get_invitation_by_token_handler))
        .with_state(state)
}
