//! OpenAPI document assembly.
//!
//! The document is served as raw JSON at `/api-docs/openapi.json`;
//! clients bring their own viewer.

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// The aggregated API description.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ombrelle API",
        description = "Multi-tenant workspace backend: tenants, memberships, invitations, items."
    ),
    paths(
        crate::health::health_handler,
        ombrelle_api_tenants::handlers::tenants::create_tenant_handler,
        ombrelle_api_tenants::handlers::tenants::list_tenants_handler,
        ombrelle_api_tenants::handlers::tenants::get_tenant_handler,
        ombrelle_api_tenants::handlers::tenants::update_tenant_handler,
        ombrelle_api_tenants::handlers::tenants::delete_tenant_handler,
        ombrelle_api_tenants::handlers::members::list_members_handler,
        ombrelle_api_tenants::handlers::members::add_member_handler,
        ombrelle_api_tenants::handlers::members::update_member_role_handler,
        ombrelle_api_tenants::handlers::members::remove_member_handler,
        ombrelle_api_tenants::handlers::invitations::create_invitation_handler,
        ombrelle_api_tenants::handlers::invitations::list_invitations_handler,
        ombrelle_api_tenants::handlers::invitations::cancel_invitation_handler,
        ombrelle_api_tenants::handlers::invitations::get_invitation_by_token_handler,
        ombrelle_api_tenants::handlers::invitations::accept_invitation_handler,
        ombrelle_api_users::router::me_handler,
        ombrelle_api_users::router::update_me_handler,
        ombrelle_api_users::router::my_tenants_handler,
        ombrelle_api_users::router::switch_tenant_handler,
        ombrelle_api_items::router::create_item_handler,
        ombrelle_api_items::router::list_items_handler,
        ombrelle_api_items::router::get_item_handler,
        ombrelle_api_items::router::update_item_handler,
        ombrelle_api_items::router::delete_item_handler,
    ),
    components(schemas(
        crate::health::HealthResponse,
        ombrelle_db::models::TenantRole,
        ombrelle_api_tenants::models::CreateTenantRequest,
        ombrelle_api_tenants::models::UpdateTenantRequest,
        ombrelle_api_tenants::models::TenantResponse,
        ombrelle_api_tenants::models::TenantSummaryResponse,
        ombrelle_api_tenants::models::AddMemberRequest,
        ombrelle_api_tenants::models::UpdateMemberRoleRequest,
        ombrelle_api_tenants::models::MemberResponse,
        ombrelle_api_tenants::models::CreateInvitationRequest,
        ombrelle_api_tenants::models::InvitationResponse,
        ombrelle_api_tenants::models::InvitationDetailResponse,
        ombrelle_api_tenants::models::AcceptInvitationRequest,
        ombrelle_api_tenants::models::AcceptInvitationResponse,
        ombrelle_api_tenants::models::MessageResponse,
        ombrelle_api_tenants::error::ErrorResponse,
        ombrelle_api_users::models::UserResponse,
        ombrelle_api_users::models::UpdateProfileRequest,
        ombrelle_api_users::models::MyTenantResponse,
        ombrelle_api_users::models::SwitchTenantRequest,
        ombrelle_api_users::models::SwitchTenantResponse,
        ombrelle_api_items::models::CreateItemRequest,
        ombrelle_api_items::models::UpdateItemRequest,
        ombrelle_api_items::models::ItemResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Health and service metadata"),
        (name = "Tenants", description = "Tenant CRUD"),
        (name = "Tenant Members", description = "Membership management"),
        (name = "Tenant Invitations", description = "Invitation lifecycle"),
        (name = "Users", description = "Self-service profile"),
        (name = "Items", description = "Tenant-scoped items"),
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme the path annotations reference.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Routes serving the OpenAPI document.
pub fn openapi_routes() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builds_and_lists_core_paths() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = json["paths"].as_object().unwrap();

        assert!(paths.contains_key("/tenants"));
        assert!(paths.contains_key("/tenants/{tenant_id}/invitations"));
        assert!(paths.contains_key("/invitations/accept"));
        assert!(paths.contains_key("/users/me"));
    }
}
