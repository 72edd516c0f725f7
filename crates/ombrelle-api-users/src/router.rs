//! Router configuration for the users API.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use sqlx::PgPool;

use ombrelle_auth::AuthUser;
use ombrelle_db::models::{Membership, Tenant, User};

use crate::error::{ErrorResponse, UserError};
use crate::models::{
    MyTenantResponse, SwitchTenantRequest, SwitchTenantResponse, UpdateProfileRequest,
    UserResponse,
};

/// Application state for the users API.
#[derive(Clone)]
pub struct UsersState {
    /// Database connection pool.
    pub pool: PgPool,
}

impl UsersState {
    /// Build the state.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Self-service routes, nested under `/users`.
pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .route("/me", get(me_handler).patch(update_me_handler))
        .route("/me/tenants", get(my_tenants_handler))
        .route("/me/switch-tenant", post(switch_tenant_handler))
        .with_state(state)
}

/// GET /users/me
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn me_handler(
    State(state): State<UsersState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<UserResponse>, UserError> {
    let user = User::find_by_id(&state.pool, caller.user_id)
        .await?
        .ok_or(UserError::NotFound(caller.user_id))?;

    Ok(Json(user.into()))
}

/// PATCH /users/me
///
/// Update the caller's profile. The local database is the source of
/// truth for profile data; email uniqueness is enforced.
#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn update_me_handler(
    State(state): State<UsersState>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, UserError> {
    if let Some(error) = request.validate() {
        return Err(UserError::Validation(error));
    }

    let new_email = request.email.as_deref().map(|e| e.trim().to_lowercase());

    if let Some(ref email) = new_email {
        if *email != caller.email.to_lowercase()
            && User::find_by_email(&state.pool, email).await?.is_some()
        {
            return Err(UserError::EmailExists(email.clone()));
        }
    }

    let updated = User::update_profile(
        &state.pool,
        caller.user_id,
        new_email.as_deref(),
        request.first_name.as_deref(),
        request.last_name.as_deref(),
    )
    .await?
    .ok_or(UserError::NotFound(caller.user_id))?;

    tracing::info!(user_id = %updated.id, "User profile updated");

    Ok(Json(updated.into()))
}

/// GET /users/me/tenants
///
/// The caller's tenants with role and member count, newest first.
#[utoipa::path(
    get,
    path = "/users/me/tenants",
    responses(
        (status = 200, description = "The caller's tenants", body = [MyTenantResponse]),
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn my_tenants_handler(
    State(state): State<UsersState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<MyTenantResponse>>, UserError> {
    let tenants = Tenant::list_for_user(&state.pool, caller.user_id).await?;

    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// POST /users/me/switch-tenant
///
/// Validate that the caller belongs to a tenant before the client makes
/// it the active one.
#[utoipa::path(
    post,
    path = "/users/me/switch-tenant",
    request_body = SwitchTenantRequest,
    responses(
        (status = 200, description = "Switch allowed", body = SwitchTenantResponse),
        (status = 403, description = "Not a member of that tenant", body = ErrorResponse),
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn switch_tenant_handler(
    State(state): State<UsersState>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<SwitchTenantRequest>,
) -> Result<Json<SwitchTenantResponse>, UserError> {
    let membership = Membership::find(&state.pool, caller.user_id, request.tenant_id).await?;

    if membership.is_none() {
        return Err(UserError::NoTenantAccess(request.tenant_id));
    }

    Ok(Json(SwitchTenantResponse {
        tenant_id: request.tenant_id,
    }))
}
