//! Router and handlers for the items API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use ombrelle_auth::AuthUser;

use crate::error::{ErrorResponse, ItemError};
use crate::models::{CreateItemRequest, ItemResponse, UpdateItemRequest};
use crate::service::ItemService;

/// Application state for the items API.
#[derive(Clone)]
pub struct ItemsState {
    /// Item operations.
    pub item_service: ItemService,
}

impl ItemsState {
    /// Build the state.
    pub fn new(pool: PgPool) -> Self {
        Self {
            item_service: ItemService::new(pool),
        }
    }
}

/// Item routes, nested under `/tenants` (they share the tenant path
/// namespace with the tenants router).
pub fn items_router(state: ItemsState) -> Router {
    Router::new()
        .route(
            "/:tenant_id/items",
            get(list_items_handler).post(create_item_handler),
        )
        .route(
            "/:tenant_id/items/:item_id",
            get(get_item_handler)
                .patch(update_item_handler)
                .delete(delete_item_handler),
        )
        .with_state(state)
}

/// POST /tenants/{tenant_id}/items
#[utoipa::path(
    post,
    path = "/tenants/{tenant_id}/items",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
    ),
    tag = "Items",
    security(("bearerAuth" = []))
)]
pub async fn create_item_handler(
    State(state): State<ItemsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ItemError> {
    if let Some(error) = request.validate() {
        return Err(ItemError::Validation(error));
    }

    let item = state
        .item_service
        .create(
            tenant_id,
            request.name.trim(),
            request.description.as_deref(),
            caller.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /tenants/{tenant_id}/items
#[utoipa::path(
    get,
    path = "/tenants/{tenant_id}/items",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "The tenant's items", body = [ItemResponse]),
        (status = 403, description = "Not a member", body = ErrorResponse),
    ),
    tag = "Items",
    security(("bearerAuth" = []))
)]
pub async fn list_items_handler(
    State(state): State<ItemsState>,
    Extension(caller): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<Vec<ItemResponse>>, ItemError> {
    let items = state.item_service.list(tenant_id, caller.user_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// GET /tenants/{tenant_id}/items/{item_id}
#[utoipa::path(
    get,
    path = "/tenants/{tenant_id}/items/{item_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("item_id" = Uuid, Path, description = "Item ID"),
    ),
    responses(
        (status = 200, description = "The item", body = ItemResponse),
        (status = 404, description = "Item not found in this tenant", body = ErrorResponse),
    ),
    tag = "Items",
    security(("bearerAuth" = []))
)]
pub async fn get_item_handler(
    State(state): State<ItemsState>,
    Extension(caller): Extension<AuthUser>,
    Path((tenant_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ItemResponse>, ItemError> {
    let item = state
        .item_service
        .get(tenant_id, item_id, caller.user_id)
        .await?;
    Ok(Json(item.into()))
}

/// PATCH /tenants/{tenant_id}/items/{item_id}
#[utoipa::path(
    patch,
    path = "/tenants/{tenant_id}/items/{item_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("item_id" = Uuid, Path, description = "Item ID"),
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = ItemResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Item not found in this tenant", body = ErrorResponse),
    ),
    tag = "Items",
    security(("bearerAuth" = []))
)]
pub async fn update_item_handler(
    State(state): State<ItemsState>,
    Extension(caller): Extension<AuthUser>,
    Path((tenant_id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ItemError> {
    if let Some(error) = request.validate() {
        return Err(ItemError::Validation(error));
    }

    let item = state
        .item_service
        .update(
            tenant_id,
            item_id,
            request.name.as_deref().map(str::trim),
            request.description.as_deref(),
            caller.user_id,
        )
        .await?;

    Ok(Json(item.into()))
}

/// DELETE /tenants/{tenant_id}/items/{item_id}
#[utoipa::path(
    delete,
    path = "/tenants/{tenant_id}/items/{item_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("item_id" = Uuid, Path, description = "Item ID"),
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found in this tenant", body = ErrorResponse),
    ),
    tag = "Items",
    security(("bearerAuth" = []))
)]
pub async fn delete_item_handler(
    State(state): State<ItemsState>,
    Extension(caller): Extension<AuthUser>,
    Path((tenant_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ItemError> {
    state
        .item_service
        .delete(tenant_id, item_id, caller.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
