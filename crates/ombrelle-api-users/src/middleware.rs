//! Middleware resolving verified claims into the local principal.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;

use ombrelle_auth::{AuthUser, KeycloakClaims};

use crate::services::KeycloakSyncService;

/// Resolve the request's [`KeycloakClaims`] into an [`AuthUser`]
/// extension, syncing the local user record on the way.
///
/// Must be layered inside (after) the JWT middleware: it expects the
/// claims extension to be present.
pub async fn auth_user_middleware(
    State(pool): State<PgPool>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match request.extensions().get::<KeycloakClaims>() {
        Some(claims) => claims.clone(),
        None => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Request is not authenticated",
            );
        }
    };

    let sync = KeycloakSyncService::new(pool);
    match sync.sync_user(&claims).await {
        Ok(user) => {
            request.extensions_mut().insert(AuthUser {
                user_id: user.id,
                email: user.email,
            });
            next.run(request).await
        }
        Err(err) => {
            tracing::error!(error = %err, sub = %claims.sub, "Failed to resolve local user");
            error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Could not resolve user account",
            )
        }
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = serde_json::json!({ "error": code, "message": message });
    (status, Json(body)).into_response()
}
