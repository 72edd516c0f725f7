//! Axum middleware turning bearer tokens into request extensions.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;

use crate::claims::KeycloakClaims;
use crate::error::AuthError;
use crate::jwks::JwksClient;
use crate::jwt::{decode_token_with_config, extract_kid, ValidationConfig};

/// Where verification keys come from.
#[derive(Clone)]
pub enum KeySource {
    /// A statically configured PEM public key (single-key realms,
    /// air-gapped deployments, tests).
    Static(Vec<u8>),

    /// The realm's JWKS endpoint, cached with TTL.
    Jwks(JwksClient),
}

/// Verifies bearer tokens against the configured key source.
#[derive(Clone)]
pub struct JwtVerifier {
    key_source: KeySource,
    validation: ValidationConfig,
}

impl JwtVerifier {
    /// Verifier using a static PEM public key.
    #[must_use]
    pub fn with_static_key(public_key_pem: Vec<u8>, validation: ValidationConfig) -> Self {
        Self {
            key_source: KeySource::Static(public_key_pem),
            validation,
        }
    }

    /// Verifier resolving keys through a JWKS client.
    #[must_use]
    pub fn with_jwks(client: JwksClient, validation: ValidationConfig) -> Self {
        Self {
            key_source: KeySource::Jwks(client),
            validation,
        }
    }

    /// Verify a bearer token and return its claims.
    pub async fn verify(&self, token: &str) -> Result<KeycloakClaims, AuthError> {
        match &self.key_source {
            KeySource::Static(pem) => decode_token_with_config(token, pem, &self.validation),
            KeySource::Jwks(client) => {
                let kid = extract_kid(token)?;
                let pem = client.get_key_pem(kid.as_deref()).await?;
                decode_token_with_config(token, &pem, &self.validation)
            }
        }
    }
}

/// Require a valid bearer token; insert [`KeycloakClaims`] on success.
///
/// Layered onto every authenticated route group. Failures are 401 with
/// the standard error body; handlers downstream can rely on the claims
/// extension being present.
pub async fn jwt_auth_middleware(
    Extension(verifier): Extension<Arc<JwtVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token.to_string(),
        None => return unauthorized(&AuthError::MissingToken),
    };

    match verifier.verify(&token).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "Rejected bearer token");
            unauthorized(&err)
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(err: &AuthError) -> Response {
    let body = serde_json::json!({
        "error": "unauthorized",
        "message": err.to_string(),
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    const TEST_PUBLIC_KEY: &[u8] = br#"-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAuOs2bjkrVK1Vi6uSrZAG
jy/YTQlC0eMz4YLJHVDgdXPm8UYjonBBykwbKm+C0p4syG93yBDeV7lC+U8zgSk9
4QHP4CilO9VShORDHG37iy1cU6o9PCto+z8wgoc88nWRowFn4rJ3QEnkDyCdRzNy
4d1YV2q97sMW6U9iqsefQu0g6Qkx7GcLy1TLqchIi/tfKxSO7w75Zx8bqBuXZBmY
cmay3ysdQN3l+PVIm4ic/CpuFLW0XmeTvlUp3R2JoSxVySh3faTq+18cspk7nBiW
5mTpko2924GiIWMh/graaMU7agn1ItpBwmXQtXBhfd1J6i5jSKu53NGG4SSXPvu9
jQIDAQAB
-----END PUBLIC KEY-----"#;

    fn test_app() -> Router {
        let verifier = Arc::new(JwtVerifier::with_static_key(
            TEST_PUBLIC_KEY.to_vec(),
            ValidationConfig::default(),
        ));

        Router::new()
            .route("/protected", get(|| async { "ok" }))
            .layer(from_fn(jwt_auth_middleware))
            .layer(Extension(verifier))
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_401() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/protected")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_401() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/protected")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
