//! Keycloak-delegated authentication for ombrelle.
//!
//! The platform never issues or stores credentials: Keycloak is the single
//! source of truth for authentication. This crate verifies the RS256
//! bearer tokens Keycloak mints, either against a statically configured
//! public key or against the realm's JWKS endpoint (cached), and exposes
//! an axum middleware that turns a valid token into request extensions.
//!
//! Resolution of claims into a local user record lives in
//! `ombrelle-api-users` (the sync service); handlers downstream of the
//! middleware see [`KeycloakClaims`] and, once resolved, [`AuthUser`] —
//! never raw tokens.

pub mod claims;
pub mod error;
pub mod jwks;
pub mod jwt;
pub mod middleware;
pub mod principal;

pub use claims::KeycloakClaims;
pub use error::AuthError;
pub use jwks::{Jwk, JwkSet, JwksClient};
pub use jwt::{decode_token, decode_token_with_config, extract_kid, ValidationConfig};
pub use middleware::{jwt_auth_middleware, JwtVerifier, KeySource};
pub use principal::AuthUser;
