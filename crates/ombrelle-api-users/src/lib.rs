//! User self-service API for ombrelle.
//!
//! Carries the local half of the Auth Bridge: [`KeycloakSyncService`]
//! resolves verified Keycloak claims into a local user record (creating
//! or linking as needed), and [`auth_user_middleware`] turns that into
//! the `AuthUser` request extension every authenticated handler
//! consumes. The routes themselves are profile and tenant-context
//! self-service (`/users/me`).

pub mod error;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use error::UserError;
pub use middleware::auth_user_middleware;
pub use router::{users_router, UsersState};
pub use services::KeycloakSyncService;
