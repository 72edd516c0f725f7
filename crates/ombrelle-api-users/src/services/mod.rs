//! Business logic for the users API.

mod sync_service;

pub use sync_service::KeycloakSyncService;
