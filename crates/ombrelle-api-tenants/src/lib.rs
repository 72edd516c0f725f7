//! Tenant API for ombrelle.
//!
//! The heart of the platform: tenant CRUD, role-based membership
//! management, and the invitation lifecycle (issue → accept | expire |
//! cancel) with its transactional guarantees and invitation email.
//!
//! ## Routers
//!
//! - [`router::tenants_router`] — authenticated, everything under
//!   `/tenants`; every operation checks the caller's membership in the
//!   path tenant before any role rule.
//! - [`router::public_invitations_router`] — unauthenticated token
//!   lookup and acceptance (invitees do not have accounts yet).

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::TenantError;
pub use router::{public_invitations_router, tenants_router, TenantsState};
