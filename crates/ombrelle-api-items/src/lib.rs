//! Items API for ombrelle.
//!
//! The platform's sample tenant-scoped resource: plain CRUD where every
//! operation requires a membership in the path tenant, and rows from
//! other tenants are invisible. Baseline (MEMBER) access suffices for
//! all item operations.

pub mod error;
pub mod models;
pub mod router;
pub mod service;

pub use error::ItemError;
pub use router::{items_router, ItemsState};
pub use service::ItemService;
