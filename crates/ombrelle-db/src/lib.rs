//! ombrelle database layer.
//!
//! Plain `sqlx` models over Postgres: no ORM, raw SQL with `query_as`
//! on `FromRow` structs. Each model exposes associated async functions
//! taking a `&PgPool` (or a transaction for the multi-statement paths).
//!
//! Schema migrations are embedded at compile time and applied with
//! [`run_migrations`] at startup.

pub mod error;
pub mod migrations;
pub mod models;

pub use error::DbError;
pub use migrations::run_migrations;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Create a connection pool against the given database URL.
///
/// Uses the same pool sizing the API server runs with in production.
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(DbError::ConnectionFailed)
}
