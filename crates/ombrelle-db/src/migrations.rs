//! Embedded schema migrations.

use crate::DbError;
use sqlx::PgPool;

/// Apply all pending migrations from the embedded `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DbError::MigrationFailed)?;

    tracing::info!("Database migrations applied");
    Ok(())
}
