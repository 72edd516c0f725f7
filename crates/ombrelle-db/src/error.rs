//! Error types for the ombrelle-db crate.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or acquire a database connection.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A database migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A database query failed to execute.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// A lookup that must succeed returned no rows.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::QueryFailed(err)
    }
}

impl DbError {
    /// True when the underlying error is a unique-constraint violation.
    ///
    /// Pre-checks give precise error messages, but the constraint is the
    /// authoritative guard under concurrency; callers translate this into
    /// their conflict variant instead of surfacing a raw 500.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::QueryFailed(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }

    /// Name of the violated constraint, when the driver reports one.
    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::QueryFailed(sqlx::Error::Database(db)) => db.constraint(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_unique_violation());
        assert!(err.constraint().is_none());
    }

    #[test]
    fn test_not_found_display() {
        let err = DbError::NotFound("tenant 42".to_string());
        assert_eq!(err.to_string(), "Not found: tenant 42");
    }
}
