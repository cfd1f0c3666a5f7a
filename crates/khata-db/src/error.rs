//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (khata-engine) ← The port-level taxonomy                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EngineError → host service → user-facing message                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use khata_engine::StoreError;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// before they are narrowed into the port taxonomy.
#[derive(Debug, Error)]
pub enum DbError {
    /// Row not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate `(tenant_id, name)` pair
    /// - A transaction trying to commit a second current row for a tenant
    ///   (the partial unique index)
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// The database is busy or a table is locked.
    ///
    /// ## When This Occurs
    /// - Another writer holds the SQLite write lock past the busy timeout
    ///
    /// Transient: the whole engine operation may be retried by the host.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint/lock type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "fiscal_period".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints and lock contention only
                // through the message text:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "database is locked" / "database table is locked"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("database is locked")
                    || msg.contains("database table is locked")
                {
                    DbError::Busy(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Narrows database failures into the persistence port taxonomy.
///
/// Guard refusals (`Closed`, `Current`) are NOT produced here: the
/// repository decides those itself after a guarded statement matches no
/// row, because only it knows which guard was in play.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => StoreError::NotFound,
            DbError::UniqueViolation { .. } => StoreError::DuplicateName,
            DbError::Busy(message) => StoreError::Conflict { message },
            DbError::PoolExhausted => StoreError::Conflict {
                message: "connection pool exhausted".to_string(),
            },
            other => StoreError::Backend {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_narrows_into_port_taxonomy() {
        let err: StoreError = DbError::UniqueViolation {
            field: "fiscal_periods.tenant_id, fiscal_periods.name".into(),
        }
        .into();
        assert!(matches!(err, StoreError::DuplicateName));

        let err: StoreError = DbError::Busy("database is locked".into()).into();
        assert!(matches!(err, StoreError::Conflict { .. }));

        let err: StoreError = DbError::MigrationFailed("boom".into()).into();
        assert!(matches!(err, StoreError::Backend { .. }));
    }
}
