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
//! │       ├── repositories return it as-is                                 │
//! │       ▼                                                                 │
//! │  StoreError (reel-core) ← SqliteRentalStore converts at the port       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (rental-api) ← Rendered as a 409 or 500                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reel_core::{StoreError, ValidationErrors};
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and for the HTTP layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A record failed validation before it reached SQL.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent customer_id
    /// - Referencing a non-existent video_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation.
    ///
    /// ## When This Occurs
    /// - A counter written below zero
    /// - A due or check-in date before the checkout date
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Another writer held the database past the busy timeout.
    #[error("Database is busy: {0}")]
    Busy(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True when retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::Busy(_) | DbError::PoolExhausted | DbError::ConnectionFailed(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite messages:
                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: <expr>"
                // "database is locked" / "database table is locked"
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("is locked") || msg.contains("database is busy") {
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

/// Hands database failures to the rental service.
///
/// Transient failures become `Unavailable`, everything else `Backend`.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        if err.is_transient() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DbError::not_found("Video", 42);
        assert_eq!(err.to_string(), "Video not found: 42");
    }

    #[test]
    fn test_store_error_conversion() {
        let busy: StoreError = DbError::Busy("database is locked".into()).into();
        assert!(matches!(busy, StoreError::Unavailable(_)));

        let pool: StoreError = DbError::PoolExhausted.into();
        assert!(matches!(pool, StoreError::Unavailable(_)));

        let query: StoreError = DbError::QueryFailed("no such table: videos".into()).into();
        assert!(matches!(query, StoreError::Backend(msg) if msg.contains("no such table")));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
