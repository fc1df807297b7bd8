//! # Database Error Types
//!
//! Error types for ledger storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                         │
//! │                                                              │
//! │  SQLite Error (sqlx::Error)                                  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  DbError (this module) ← adds context and categorization     │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  Request layer (HTTP collaborator) maps to a response        │
//! │                                                              │
//! │  Not part of this flow: sale rejections and not-found        │
//! │  lookups are VALUES (SaleOutcome, Option, StockAdjustment),  │
//! │  not errors. DbError means the storage engine misbehaved.    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These wrap sqlx errors with enough context to tell a constraint
/// violation from an I/O failure. Anything that reaches a caller as a
/// `DbError` was not silently handled, by construction: multi-step
/// mutations roll back before the error is surfaced.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity expected to exist is absent.
    ///
    /// Read paths return `Option`/outcome values for missing rows; this
    /// variant is for internal invariant breaks (e.g. an UPDATE touching
    /// zero rows inside a transaction that just read the row).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate `(tenant, name)`).
    ///
    /// `field` is the `table.column` list from the SQLite constraint
    /// message; the offending value is not in the error, callers know
    /// what they tried to write.
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation (sale item without its sale).
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Input the core validation rejected before any query ran.
    #[error("Invalid input: {0}")]
    Invalid(#[from] boutik_core::ValidationError),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed. Fatal at startup: the process must not
    /// serve requests against a half-migrated schema.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction begin/commit failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → classified by constraint message
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

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
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

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
