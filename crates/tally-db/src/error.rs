//! Database error types for tally-db.

use thiserror::Error;

use tally_core::errors::LedgerError;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<DatabaseError> for LedgerError {
    /// Storage failures surface through the ledger API as opaque internal
    /// errors; callers match on the domain variants only.
    fn from(e: DatabaseError) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}

/// Whether a libSQL error is a UNIQUE constraint violation.
///
/// Raised when another process won the insert race for the same key on the
/// same database file; the service maps it to [`LedgerError::Conflict`].
#[must_use]
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}
