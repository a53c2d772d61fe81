//! Cross-cutting error types for Tally.
//!
//! Every ledger operation reports failures synchronously through
//! [`LedgerError`]; nothing is retried inside the engine. Storage-level
//! errors (`tally-db`) convert into the `Other` catch-all at the service
//! boundary, so callers match on domain variants and treat the rest as opaque.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::enums::ActorRole;
use crate::points::GradePoints;

/// Errors that can be raised by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A grade value was non-finite, out of range, or not positive.
    #[error("Invalid grade value: {reason}")]
    InvalidValue { reason: String },

    /// A contribution would push the key's total past the cap. The remaining
    /// capacity is carried so the caller can re-prompt with a smaller value.
    #[error("Insufficient capacity: requested {requested}, remaining {remaining}")]
    InsufficientCapacity {
        requested: GradePoints,
        remaining: GradePoints,
    },

    /// A required justification was missing or too short.
    #[error("Justification required: {reason}")]
    MissingJustification { reason: String },

    /// The actor's role may not change an existing attendance record.
    #[error(
        "Role '{role}' may not override an existing attendance record; \
         override requires admin, moderator, or pedagogical"
    )]
    NotAuthorizedToOverride { role: ActorRole },

    /// Attendance cannot be entered before the session has concluded.
    #[error("Session has not concluded yet (concludes at {concludes_at})")]
    SessionNotConcluded { concludes_at: DateTime<Utc> },

    /// Entity lookup returned no result.
    #[error("Not found: {what} {id}")]
    NotFound { what: String, id: String },

    /// Automatically sourced contributions are immutable through removal.
    #[error("Contribution {id} is not manual and cannot be removed")]
    NotManual { id: String },

    /// A concurrent writer won the race for the same key.
    #[error("Concurrent write conflict on {scope_key}")]
    Conflict { scope_key: String },

    /// Data failed validation (malformed stored payloads, bad enum values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
