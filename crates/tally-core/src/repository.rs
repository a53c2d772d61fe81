//! Persistence-agnostic ledger interfaces.
//!
//! The engine's callers depend on these traits, not on a concrete store.
//! Implementations must serialize writes per key (capacity checks and the
//! one-record-per-key invariant are evaluated against post-lock state) and
//! append one history entry per accepted write. `tally-db` provides the
//! libSQL-backed implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Actor, AttendanceHistoryEntry, AttendanceKey, AttendanceRecord, ClassSession,
    GradeContribution, GradeHistoryEntry, GradeKey, NewContribution,
};
use crate::enums::AttendanceStatus;
use crate::errors::LedgerError;
use crate::points::GradePoints;

/// Attendance decisions: one current record per key plus full history.
#[async_trait]
pub trait AttendanceRepository {
    /// Record or override the attendance decision for a key.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::SessionNotConcluded`] before `session` ends
    /// - [`LedgerError::MissingJustification`] for `Absent` without one
    /// - [`LedgerError::NotAuthorizedToOverride`] when a record exists and
    ///   the actor's role may not change it
    /// - [`LedgerError::Conflict`] when a concurrent writer won the key
    #[allow(clippy::too_many_arguments)]
    async fn submit_attendance(
        &self,
        key: &AttendanceKey,
        session: &ClassSession,
        actor: &Actor,
        new_status: AttendanceStatus,
        justification: Option<&str>,
        override_reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, LedgerError>;

    /// The current attendance record for a key, if any.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the lookup fails.
    async fn get_attendance(
        &self,
        key: &AttendanceKey,
    ) -> Result<Option<AttendanceRecord>, LedgerError>;

    /// Full transition history for a key, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the lookup fails or stored history is
    /// malformed.
    async fn attendance_history(
        &self,
        key: &AttendanceKey,
    ) -> Result<Vec<AttendanceHistoryEntry>, LedgerError>;
}

/// Grade contributions: a capped, append-only total per key plus history.
#[async_trait]
pub trait GradeRepository {
    /// Capacity still available before the key's total reaches the cap.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the lookup fails.
    async fn remaining_capacity(&self, key: &GradeKey) -> Result<GradePoints, LedgerError>;

    /// Sum of active contributions for a key. Recomputed per call.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the lookup fails.
    async fn grade_total(&self, key: &GradeKey) -> Result<GradePoints, LedgerError>;

    /// Validate and append one grade contribution.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidValue`] for non-finite or non-positive values
    /// - [`LedgerError::MissingJustification`] for a justification under
    ///   3 characters
    /// - [`LedgerError::InsufficientCapacity`] when the rounded value exceeds
    ///   the remaining capacity
    async fn add_contribution(
        &self,
        key: &GradeKey,
        input: NewContribution,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<GradeContribution, LedgerError>;

    /// Logically remove a manual contribution.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] for an unknown or already-removed id
    /// - [`LedgerError::NotManual`] for automatically sourced contributions
    async fn remove_contribution(
        &self,
        key: &GradeKey,
        contribution_id: &str,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError>;

    /// Full grade event history for a key, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the lookup fails or stored history is
    /// malformed.
    async fn grade_history(&self, key: &GradeKey) -> Result<Vec<GradeHistoryEntry>, LedgerError>;
}
