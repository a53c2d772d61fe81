//! Modality, status, role, and action enums for Tally.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Capability checks (`requires_justification`, `can_override`) live on the enums
//! themselves so ledger code never hand-rolls role or status comparisons.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Modality
// ---------------------------------------------------------------------------

/// Delivery mode of a class session.
///
/// Drives which evidence signals the resolver considers: on-site sessions have
/// no automatic evidence at all, live sessions use watch minutes, online and
/// hybrid sessions use the last-login timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    OnSite,
    Live,
    Online,
    Hybrid,
}

impl Modality {
    /// Return the string representation used in SQL storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnSite => "on_site",
            Self::Live => "live",
            Self::Online => "online",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AttendanceStatus
// ---------------------------------------------------------------------------

/// Final presence judgment recorded for a student in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Justified,
    Late,
}

impl AttendanceStatus {
    /// Whether submitting this status requires a non-empty justification.
    #[must_use]
    pub const fn requires_justification(self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Justified => "justified",
            Self::Late => "late",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActorRole
// ---------------------------------------------------------------------------

/// Role of the actor performing a ledger write.
///
/// The engine trusts the role it is handed; authentication and role storage
/// belong to an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Moderator,
    Pedagogical,
    Instructor,
}

impl ActorRole {
    /// Roles allowed to change an attendance record that already exists.
    ///
    /// Instructors may enter the first decision for a key but never change it;
    /// subsequent changes are override-only.
    #[must_use]
    pub const fn can_override(self) -> bool {
        matches!(self, Self::Admin | Self::Moderator | Self::Pedagogical)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Pedagogical => "pedagogical",
            Self::Instructor => "instructor",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PresenceSuggestion
// ---------------------------------------------------------------------------

/// Resolver output: the suggested reading of the raw evidence.
///
/// A suggestion is advisory. The recorded decision always goes through the
/// attendance ledger as an [`AttendanceStatus`] chosen by a human or importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PresenceSuggestion {
    /// No automatic judgment possible (on-site session or unknown modality).
    Indeterminate,
    /// Live watch minutes met the required threshold.
    Sufficient,
    /// Live watch minutes fell short of the required threshold.
    Insufficient,
    /// Last login fell inside the grace window.
    OnTime,
    /// Last login fell outside the grace window.
    Late,
    /// No login was ever recorded.
    NoAccess,
}

impl PresenceSuggestion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indeterminate => "indeterminate",
            Self::Sufficient => "sufficient",
            Self::Insufficient => "insufficient",
            Self::OnTime => "on_time",
            Self::Late => "late",
            Self::NoAccess => "no_access",
        }
    }
}

impl fmt::Display for PresenceSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GradeSource
// ---------------------------------------------------------------------------

/// Kind of graded item a contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GradeSource {
    Exam,
    Assignment,
    Lesson,
    Other,
}

impl GradeSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Assignment => "assignment",
            Self::Lesson => "lesson",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for GradeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LedgerKind
// ---------------------------------------------------------------------------

/// Which ledger a history entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Attendance,
    Grade,
}

impl LedgerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attendance => "attendance",
            Self::Grade => "grade",
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HistoryAction
// ---------------------------------------------------------------------------

/// Type of state transition recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// First attendance decision for a key.
    Created,
    /// An existing attendance record was replaced.
    StatusChanged,
    /// A grade contribution was accepted.
    GradeAdded,
    /// A manual grade contribution was logically removed.
    GradeRemoved,
}

impl HistoryAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::GradeAdded => "grade_added",
            Self::GradeRemoved => "grade_removed",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
