//! Typed history detail payloads.
//!
//! Each history action carries a structured `detail` JSON blob capturing the
//! before/after values of the transition. These types pin the shapes so both
//! ledgers write and read the same fields.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AttendanceStatus, GradeSource};
use crate::points::GradePoints;

/// Detail for `HistoryAction::Created` and `HistoryAction::StatusChanged`.
///
/// `from_status` is `None` on the first decision for a key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from_status: Option<AttendanceStatus>,
    pub to_status: AttendanceStatus,
    pub from_justification: Option<String>,
    pub to_justification: Option<String>,
    pub override_reason: Option<String>,
}

/// Detail for `HistoryAction::GradeAdded` and `HistoryAction::GradeRemoved`.
///
/// Removal entries repeat the original value/source fields so the audit line
/// stays readable without chasing the contribution row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeEventDetail {
    pub contribution_id: String,
    pub value: GradePoints,
    pub source: GradeSource,
    pub source_ref: Option<String>,
    pub source_title: Option<String>,
}
