//! CLI response types returned as JSON by `tally` commands.
//!
//! These structs define the shape of JSON output for commands like
//! `tally resolve`, `tally attendance submit`, and `tally grade add`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    AttendanceHistoryEntry, AttendanceRecord, GradeContribution, GradeHistoryEntry,
};
use crate::points::GradePoints;
use crate::resolver::Resolution;

/// Response from `tally resolve`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResolveResponse {
    pub resolution: Resolution,
    pub note: Option<String>,
}

/// Response from `tally attendance submit`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AttendanceSubmitResponse {
    pub record: AttendanceRecord,
}

/// Response from `tally attendance show`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AttendanceShowResponse {
    pub record: Option<AttendanceRecord>,
}

/// Response from `tally attendance history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AttendanceHistoryResponse {
    pub entries: Vec<AttendanceHistoryEntry>,
}

/// Response from `tally grade add`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeAddResponse {
    pub contribution: GradeContribution,
    pub total: GradePoints,
    pub remaining: GradePoints,
}

/// Response from `tally grade remove`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeRemoveResponse {
    pub removed_id: String,
    pub total: GradePoints,
}

/// Response from `tally grade total`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeTotalResponse {
    pub total: GradePoints,
    pub remaining: GradePoints,
}

/// Response from `tally grade history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeHistoryResponse {
    pub entries: Vec<GradeHistoryEntry>,
}
