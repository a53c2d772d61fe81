use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Actor;
use crate::enums::AttendanceStatus;

/// Identifies the attendance decision for one student in one session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct AttendanceKey {
    pub course_id: String,
    pub class_id: String,
    pub session_id: String,
    pub student_id: String,
}

impl AttendanceKey {
    /// Canonical string form, used for per-key write locking and as the
    /// `scope_key` of history entries.
    #[must_use]
    pub fn scope_key(&self) -> String {
        format!(
            "att:{}:{}:{}:{}",
            self.course_id, self.class_id, self.session_id, self.student_id
        )
    }
}

/// The current attendance decision for a key.
///
/// At most one live record exists per key. Records are replaced by overrides,
/// never deleted; superseded states live on in the history log. `version`
/// increments on every accepted write and acts as the compare-and-swap token
/// against concurrent writers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: String,
    pub course_id: String,
    pub class_id: String,
    pub session_id: String,
    pub student_id: String,
    pub status: AttendanceStatus,
    /// Required non-empty when `status` is `Absent`.
    pub justification: Option<String>,
    pub version: i64,
    pub updated_by: Actor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    #[must_use]
    pub fn key(&self) -> AttendanceKey {
        AttendanceKey {
            course_id: self.course_id.clone(),
            class_id: self.class_id.clone(),
            session_id: self.session_id.clone(),
            student_id: self.student_id.clone(),
        }
    }
}
