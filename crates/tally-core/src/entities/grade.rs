use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Actor;
use crate::enums::GradeSource;
use crate::points::GradePoints;

/// Identifies the grade ledger for one student in one class.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct GradeKey {
    pub course_id: String,
    pub class_id: String,
    pub student_id: String,
}

impl GradeKey {
    /// Canonical string form, used for per-key write locking and as the
    /// `scope_key` of history entries.
    #[must_use]
    pub fn scope_key(&self) -> String {
        format!("grd:{}:{}:{}", self.course_id, self.class_id, self.student_id)
    }
}

/// Input for a new grade contribution, as accepted by
/// [`crate::repository::GradeRepository::add_contribution`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewContribution {
    /// Caller-supplied value; validated and rounded to 2 decimal places.
    pub value: f64,
    pub source: GradeSource,
    pub source_ref: Option<String>,
    pub source_title: Option<String>,
    pub justification: String,
    pub manual: bool,
}

/// One discrete grade input counting toward a student's capped total.
///
/// Contributions are append-only. Manual contributions can be logically
/// removed (`removed_at` set); automatically sourced ones are immutable
/// through that path.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeContribution {
    pub id: String,
    pub course_id: String,
    pub class_id: String,
    pub student_id: String,
    pub value: GradePoints,
    pub source: GradeSource,
    /// External id of the graded item (exam id, assignment id, ...).
    pub source_ref: Option<String>,
    pub source_title: Option<String>,
    pub justification: String,
    pub manual: bool,
    pub removed_at: Option<DateTime<Utc>>,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
}

impl GradeContribution {
    /// Whether the contribution still counts toward the total.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.removed_at.is_none()
    }

    #[must_use]
    pub fn key(&self) -> GradeKey {
        GradeKey {
            course_id: self.course_id.clone(),
            class_id: self.class_id.clone(),
            student_id: self.student_id.clone(),
        }
    }
}
