use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw presence signals for one (session, student) pair.
///
/// Supplied by the external telemetry collaborator. Absent signals are the
/// common case, not an error: a student who never logged in simply has no
/// `last_login_at`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceSnapshot {
    pub last_login_at: Option<DateTime<Utc>>,
    pub minutes_watched: Option<u32>,
}
