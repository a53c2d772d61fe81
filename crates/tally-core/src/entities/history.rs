use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Actor;
use crate::enums::{AttendanceStatus, GradeSource, HistoryAction, LedgerKind};
use crate::errors::LedgerError;
use crate::history_detail::{GradeEventDetail, StatusChangedDetail};
use crate::points::GradePoints;

/// An append-only history entry recording one accepted ledger write.
///
/// Shared by both ledgers: `ledger` + `scope_key` identify whose history this
/// is, `detail` carries the typed before/after payload for the action.
/// Created exactly once per accepted write; never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub ledger: LedgerKind,
    pub scope_key: String,
    pub action: HistoryAction,
    pub actor: Actor,
    pub justification: Option<String>,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Attendance view of a history entry: one status transition with full
/// before/after context.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AttendanceHistoryEntry {
    pub id: String,
    pub action: HistoryAction,
    pub from_status: Option<AttendanceStatus>,
    pub to_status: AttendanceStatus,
    pub from_justification: Option<String>,
    pub to_justification: Option<String>,
    pub override_reason: Option<String>,
    pub actor: Actor,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<HistoryEntry> for AttendanceHistoryEntry {
    type Error = LedgerError;

    fn try_from(entry: HistoryEntry) -> Result<Self, LedgerError> {
        let detail = entry.detail.ok_or_else(|| {
            LedgerError::Validation(format!("history entry {} has no detail payload", entry.id))
        })?;
        let detail: StatusChangedDetail = serde_json::from_value(detail).map_err(|e| {
            LedgerError::Validation(format!("history entry {}: bad attendance detail: {e}", entry.id))
        })?;
        Ok(Self {
            id: entry.id,
            action: entry.action,
            from_status: detail.from_status,
            to_status: detail.to_status,
            from_justification: detail.from_justification,
            to_justification: detail.to_justification,
            override_reason: detail.override_reason,
            actor: entry.actor,
            created_at: entry.created_at,
        })
    }
}

/// Grade view of a history entry: one `GradeAdded` or `GradeRemoved` event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeHistoryEntry {
    pub id: String,
    pub action: HistoryAction,
    pub contribution_id: String,
    pub value: GradePoints,
    pub source: GradeSource,
    pub source_ref: Option<String>,
    pub source_title: Option<String>,
    pub justification: Option<String>,
    pub actor: Actor,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<HistoryEntry> for GradeHistoryEntry {
    type Error = LedgerError;

    fn try_from(entry: HistoryEntry) -> Result<Self, LedgerError> {
        let detail = entry.detail.ok_or_else(|| {
            LedgerError::Validation(format!("history entry {} has no detail payload", entry.id))
        })?;
        let detail: GradeEventDetail = serde_json::from_value(detail).map_err(|e| {
            LedgerError::Validation(format!("history entry {}: bad grade detail: {e}", entry.id))
        })?;
        Ok(Self {
            id: entry.id,
            action: entry.action,
            contribution_id: detail.contribution_id,
            value: detail.value,
            source: detail.source,
            source_ref: detail.source_ref,
            source_title: detail.source_title,
            justification: entry.justification,
            actor: entry.actor,
            created_at: entry.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ActorRole;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn entry(action: HistoryAction, detail: serde_json::Value) -> HistoryEntry {
        HistoryEntry {
            id: "hst-1".to_string(),
            ledger: LedgerKind::Attendance,
            scope_key: "att:c1:k1:s1:st1".to_string(),
            action,
            actor: Actor::new("usr-1", ActorRole::Instructor),
            justification: None,
            detail: Some(detail),
            created_at: Utc.with_ymd_and_hms(2026, 3, 2, 16, 0, 0).unwrap(),
        }
    }

    #[test]
    fn attendance_view_parses_status_detail() {
        let raw = entry(
            HistoryAction::StatusChanged,
            serde_json::json!({
                "from_status": "present",
                "to_status": "absent",
                "from_justification": null,
                "to_justification": "medical note",
                "override_reason": "correction",
            }),
        );
        let view = AttendanceHistoryEntry::try_from(raw).unwrap();
        assert_eq!(view.from_status, Some(AttendanceStatus::Present));
        assert_eq!(view.to_status, AttendanceStatus::Absent);
        assert_eq!(view.to_justification.as_deref(), Some("medical note"));
        assert_eq!(view.override_reason.as_deref(), Some("correction"));
    }

    #[test]
    fn attendance_view_rejects_missing_detail() {
        let mut raw = entry(HistoryAction::Created, serde_json::Value::Null);
        raw.detail = None;
        assert!(matches!(
            AttendanceHistoryEntry::try_from(raw),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn grade_view_parses_event_detail() {
        let raw = entry(
            HistoryAction::GradeAdded,
            serde_json::json!({
                "contribution_id": "ctb-9",
                "value": 1.5,
                "source": "exam",
                "source_ref": "exm-3",
                "source_title": "Midterm",
            }),
        );
        let view = GradeHistoryEntry::try_from(raw).unwrap();
        assert_eq!(view.contribution_id, "ctb-9");
        assert_eq!(view.value, GradePoints::from_hundredths(150));
        assert_eq!(view.source, GradeSource::Exam);
    }
}
