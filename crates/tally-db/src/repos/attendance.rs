//! Attendance ledger repository.
//!
//! One current record per (course, class, session, student) key. Writes are
//! time-gated on session conclusion, justification-checked for absences, and
//! override-checked once a record exists. Every accepted write appends to the
//! history log; superseded states are never deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tally_core::entities::{
    Actor, AttendanceHistoryEntry, AttendanceKey, AttendanceRecord, ClassSession, HistoryEntry,
};
use tally_core::enums::{AttendanceStatus, HistoryAction, LedgerKind};
use tally_core::errors::LedgerError;
use tally_core::history_detail::StatusChangedDetail;
use tally_core::ids::{PREFIX_ATTENDANCE, PREFIX_HISTORY};
use tally_core::repository::AttendanceRepository;
use tally_core::validate;

use crate::error::{DatabaseError, is_unique_violation};
use crate::helpers::{get_opt_string, parse_actor, parse_datetime, parse_enum};
use crate::service::LedgerService;

const SELECT_COLS: &str = "id, course_id, class_id, session_id, student_id, status, justification, \
     version, updated_by_id, updated_by_role, updated_by_name, created_at, updated_at";

fn row_to_record(row: &libsql::Row) -> Result<AttendanceRecord, DatabaseError> {
    Ok(AttendanceRecord {
        id: row.get::<String>(0)?,
        course_id: row.get::<String>(1)?,
        class_id: row.get::<String>(2)?,
        session_id: row.get::<String>(3)?,
        student_id: row.get::<String>(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        justification: get_opt_string(row, 6)?,
        version: row.get::<i64>(7)?,
        updated_by: parse_actor(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

#[async_trait]
impl AttendanceRepository for LedgerService {
    /// The first submission for a key creates the record; any later
    /// submission replaces it and requires an override-capable role.
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
    ) -> Result<AttendanceRecord, LedgerError> {
        if !session.has_concluded(now) {
            return Err(LedgerError::SessionNotConcluded {
                concludes_at: session.concludes_at(),
            });
        }
        let justification = validate::attendance_justification(new_status, justification)?;

        let scope_key = key.scope_key();
        let _guard = self.lock_key(&scope_key).await;

        let existing = self.fetch_attendance(key).await?;
        let record = match existing {
            Some(ref current) => {
                if !actor.role.can_override() {
                    return Err(LedgerError::NotAuthorizedToOverride { role: actor.role });
                }
                self.replace_attendance(current, actor, new_status, justification.as_deref(), now)
                    .await?
            }
            None => {
                self.insert_attendance(key, actor, new_status, justification.as_deref(), now)
                    .await
                    .map_err(|e| match e {
                        DatabaseError::LibSql(ref inner) if is_unique_violation(inner) => {
                            LedgerError::Conflict {
                                scope_key: scope_key.clone(),
                            }
                        }
                        other => other.into(),
                    })?
            }
        };

        let history_id = self.db().generate_id(PREFIX_HISTORY).await?;
        let detail = StatusChangedDetail {
            from_status: existing.as_ref().map(|r| r.status),
            to_status: new_status,
            from_justification: existing.as_ref().and_then(|r| r.justification.clone()),
            to_justification: record.justification.clone(),
            override_reason: override_reason.map(String::from),
        };
        self.append_history(&HistoryEntry {
            id: history_id,
            ledger: LedgerKind::Attendance,
            scope_key: scope_key.clone(),
            action: if existing.is_some() {
                HistoryAction::StatusChanged
            } else {
                HistoryAction::Created
            },
            actor: actor.clone(),
            justification: record.justification.clone(),
            detail: Some(
                serde_json::to_value(&detail).map_err(|e| LedgerError::Other(e.into()))?,
            ),
            created_at: now,
        })
        .await?;

        tracing::debug!(
            scope_key = %scope_key,
            status = %new_status,
            actor = %actor.id,
            version = record.version,
            "attendance decision recorded"
        );
        Ok(record)
    }

    async fn get_attendance(
        &self,
        key: &AttendanceKey,
    ) -> Result<Option<AttendanceRecord>, LedgerError> {
        Ok(self.fetch_attendance(key).await?)
    }

    async fn attendance_history(
        &self,
        key: &AttendanceKey,
    ) -> Result<Vec<AttendanceHistoryEntry>, LedgerError> {
        let entries = self
            .history_for_scope(LedgerKind::Attendance, &key.scope_key())
            .await?;
        entries
            .into_iter()
            .map(AttendanceHistoryEntry::try_from)
            .collect()
    }
}

impl LedgerService {
    async fn fetch_attendance(
        &self,
        key: &AttendanceKey,
    ) -> Result<Option<AttendanceRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM attendance_records
                     WHERE course_id = ?1 AND class_id = ?2 AND session_id = ?3 AND student_id = ?4"
                ),
                libsql::params![
                    key.course_id.as_str(),
                    key.class_id.as_str(),
                    key.session_id.as_str(),
                    key.student_id.as_str()
                ],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert_attendance(
        &self,
        key: &AttendanceKey,
        actor: &Actor,
        status: AttendanceStatus,
        justification: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, DatabaseError> {
        let id = self.db().generate_id(PREFIX_ATTENDANCE).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO attendance_records ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ),
                libsql::params![
                    id.as_str(),
                    key.course_id.as_str(),
                    key.class_id.as_str(),
                    key.session_id.as_str(),
                    key.student_id.as_str(),
                    status.as_str(),
                    justification,
                    1i64,
                    actor.id.as_str(),
                    actor.role.as_str(),
                    actor.name.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(AttendanceRecord {
            id,
            course_id: key.course_id.clone(),
            class_id: key.class_id.clone(),
            session_id: key.session_id.clone(),
            student_id: key.student_id.clone(),
            status,
            justification: justification.map(String::from),
            version: 1,
            updated_by: actor.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace an existing record, compare-and-swapping on its version.
    async fn replace_attendance(
        &self,
        current: &AttendanceRecord,
        actor: &Actor,
        status: AttendanceStatus,
        justification: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, LedgerError> {
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE attendance_records
                 SET status = ?1, justification = ?2, version = version + 1,
                     updated_by_id = ?3, updated_by_role = ?4, updated_by_name = ?5,
                     updated_at = ?6
                 WHERE id = ?7 AND version = ?8",
                libsql::params![
                    status.as_str(),
                    justification,
                    actor.id.as_str(),
                    actor.role.as_str(),
                    actor.name.as_deref(),
                    now.to_rfc3339(),
                    current.id.as_str(),
                    current.version
                ],
            )
            .await
            .map_err(DatabaseError::from)?;
        if affected == 0 {
            tracing::warn!(
                record = %current.id,
                expected_version = current.version,
                "attendance version check missed; concurrent writer won the key"
            );
            return Err(LedgerError::Conflict {
                scope_key: current.key().scope_key(),
            });
        }

        Ok(AttendanceRecord {
            id: current.id.clone(),
            course_id: current.course_id.clone(),
            class_id: current.class_id.clone(),
            session_id: current.session_id.clone(),
            student_id: current.student_id.clone(),
            status,
            justification: justification.map(String::from),
            version: current.version + 1,
            updated_by: actor.clone(),
            created_at: current.created_at,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{
        admin, concluded_session, instructor, key, test_service, unconcluded_session,
    };
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_submission_creates_record() {
        let svc = test_service().await;
        let session = concluded_session();
        let now = session.concludes_at() + Duration::minutes(5);

        let record = svc
            .submit_attendance(
                &key("stu-1"),
                &session,
                &instructor(),
                AttendanceStatus::Present,
                None,
                None,
                now,
            )
            .await
            .unwrap();

        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.version, 1);
        let fetched = svc.get_attendance(&key("stu-1")).await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn submit_before_conclusion_is_rejected() {
        let svc = test_service().await;
        let session = unconcluded_session();
        let now = session.starts_at + Duration::minutes(10);

        let err = svc
            .submit_attendance(
                &key("stu-1"),
                &session,
                &instructor(),
                AttendanceStatus::Present,
                None,
                None,
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::SessionNotConcluded { .. }));
        assert!(svc.get_attendance(&key("stu-1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn absent_without_justification_is_rejected() {
        let svc = test_service().await;
        let session = concluded_session();
        let now = session.concludes_at() + Duration::minutes(5);

        let err = svc
            .submit_attendance(
                &key("stu-1"),
                &session,
                &instructor(),
                AttendanceStatus::Absent,
                Some(""),
                None,
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::MissingJustification { .. }));
        assert!(svc.get_attendance(&key("stu-1")).await.unwrap().is_none());
        assert!(svc.attendance_history(&key("stu-1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn absent_with_justification_creates_history() {
        let svc = test_service().await;
        let session = concluded_session();
        let now = session.concludes_at() + Duration::minutes(5);

        svc.submit_attendance(
            &key("stu-1"),
            &session,
            &instructor(),
            AttendanceStatus::Absent,
            Some("medical note"),
            None,
            now,
        )
        .await
        .unwrap();

        let history = svc.attendance_history(&key("stu-1")).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, HistoryAction::Created);
        assert_eq!(history[0].to_status, AttendanceStatus::Absent);
        assert_eq!(history[0].from_status, None);
        assert_eq!(history[0].to_justification.as_deref(), Some("medical note"));
    }

    #[tokio::test]
    async fn instructor_cannot_override() {
        let svc = test_service().await;
        let session = concluded_session();
        let now = session.concludes_at() + Duration::minutes(5);

        svc.submit_attendance(
            &key("stu-1"),
            &session,
            &instructor(),
            AttendanceStatus::Present,
            None,
            None,
            now,
        )
        .await
        .unwrap();

        let err = svc
            .submit_attendance(
                &key("stu-1"),
                &session,
                &instructor(),
                AttendanceStatus::Late,
                None,
                None,
                now + Duration::minutes(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotAuthorizedToOverride { .. }));

        let current = svc.get_attendance(&key("stu-1")).await.unwrap().unwrap();
        assert_eq!(current.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn admin_override_replaces_and_appends_history() {
        let svc = test_service().await;
        let session = concluded_session();
        let now = session.concludes_at() + Duration::minutes(5);

        svc.submit_attendance(
            &key("stu-1"),
            &session,
            &instructor(),
            AttendanceStatus::Present,
            None,
            None,
            now,
        )
        .await
        .unwrap();

        let record = svc
            .submit_attendance(
                &key("stu-1"),
                &session,
                &admin(),
                AttendanceStatus::Justified,
                Some("late note accepted"),
                Some("instructor entry was wrong"),
                now + Duration::minutes(2),
            )
            .await
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Justified);
        assert_eq!(record.version, 2);

        let history = svc.attendance_history(&key("stu-1")).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].action, HistoryAction::StatusChanged);
        assert_eq!(history[1].from_status, Some(AttendanceStatus::Present));
        assert_eq!(history[1].to_status, AttendanceStatus::Justified);
        assert_eq!(
            history[1].override_reason.as_deref(),
            Some("instructor entry was wrong")
        );
        assert!(history[0].created_at <= history[1].created_at);
    }
}
