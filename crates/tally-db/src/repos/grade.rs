//! Grade ledger repository.
//!
//! An ordered, append-only list of contributions per (course, class, student)
//! key, capped at 10.00 points. Capacity is always evaluated under the key's
//! write lock so two concurrent adds can never jointly breach the cap. Manual
//! contributions can be logically removed; automatic ones are immutable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tally_core::entities::{
    Actor, GradeContribution, GradeHistoryEntry, GradeKey, HistoryEntry, NewContribution,
};
use tally_core::enums::{HistoryAction, LedgerKind};
use tally_core::errors::LedgerError;
use tally_core::history_detail::GradeEventDetail;
use tally_core::ids::{PREFIX_CONTRIBUTION, PREFIX_HISTORY};
use tally_core::points::GradePoints;
use tally_core::repository::GradeRepository;
use tally_core::validate;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_actor, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::LedgerService;

const SELECT_COLS: &str = "id, course_id, class_id, student_id, value_hundredths, source, \
     source_ref, source_title, justification, manual, removed_at, \
     created_by_id, created_by_role, created_by_name, created_at";

fn row_to_contribution(row: &libsql::Row) -> Result<GradeContribution, DatabaseError> {
    Ok(GradeContribution {
        id: row.get::<String>(0)?,
        course_id: row.get::<String>(1)?,
        class_id: row.get::<String>(2)?,
        student_id: row.get::<String>(3)?,
        value: GradePoints::from_hundredths(row.get::<i64>(4)?),
        source: parse_enum(&row.get::<String>(5)?)?,
        source_ref: get_opt_string(row, 6)?,
        source_title: get_opt_string(row, 7)?,
        justification: row.get::<String>(8)?,
        manual: row.get::<i64>(9)? != 0,
        removed_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        created_by: parse_actor(row, 11)?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
    })
}

#[async_trait]
impl GradeRepository for LedgerService {
    async fn remaining_capacity(&self, key: &GradeKey) -> Result<GradePoints, LedgerError> {
        let total = self.active_total(key).await?;
        Ok(GradePoints::MAX_TOTAL.saturating_sub(total))
    }

    async fn grade_total(&self, key: &GradeKey) -> Result<GradePoints, LedgerError> {
        Ok(self.active_total(key).await?)
    }

    /// The capacity check runs under the key's write lock, against post-lock
    /// state. A rejected call never changes the total; the capacity error
    /// carries the remaining amount so the caller can re-prompt.
    async fn add_contribution(
        &self,
        key: &GradeKey,
        input: NewContribution,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<GradeContribution, LedgerError> {
        let value = validate::grade_value(input.value)?;
        let justification = validate::grade_justification(&input.justification)?;

        let scope_key = key.scope_key();
        let _guard = self.lock_key(&scope_key).await;

        let total = self.active_total(key).await?;
        let remaining = GradePoints::MAX_TOTAL.saturating_sub(total);
        if value > remaining {
            return Err(LedgerError::InsufficientCapacity {
                requested: value,
                remaining,
            });
        }

        let id = self.db().generate_id(PREFIX_CONTRIBUTION).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO grade_contributions ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
                ),
                libsql::params![
                    id.as_str(),
                    key.course_id.as_str(),
                    key.class_id.as_str(),
                    key.student_id.as_str(),
                    value.hundredths(),
                    input.source.as_str(),
                    input.source_ref.as_deref(),
                    input.source_title.as_deref(),
                    justification.as_str(),
                    i64::from(input.manual),
                    Option::<&str>::None,
                    actor.id.as_str(),
                    actor.role.as_str(),
                    actor.name.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(DatabaseError::from)?;

        let contribution = GradeContribution {
            id: id.clone(),
            course_id: key.course_id.clone(),
            class_id: key.class_id.clone(),
            student_id: key.student_id.clone(),
            value,
            source: input.source,
            source_ref: input.source_ref.clone(),
            source_title: input.source_title.clone(),
            justification: justification.clone(),
            manual: input.manual,
            removed_at: None,
            created_by: actor.clone(),
            created_at: now,
        };

        self.append_grade_event(
            &scope_key,
            HistoryAction::GradeAdded,
            &contribution,
            actor,
            now,
        )
        .await?;

        tracing::debug!(
            scope_key = %scope_key,
            contribution = %id,
            value = %value,
            source = %input.source,
            "grade contribution accepted"
        );
        Ok(contribution)
    }

    async fn remove_contribution(
        &self,
        key: &GradeKey,
        contribution_id: &str,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let scope_key = key.scope_key();
        let _guard = self.lock_key(&scope_key).await;

        let contribution = self
            .fetch_contribution(key, contribution_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound {
                what: "contribution".to_string(),
                id: contribution_id.to_string(),
            })?;
        if !contribution.is_active() {
            return Err(LedgerError::NotFound {
                what: "contribution".to_string(),
                id: contribution_id.to_string(),
            });
        }
        if !contribution.manual {
            return Err(LedgerError::NotManual {
                id: contribution_id.to_string(),
            });
        }

        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE grade_contributions SET removed_at = ?1
                 WHERE id = ?2 AND removed_at IS NULL",
                libsql::params![now.to_rfc3339(), contribution_id],
            )
            .await
            .map_err(DatabaseError::from)?;
        if affected == 0 {
            tracing::warn!(
                scope_key = %scope_key,
                contribution = %contribution_id,
                "removal raced a concurrent writer"
            );
            return Err(LedgerError::Conflict { scope_key });
        }

        self.append_grade_event(
            &scope_key,
            HistoryAction::GradeRemoved,
            &contribution,
            actor,
            now,
        )
        .await?;

        tracing::debug!(
            scope_key = %scope_key,
            contribution = %contribution_id,
            value = %contribution.value,
            "grade contribution removed"
        );
        Ok(())
    }

    async fn grade_history(&self, key: &GradeKey) -> Result<Vec<GradeHistoryEntry>, LedgerError> {
        let entries = self
            .history_for_scope(LedgerKind::Grade, &key.scope_key())
            .await?;
        entries
            .into_iter()
            .map(GradeHistoryEntry::try_from)
            .collect()
    }
}

impl LedgerService {
    /// Append the history entry for a grade event. Removal entries repeat the
    /// original value/source fields for audit continuity.
    async fn append_grade_event(
        &self,
        scope_key: &str,
        action: HistoryAction,
        contribution: &GradeContribution,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let history_id = self.db().generate_id(PREFIX_HISTORY).await?;
        let detail = GradeEventDetail {
            contribution_id: contribution.id.clone(),
            value: contribution.value,
            source: contribution.source,
            source_ref: contribution.source_ref.clone(),
            source_title: contribution.source_title.clone(),
        };
        self.append_history(&HistoryEntry {
            id: history_id,
            ledger: LedgerKind::Grade,
            scope_key: scope_key.to_string(),
            action,
            actor: actor.clone(),
            justification: Some(contribution.justification.clone()),
            detail: Some(
                serde_json::to_value(&detail).map_err(|e| LedgerError::Other(e.into()))?,
            ),
            created_at: now,
        })
        .await?;
        Ok(())
    }

    async fn active_total(&self, key: &GradeKey) -> Result<GradePoints, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(SUM(value_hundredths), 0) FROM grade_contributions
                 WHERE course_id = ?1 AND class_id = ?2 AND student_id = ?3
                   AND removed_at IS NULL",
                libsql::params![
                    key.course_id.as_str(),
                    key.class_id.as_str(),
                    key.student_id.as_str()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(GradePoints::from_hundredths(row.get::<i64>(0)?))
    }

    async fn fetch_contribution(
        &self,
        key: &GradeKey,
        contribution_id: &str,
    ) -> Result<Option<GradeContribution>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM grade_contributions
                     WHERE id = ?1 AND course_id = ?2 AND class_id = ?3 AND student_id = ?4"
                ),
                libsql::params![
                    contribution_id,
                    key.course_id.as_str(),
                    key.class_id.as_str(),
                    key.student_id.as_str()
                ],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_contribution(&row)?)),
            None => Ok(None),
        }
    }
}
