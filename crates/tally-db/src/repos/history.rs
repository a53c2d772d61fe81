//! History log repository.
//!
//! Shared append-only log both ledgers write to. Entries record every
//! accepted state transition with actor, timestamp, and a typed detail
//! payload; they are never updated or deleted. Ordering is oldest-first,
//! with the rowid as tiebreak so same-timestamp entries keep insertion order.

use tally_core::entities::HistoryEntry;
use tally_core::enums::{HistoryAction, LedgerKind};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_actor, parse_datetime, parse_enum, parse_optional_json};
use crate::service::LedgerService;

const SELECT_COLS: &str =
    "id, ledger, scope_key, action, actor_id, actor_role, actor_name, justification, detail, created_at";

/// Filter criteria for history queries.
#[derive(Debug, Default)]
pub struct HistoryFilter {
    pub ledger: Option<LedgerKind>,
    pub scope_key: Option<String>,
    pub action: Option<HistoryAction>,
    pub limit: Option<u32>,
}

fn row_to_entry(row: &libsql::Row) -> Result<HistoryEntry, DatabaseError> {
    Ok(HistoryEntry {
        id: row.get::<String>(0)?,
        ledger: parse_enum(&row.get::<String>(1)?)?,
        scope_key: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        actor: parse_actor(row, 4)?,
        justification: get_opt_string(row, 7)?,
        detail: parse_optional_json(get_opt_string(row, 8)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl LedgerService {
    /// Append a history entry. Called by every mutation method after its
    /// state write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub(crate) async fn append_history(&self, entry: &HistoryEntry) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO history_log ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                libsql::params![
                    entry.id.as_str(),
                    entry.ledger.as_str(),
                    entry.scope_key.as_str(),
                    entry.action.as_str(),
                    entry.actor.id.as_str(),
                    entry.actor.role.as_str(),
                    entry.actor.name.as_deref(),
                    entry.justification.as_deref(),
                    entry
                        .detail
                        .as_ref()
                        .map(std::string::ToString::to_string)
                        .as_deref(),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Query history entries with optional filters, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<HistoryEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ledger) = filter.ledger {
            params.push(libsql::Value::Text(ledger.as_str().to_string()));
            conditions.push(format!("ledger = ?{}", params.len()));
        }
        if let Some(ref scope) = filter.scope_key {
            params.push(libsql::Value::Text(scope.clone()));
            conditions.push(format!("scope_key = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit_clause = filter
            .limit
            .map(|limit| format!("LIMIT {limit}"))
            .unwrap_or_default();

        let sql = format!(
            "SELECT {SELECT_COLS} FROM history_log {where_clause}
             ORDER BY created_at ASC, rowid ASC {limit_clause}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// All history for one scope key, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub(crate) async fn history_for_scope(
        &self,
        ledger: LedgerKind,
        scope_key: &str,
    ) -> Result<Vec<HistoryEntry>, DatabaseError> {
        self.query_history(&HistoryFilter {
            ledger: Some(ledger),
            scope_key: Some(scope_key.to_string()),
            action: None,
            limit: None,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use chrono::{Duration, TimeZone, Utc};
    use tally_core::entities::Actor;
    use tally_core::enums::ActorRole;

    fn entry(id: &str, scope: &str, at_offset_secs: i64) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            ledger: LedgerKind::Attendance,
            scope_key: scope.to_string(),
            action: HistoryAction::Created,
            actor: Actor::new("usr-1", ActorRole::Instructor),
            justification: None,
            detail: Some(serde_json::json!({"to_status": "present"})),
            created_at: Utc.with_ymd_and_hms(2026, 3, 2, 16, 0, 0).unwrap()
                + Duration::seconds(at_offset_secs),
        }
    }

    #[tokio::test]
    async fn append_and_query_oldest_first() {
        let svc = test_service().await;
        svc.append_history(&entry("hst-2", "att:a", 10)).await.unwrap();
        svc.append_history(&entry("hst-1", "att:a", 0)).await.unwrap();
        svc.append_history(&entry("hst-3", "att:b", 5)).await.unwrap();

        let all = svc.query_history(&HistoryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "hst-1");
        assert_eq!(all[1].id, "hst-3");
        assert_eq!(all[2].id, "hst-2");

        let scoped = svc
            .history_for_scope(LedgerKind::Attendance, "att:a")
            .await
            .unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(scoped[0].created_at <= scoped[1].created_at);
    }

    #[tokio::test]
    async fn same_timestamp_keeps_insertion_order() {
        let svc = test_service().await;
        svc.append_history(&entry("hst-a", "att:a", 0)).await.unwrap();
        svc.append_history(&entry("hst-b", "att:a", 0)).await.unwrap();

        let scoped = svc
            .history_for_scope(LedgerKind::Attendance, "att:a")
            .await
            .unwrap();
        assert_eq!(scoped[0].id, "hst-a");
        assert_eq!(scoped[1].id, "hst-b");
    }

    #[tokio::test]
    async fn filter_by_action() {
        let svc = test_service().await;
        svc.append_history(&entry("hst-1", "att:a", 0)).await.unwrap();

        let none = svc
            .query_history(&HistoryFilter {
                action: Some(HistoryAction::GradeAdded),
                ..HistoryFilter::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
