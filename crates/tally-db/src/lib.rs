//! # tally-db
//!
//! libSQL persistence for the Tally ledger engine.
//!
//! Handles all ledger-owned state: attendance records, grade contributions,
//! and the shared append-only history log. Sessions, rosters, and telemetry
//! belong to external collaborators and are never stored here.
//!
//! Uses the `libsql` crate (C `SQLite` fork) — stable API, embedded local
//! databases, `:memory:` for tests.

pub mod error;
pub mod helpers;
mod keylock;
mod migrations;
pub mod repos;
pub mod service;

mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Tally ledger state.
///
/// Wraps a libSQL database and connection. Provides ID generation; all
/// repository methods live on [`service::LedgerService`].
pub struct TallyDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TallyDb {
    /// Open a local-only database at the given path (`:memory:` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let tally_db = Self { db, conn };
        tally_db.run_migrations().await?;
        Ok(tally_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"att-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> TallyDb {
        TallyDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = ["attendance_records", "grade_contributions", "history_log"];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_has_prefix_and_varies() {
        let db = test_db().await;
        let mut seen = HashSet::new();
        for _ in 0..16 {
            let id = db.generate_id("att").await.unwrap();
            assert!(id.starts_with("att-"), "id '{id}' should start with prefix");
            assert_eq!(id.len(), 4 + 8);
            seen.insert(id);
        }
        assert!(seen.len() > 1, "ids should not all collide");
    }
}
