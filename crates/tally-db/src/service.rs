//! Service layer orchestrating ledger mutations with history.
//!
//! `LedgerService` wraps `TallyDb` (raw database access) and the per-key
//! write locks. All repository methods are implemented as `impl LedgerService`
//! blocks in `repos/`.
//!
//! Every mutation method follows this protocol:
//! 1. Validate pure preconditions (time gate, justification, value)
//! 2. Acquire the key's write lock
//! 3. Read current state
//! 4. Validate stateful preconditions against the post-lock state
//! 5. Execute SQL
//! 6. Append a history entry
//!
//! Reads skip steps 2-4 and query directly.

use tokio::sync::OwnedMutexGuard;

use crate::TallyDb;
use crate::error::DatabaseError;
use crate::keylock::KeyLocks;

/// Orchestrates ledger mutations with per-key serialization and history.
pub struct LedgerService {
    db: TallyDb,
    locks: KeyLocks,
}

impl LedgerService {
    /// Create a new service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrations
    /// fail.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = TallyDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `TallyDb`.
    #[must_use]
    pub fn from_db(db: TallyDb) -> Self {
        Self {
            db,
            locks: KeyLocks::new(),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TallyDb {
        &self.db
    }

    /// Acquire the write lock for a scope key.
    pub(crate) async fn lock_key(&self, scope_key: &str) -> OwnedMutexGuard<()> {
        self.locks.acquire(scope_key).await
    }
}
