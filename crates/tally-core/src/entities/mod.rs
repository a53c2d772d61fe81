//! Entity structs for all Tally domain objects.
//!
//! Ledger-owned entities (`AttendanceRecord`, `GradeContribution`,
//! `HistoryEntry`) map to tables in the libSQL database. `ClassSession` and
//! `EvidenceSnapshot` are read-only inputs owned by external collaborators and
//! are never persisted here. All structs derive `Serialize`, `Deserialize`,
//! and `JsonSchema` for JSON roundtrip.

mod actor;
mod attendance;
mod evidence;
mod grade;
mod history;
mod session;

pub use actor::Actor;
pub use attendance::{AttendanceKey, AttendanceRecord};
pub use evidence::EvidenceSnapshot;
pub use grade::{GradeContribution, GradeKey, NewContribution};
pub use history::{AttendanceHistoryEntry, GradeHistoryEntry, HistoryEntry};
pub use session::ClassSession;
