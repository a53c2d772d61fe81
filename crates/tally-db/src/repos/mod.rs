//! Repository methods on [`crate::service::LedgerService`].
//!
//! One module per ledger: attendance decisions, grade contributions, and the
//! shared history log both of them append to.

pub mod attendance;
pub mod grade;
pub mod history;
