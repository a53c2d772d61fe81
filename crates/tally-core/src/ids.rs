//! ID prefix constants.
//!
//! Every ledger-owned row gets an id of the form `<prefix>-<8 hex chars>`,
//! generated in SQL by `TallyDb::generate_id`.

pub const PREFIX_ATTENDANCE: &str = "att";
pub const PREFIX_CONTRIBUTION: &str = "ctb";
pub const PREFIX_HISTORY: &str = "hst";
