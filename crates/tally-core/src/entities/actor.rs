use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ActorRole;

/// The authenticated identity performing a ledger write.
///
/// Produced by the surrounding application's auth layer; the engine trusts
/// the role value it is given and records it verbatim in history entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
    pub name: Option<String>,
}

impl Actor {
    #[must_use]
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id: id.into(),
            role,
            name: None,
        }
    }
}
