use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Modality;

/// One scheduled occurrence of instruction.
///
/// Owned and mutated by the external scheduling collaborator; the engine only
/// reads it. Metadata can arrive incomplete — a missing modality makes the
/// resolver return an indeterminate suggestion rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassSession {
    pub id: String,
    pub modality: Option<Modality>,
    pub starts_at: DateTime<Utc>,
    /// Explicit end time. Derived from `starts_at + duration_minutes` when absent.
    pub ends_at: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
}

impl ClassSession {
    /// The moment the session concludes, deriving from the duration when no
    /// explicit end time was scheduled.
    #[must_use]
    pub fn concludes_at(&self) -> DateTime<Utc> {
        self.ends_at
            .unwrap_or_else(|| self.starts_at + Duration::minutes(i64::from(self.duration_minutes)))
    }

    /// Whether attendance may be entered: only once the session has concluded.
    #[must_use]
    pub fn has_concluded(&self, now: DateTime<Utc>) -> bool {
        now >= self.concludes_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(ends_at: Option<DateTime<Utc>>) -> ClassSession {
        ClassSession {
            id: "ses-1".to_string(),
            modality: Some(Modality::Live),
            starts_at: Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap(),
            ends_at,
            duration_minutes: 90,
        }
    }

    #[test]
    fn concludes_at_prefers_explicit_end() {
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 15, 45, 0).unwrap();
        assert_eq!(session(Some(end)).concludes_at(), end);
    }

    #[test]
    fn concludes_at_derives_from_duration() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap();
        assert_eq!(session(None).concludes_at(), expected);
    }

    #[test]
    fn has_concluded_is_inclusive_at_the_boundary() {
        let s = session(None);
        let end = s.concludes_at();
        assert!(s.has_concluded(end));
        assert!(s.has_concluded(end + Duration::seconds(1)));
        assert!(!s.has_concluded(end - Duration::seconds(1)));
    }
}
