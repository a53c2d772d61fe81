//! Shared test utilities for tally-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{TimeZone, Utc};

    use tally_core::entities::{Actor, AttendanceKey, ClassSession, GradeKey};
    use tally_core::enums::{ActorRole, Modality};

    use crate::TallyDb;
    use crate::service::LedgerService;

    /// Create an in-memory service for pure DB tests.
    pub async fn test_service() -> LedgerService {
        let db = TallyDb::open_local(":memory:").await.unwrap();
        LedgerService::from_db(db)
    }

    pub fn instructor() -> Actor {
        Actor::new("usr-instructor", ActorRole::Instructor)
    }

    pub fn admin() -> Actor {
        Actor {
            id: "usr-admin".to_string(),
            role: ActorRole::Admin,
            name: Some("Site Admin".to_string()),
        }
    }

    /// A 60-minute on-site session that started well in the past.
    pub fn concluded_session() -> ClassSession {
        ClassSession {
            id: "ses-1".to_string(),
            modality: Some(Modality::OnSite),
            starts_at: Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap(),
            ends_at: None,
            duration_minutes: 60,
        }
    }

    /// Same session, but used with a `now` inside its time bounds.
    pub fn unconcluded_session() -> ClassSession {
        concluded_session()
    }

    pub fn key(student_id: &str) -> AttendanceKey {
        AttendanceKey {
            course_id: "crs-1".to_string(),
            class_id: "cls-1".to_string(),
            session_id: "ses-1".to_string(),
            student_id: student_id.to_string(),
        }
    }

    pub fn grade_key(student_id: &str) -> GradeKey {
        GradeKey {
            course_id: "crs-1".to_string(),
            class_id: "cls-1".to_string(),
            student_id: student_id.to_string(),
        }
    }
}
