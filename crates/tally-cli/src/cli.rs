//! Command-line interface definition.
//!
//! Every engine operation maps to one subcommand. Timestamps are RFC 3339;
//! enums accept their snake_case names. Output is JSON on stdout, logs go to
//! stderr.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use tally_core::enums::{ActorRole, AttendanceStatus, GradeSource, Modality};

#[derive(Debug, Parser)]
#[command(name = "tally", about = "Attendance evidence & grade ledger engine", version)]
pub struct Cli {
    /// Path to the ledger database (overrides configuration).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Only log errors.
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Suggest a presence status from raw evidence (pure, no database).
    Resolve(ResolveArgs),
    /// Attendance ledger operations.
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },
    /// Grade ledger operations.
    Grade {
        #[command(subcommand)]
        action: GradeAction,
    },
}

// ---------------------------------------------------------------------------
// Shared argument groups
// ---------------------------------------------------------------------------

/// Session time bounds, as the scheduling service describes them.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session id.
    #[arg(long = "session")]
    pub session_id: String,

    /// Session modality (on_site, live, online, hybrid). Omit if unknown.
    #[arg(long, value_parser = parse_modality)]
    pub modality: Option<Modality>,

    /// Session start (RFC 3339).
    #[arg(long, value_parser = parse_datetime)]
    pub starts_at: DateTime<Utc>,

    /// Explicit session end (RFC 3339); derived from duration when omitted.
    #[arg(long, value_parser = parse_datetime)]
    pub ends_at: Option<DateTime<Utc>>,

    /// Session duration in minutes.
    #[arg(long, default_value_t = 0)]
    pub duration_minutes: u32,
}

impl SessionArgs {
    #[must_use]
    pub fn to_session(&self) -> tally_core::entities::ClassSession {
        tally_core::entities::ClassSession {
            id: self.session_id.clone(),
            modality: self.modality,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            duration_minutes: self.duration_minutes,
        }
    }
}

/// The actor performing a write, as the auth service describes them.
#[derive(Debug, Args)]
pub struct ActorArgs {
    #[arg(long = "actor")]
    pub actor_id: String,

    /// Actor role (admin, moderator, pedagogical, instructor).
    #[arg(long, value_parser = parse_role)]
    pub role: ActorRole,

    #[arg(long = "actor-name")]
    pub actor_name: Option<String>,
}

impl ActorArgs {
    #[must_use]
    pub fn to_actor(&self) -> tally_core::entities::Actor {
        tally_core::entities::Actor {
            id: self.actor_id.clone(),
            role: self.role,
            name: self.actor_name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Last login timestamp (RFC 3339), if telemetry has one.
    #[arg(long, value_parser = parse_datetime)]
    pub last_login: Option<DateTime<Utc>>,

    /// Minutes of live stream watched, if telemetry has it.
    #[arg(long)]
    pub minutes_watched: Option<u32>,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct AttendanceKeyArgs {
    #[arg(long)]
    pub course: String,
    #[arg(long)]
    pub class: String,
    #[arg(long = "session")]
    pub session_id: String,
    #[arg(long)]
    pub student: String,
}

impl AttendanceKeyArgs {
    #[must_use]
    pub fn to_key(&self) -> tally_core::entities::AttendanceKey {
        tally_core::entities::AttendanceKey {
            course_id: self.course.clone(),
            class_id: self.class.clone(),
            session_id: self.session_id.clone(),
            student_id: self.student.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum AttendanceAction {
    /// Record or override the attendance decision for a student.
    Submit(AttendanceSubmitArgs),
    /// Show the current record for a student.
    Show(AttendanceShowArgs),
    /// Show the full transition history for a student, oldest first.
    History(AttendanceHistoryArgs),
}

#[derive(Debug, Args)]
pub struct AttendanceSubmitArgs {
    #[command(flatten)]
    pub key: AttendanceKeyArgs,

    /// Session time bounds; submissions before the session end are rejected.
    #[command(flatten)]
    pub session: AttendanceSessionArgs,

    #[command(flatten)]
    pub actor: ActorArgs,

    /// New status (present, absent, justified, late).
    #[arg(long, value_parser = parse_status)]
    pub status: AttendanceStatus,

    /// Justification text; required when status is absent.
    #[arg(long)]
    pub justification: Option<String>,

    /// Reason for overriding an existing record.
    #[arg(long)]
    pub override_reason: Option<String>,
}

/// Session time bounds for submit. Unlike [`SessionArgs`] the id comes from
/// the attendance key, so only the time fields appear here.
#[derive(Debug, Args)]
pub struct AttendanceSessionArgs {
    /// Session start (RFC 3339).
    #[arg(long, value_parser = parse_datetime)]
    pub starts_at: DateTime<Utc>,

    /// Explicit session end (RFC 3339); derived from duration when omitted.
    #[arg(long, value_parser = parse_datetime)]
    pub ends_at: Option<DateTime<Utc>>,

    /// Session duration in minutes.
    #[arg(long, default_value_t = 0)]
    pub duration_minutes: u32,
}

#[derive(Debug, Args)]
pub struct AttendanceShowArgs {
    #[command(flatten)]
    pub key: AttendanceKeyArgs,
}

#[derive(Debug, Args)]
pub struct AttendanceHistoryArgs {
    #[command(flatten)]
    pub key: AttendanceKeyArgs,

    /// Maximum entries to print (defaults to the configured history limit).
    #[arg(long)]
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct GradeKeyArgs {
    #[arg(long)]
    pub course: String,
    #[arg(long)]
    pub class: String,
    #[arg(long)]
    pub student: String,
}

impl GradeKeyArgs {
    #[must_use]
    pub fn to_key(&self) -> tally_core::entities::GradeKey {
        tally_core::entities::GradeKey {
            course_id: self.course.clone(),
            class_id: self.class.clone(),
            student_id: self.student.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum GradeAction {
    /// Add a grade contribution.
    Add(GradeAddArgs),
    /// Remove a manual grade contribution.
    Remove(GradeRemoveArgs),
    /// Show the current total and remaining capacity.
    Total(GradeTotalArgs),
    /// Show the full grade event history, oldest first.
    History(GradeHistoryArgs),
}

#[derive(Debug, Args)]
pub struct GradeAddArgs {
    #[command(flatten)]
    pub key: GradeKeyArgs,

    #[command(flatten)]
    pub actor: ActorArgs,

    /// Contribution value in points, rounded to 2 decimals.
    #[arg(long)]
    pub value: f64,

    /// Source kind (exam, assignment, lesson, other).
    #[arg(long, value_parser = parse_source)]
    pub source: GradeSource,

    /// External id of the graded item.
    #[arg(long)]
    pub source_ref: Option<String>,

    /// Title of the graded item.
    #[arg(long)]
    pub source_title: Option<String>,

    /// Justification text (at least 3 characters).
    #[arg(long)]
    pub justification: String,

    /// Mark the contribution as manual (removable later).
    #[arg(long)]
    pub manual: bool,
}

#[derive(Debug, Args)]
pub struct GradeRemoveArgs {
    #[command(flatten)]
    pub key: GradeKeyArgs,

    #[command(flatten)]
    pub actor: ActorArgs,

    /// Id of the contribution to remove.
    #[arg(long)]
    pub contribution: String,
}

#[derive(Debug, Args)]
pub struct GradeTotalArgs {
    #[command(flatten)]
    pub key: GradeKeyArgs,
}

#[derive(Debug, Args)]
pub struct GradeHistoryArgs {
    #[command(flatten)]
    pub key: GradeKeyArgs,

    /// Maximum entries to print (defaults to the configured history limit).
    #[arg(long)]
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

fn parse_snake_case_enum<T: serde::de::DeserializeOwned>(s: &str, options: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("expected one of: {options}"))
}

fn parse_modality(s: &str) -> Result<Modality, String> {
    parse_snake_case_enum(s, "on_site, live, online, hybrid")
}

fn parse_status(s: &str) -> Result<AttendanceStatus, String> {
    parse_snake_case_enum(s, "present, absent, justified, late")
}

fn parse_role(s: &str) -> Result<ActorRole, String> {
    parse_snake_case_enum(s, "admin, moderator, pedagogical, instructor")
}

fn parse_source(s: &str) -> Result<GradeSource, String> {
    parse_snake_case_enum(s, "exam, assignment, lesson, other")
}
