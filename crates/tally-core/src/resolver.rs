//! Pure evidence resolution.
//!
//! Turns a session descriptor plus raw telemetry into a suggested presence
//! reading and the facts behind it. Stateless, deterministic, and infallible:
//! missing telemetry and missing modality are expected inputs, modeled as
//! outcomes rather than errors. Safe to call any number of times.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ClassSession, EvidenceSnapshot};
use crate::enums::{Modality, PresenceSuggestion};

/// Named thresholds for evidence resolution.
///
/// Loaded from configuration; the defaults are the product's fixed values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EvidencePolicy {
    /// Fraction of the session duration a live viewer must have watched.
    #[serde(default = "default_live_watch_factor")]
    pub live_watch_factor: f64,
    /// Upper bound on the required live-watch minutes.
    #[serde(default = "default_live_watch_cap_minutes")]
    pub live_watch_cap_minutes: u32,
    /// Days after session end during which a login still counts as on time.
    #[serde(default = "default_login_grace_days")]
    pub login_grace_days: i64,
}

const fn default_live_watch_factor() -> f64 {
    0.7
}

const fn default_live_watch_cap_minutes() -> u32 {
    45
}

const fn default_login_grace_days() -> i64 {
    7
}

impl Default for EvidencePolicy {
    fn default() -> Self {
        Self {
            live_watch_factor: default_live_watch_factor(),
            live_watch_cap_minutes: default_live_watch_cap_minutes(),
            login_grace_days: default_login_grace_days(),
        }
    }
}

/// Diagnostic facts surfaced alongside a suggestion, for display and audit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionFacts {
    /// The session descriptor carried no modality.
    UnknownModality,
    /// On-site sessions have no automatic evidence.
    ManualEntry,
    LiveWatch {
        watched_minutes: u32,
        required_minutes: u32,
        duration_minutes: u32,
    },
    LoginWindow {
        last_login_at: Option<DateTime<Utc>>,
        window_opens_at: DateTime<Utc>,
        window_closes_at: DateTime<Utc>,
    },
}

/// Resolver output: the suggestion plus the facts that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Resolution {
    pub suggestion: PresenceSuggestion,
    pub facts: ResolutionFacts,
}

impl Resolution {
    /// Human-readable note for the indeterminate outcomes.
    #[must_use]
    pub const fn note(&self) -> Option<&'static str> {
        match self.facts {
            ResolutionFacts::UnknownModality => Some("session modality is unknown"),
            ResolutionFacts::ManualEntry => Some("manual entry required"),
            _ => None,
        }
    }
}

/// Resolve raw evidence into a suggested presence reading.
#[must_use]
pub fn resolve(
    session: &ClassSession,
    evidence: &EvidenceSnapshot,
    policy: &EvidencePolicy,
) -> Resolution {
    let Some(modality) = session.modality else {
        return Resolution {
            suggestion: PresenceSuggestion::Indeterminate,
            facts: ResolutionFacts::UnknownModality,
        };
    };

    match modality {
        Modality::OnSite => Resolution {
            suggestion: PresenceSuggestion::Indeterminate,
            facts: ResolutionFacts::ManualEntry,
        },
        Modality::Live => resolve_live(session, evidence, policy),
        Modality::Online | Modality::Hybrid => resolve_login_window(session, evidence, policy),
    }
}

fn resolve_live(
    session: &ClassSession,
    evidence: &EvidenceSnapshot,
    policy: &EvidencePolicy,
) -> Resolution {
    let watched_minutes = evidence.minutes_watched.unwrap_or(0);
    let required_minutes = required_watch_minutes(session.duration_minutes, policy);
    let suggestion = if watched_minutes >= required_minutes {
        PresenceSuggestion::Sufficient
    } else {
        PresenceSuggestion::Insufficient
    };
    Resolution {
        suggestion,
        facts: ResolutionFacts::LiveWatch {
            watched_minutes,
            required_minutes,
            duration_minutes: session.duration_minutes,
        },
    }
}

fn resolve_login_window(
    session: &ClassSession,
    evidence: &EvidenceSnapshot,
    policy: &EvidencePolicy,
) -> Resolution {
    let window_opens_at = session.concludes_at();
    let window_closes_at = window_opens_at + Duration::days(policy.login_grace_days);
    let suggestion = match evidence.last_login_at {
        Some(login) if login >= window_opens_at && login <= window_closes_at => {
            PresenceSuggestion::OnTime
        }
        Some(_) => PresenceSuggestion::Late,
        None => PresenceSuggestion::NoAccess,
    };
    Resolution {
        suggestion,
        facts: ResolutionFacts::LoginWindow {
            last_login_at: evidence.last_login_at,
            window_opens_at,
            window_closes_at,
        },
    }
}

/// `min(round(duration × factor), cap)` — preserved exactly as the product
/// defines it, including the short-session edge where the requirement rounds
/// to zero and any watch time suffices.
fn required_watch_minutes(duration_minutes: u32, policy: &EvidencePolicy) -> u32 {
    let scaled = (f64::from(duration_minutes) * policy.live_watch_factor).round();
    let capped = scaled.min(f64::from(policy.live_watch_cap_minutes)).max(0.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let capped = capped as u32;
    capped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
