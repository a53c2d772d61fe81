//! Shared validation helpers used by both ledgers.
//!
//! Validation failures map 1:1 onto [`LedgerError`] variants; these helpers
//! keep the trimming and threshold rules in one place.

use crate::enums::AttendanceStatus;
use crate::errors::LedgerError;
use crate::points::GradePoints;

/// Minimum trimmed length for a grade justification.
pub const MIN_GRADE_JUSTIFICATION_LEN: usize = 3;

/// Validate the justification for an attendance submission.
///
/// Only `Absent` requires one; for other statuses the text is passed through
/// trimmed, empty becoming `None`.
///
/// # Errors
///
/// Returns [`LedgerError::MissingJustification`] when `status` is `Absent`
/// and the justification is missing or blank.
pub fn attendance_justification(
    status: AttendanceStatus,
    justification: Option<&str>,
) -> Result<Option<String>, LedgerError> {
    let trimmed = justification.map(str::trim).filter(|s| !s.is_empty());
    if status.requires_justification() && trimmed.is_none() {
        return Err(LedgerError::MissingJustification {
            reason: format!("status '{status}' requires a justification"),
        });
    }
    Ok(trimmed.map(String::from))
}

/// Validate a grade justification: trimmed length must reach the minimum.
///
/// # Errors
///
/// Returns [`LedgerError::MissingJustification`] when too short.
pub fn grade_justification(justification: &str) -> Result<String, LedgerError> {
    let trimmed = justification.trim();
    if trimmed.chars().count() < MIN_GRADE_JUSTIFICATION_LEN {
        return Err(LedgerError::MissingJustification {
            reason: format!(
                "grade justification must be at least {MIN_GRADE_JUSTIFICATION_LEN} characters"
            ),
        });
    }
    Ok(trimmed.to_string())
}

/// Validate and round a caller-supplied grade value.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidValue`] when the value is non-finite, out of
/// range, or rounds to zero or below at 2 decimal places.
pub fn grade_value(value: f64) -> Result<GradePoints, LedgerError> {
    let points = GradePoints::try_from_f64(value)?;
    if !points.is_positive() {
        return Err(LedgerError::InvalidValue {
            reason: format!("value must be positive, got {value}"),
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_requires_justification() {
        assert!(matches!(
            attendance_justification(AttendanceStatus::Absent, None),
            Err(LedgerError::MissingJustification { .. })
        ));
        assert!(matches!(
            attendance_justification(AttendanceStatus::Absent, Some("   ")),
            Err(LedgerError::MissingJustification { .. })
        ));
        let ok = attendance_justification(AttendanceStatus::Absent, Some(" medical note "));
        assert_eq!(ok.unwrap().as_deref(), Some("medical note"));
    }

    #[test]
    fn present_passes_without_justification() {
        assert_eq!(
            attendance_justification(AttendanceStatus::Present, None).unwrap(),
            None
        );
        assert_eq!(
            attendance_justification(AttendanceStatus::Present, Some("")).unwrap(),
            None
        );
    }

    #[test]
    fn grade_justification_minimum_length() {
        assert!(grade_justification("ab").is_err());
        assert!(grade_justification("  ab  ").is_err());
        assert_eq!(grade_justification(" abc ").unwrap(), "abc");
    }

    #[test]
    fn grade_value_rejects_zero_negative_and_nan() {
        assert!(grade_value(0.0).is_err());
        assert!(grade_value(-1.0).is_err());
        assert!(grade_value(0.004).is_err()); // rounds to 0.00
        assert!(grade_value(f64::NAN).is_err());
        assert_eq!(
            grade_value(2.005).unwrap(),
            GradePoints::from_hundredths(200)
        );
    }
}
