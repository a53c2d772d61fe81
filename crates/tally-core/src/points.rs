//! Fixed-point grade arithmetic.
//!
//! Grade values are stored and compared at 2-decimal precision. Floating-point
//! sums drift, and the 10.00 cap must hold exactly, so [`GradePoints`] keeps an
//! integer count of hundredths internally. `f64` only appears at the edges:
//! parsing caller input and serializing JSON.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::LedgerError;

/// Values larger than this never appear in a grade ledger; anything beyond it
/// is treated as caller input corruption rather than rounded.
const MAX_ABS_HUNDREDTHS: i64 = 1_000_000;

/// A grade amount in hundredths of a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GradePoints(i64);

impl GradePoints {
    pub const ZERO: Self = Self(0);

    /// The cap on a student's total for one grade ledger key: 10.00 points.
    pub const MAX_TOTAL: Self = Self(1000);

    /// Build from a raw hundredths count (the SQL storage representation).
    #[must_use]
    pub const fn from_hundredths(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw hundredths count (the SQL storage representation).
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Parse caller-supplied `f64` input, rounding to 2 decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidValue`] if the value is NaN, infinite, or
    /// implausibly large.
    pub fn try_from_f64(value: f64) -> Result<Self, LedgerError> {
        if !value.is_finite() {
            return Err(LedgerError::InvalidValue {
                reason: format!("value must be finite, got {value}"),
            });
        }
        let hundredths = (value * 100.0).round();
        if hundredths.abs() > MAX_ABS_HUNDREDTHS as f64 {
            return Err(LedgerError::InvalidValue {
                reason: format!("value {value} is out of range"),
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        let hundredths = hundredths as i64;
        Ok(Self(hundredths))
    }

    /// The closest `f64` reading of the value, for JSON output.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Subtraction floored at zero, for remaining-capacity math.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        let diff = self.0 - rhs.0;
        if diff < 0 { Self(0) } else { Self(diff) }
    }
}

impl Add for GradePoints {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for GradePoints {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for GradePoints {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for GradePoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for GradePoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for GradePoints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::try_from_f64(value).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for GradePoints {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("GradePoints")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        f64::json_schema(generator)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(GradePoints::try_from_f64(1.005).unwrap().hundredths(), 100);
        assert_eq!(GradePoints::try_from_f64(1.006).unwrap().hundredths(), 101);
        assert_eq!(GradePoints::try_from_f64(8.5).unwrap().hundredths(), 850);
        assert_eq!(GradePoints::try_from_f64(0.004).unwrap().hundredths(), 0);
    }

    #[test]
    fn rejects_non_finite() {
        assert!(GradePoints::try_from_f64(f64::NAN).is_err());
        assert!(GradePoints::try_from_f64(f64::INFINITY).is_err());
        assert!(GradePoints::try_from_f64(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(GradePoints::try_from_f64(1.0e12).is_err());
    }

    #[test]
    fn sum_is_exact_where_floats_drift() {
        // 0.10 added ten times is exactly 1.00 in hundredths.
        let tenth = GradePoints::try_from_f64(0.1).unwrap();
        let mut total = GradePoints::ZERO;
        for _ in 0..10 {
            total += tenth;
        }
        assert_eq!(total, GradePoints::from_hundredths(100));
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let a = GradePoints::from_hundredths(150);
        let b = GradePoints::from_hundredths(200);
        assert_eq!(a.saturating_sub(b), GradePoints::ZERO);
        assert_eq!(b.saturating_sub(a), GradePoints::from_hundredths(50));
    }

    #[test]
    fn display_two_decimals() {
        assert_eq!(GradePoints::from_hundredths(1000).to_string(), "10.00");
        assert_eq!(GradePoints::from_hundredths(150).to_string(), "1.50");
        assert_eq!(GradePoints::from_hundredths(5).to_string(), "0.05");
        assert_eq!(GradePoints::from_hundredths(-25).to_string(), "-0.25");
    }

    #[test]
    fn json_roundtrip() {
        let value = GradePoints::from_hundredths(850);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "8.5");
        let back: GradePoints = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
