//! Calculation error type.
//!
//! Every calculator in this crate fails with exactly one kind of error,
//! [`CalcError::InvalidInput`]. The variant records which input was rejected
//! and why, so the presentation layer can pick the right marker.

use std::fmt;

use thiserror::Error;

/// Why an input value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The value could not be read as a number.
    NotANumber,
    /// The value is infinite.
    NotFinite,
    /// The value must be strictly positive (or non-negative, where noted).
    NotPositive,
    /// A lookup key has no entry in the coefficient table.
    UnknownKey(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "not a number"),
            Self::NotFinite => write!(f, "not finite"),
            Self::NotPositive => write!(f, "must be positive"),
            Self::UnknownKey(key) => write!(f, "unrecognized key '{key}'"),
        }
    }
}

/// Calculation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput {
        /// Name of the rejected input.
        field: &'static str,
        /// Why it was rejected.
        reason: InvalidReason,
    },
}

impl CalcError {
    pub(crate) fn invalid(field: &'static str, reason: InvalidReason) -> Self {
        Self::InvalidInput { field, reason }
    }

    /// Name of the rejected input.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }

    /// Reason the input was rejected.
    pub fn reason(&self) -> &InvalidReason {
        match self {
            Self::InvalidInput { reason, .. } => reason,
        }
    }
}

/// Result type for calculations.
pub type Result<T> = std::result::Result<T, CalcError>;

/// Checks that `value` is finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid(field, InvalidReason::NotPositive));
    }
    Ok(value)
}

/// Checks that `value` is a finite number.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() {
        return Err(CalcError::invalid(field, InvalidReason::NotANumber));
    }
    if value.is_infinite() {
        return Err(CalcError::invalid(field, InvalidReason::NotFinite));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_error_display() {
        let err = CalcError::invalid("m", InvalidReason::NotPositive);
        assert_eq!(format!("{err}"), "invalid input for m: must be positive");

        let err = CalcError::invalid("dilution", InvalidReason::UnknownKey("5X".into()));
        assert!(format!("{err}").contains("unrecognized key '5X'"));
    }

    #[test]
    fn test_accessors() {
        let err = CalcError::invalid("k", InvalidReason::NotANumber);
        assert_eq!(err.field(), "k");
        assert_eq!(err.reason(), &InvalidReason::NotANumber);
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("x", 2.0), Ok(2.0));
        assert_eq!(
            require_positive("x", 0.0).unwrap_err().reason(),
            &InvalidReason::NotPositive
        );
        assert_eq!(
            require_positive("x", -1.0).unwrap_err().reason(),
            &InvalidReason::NotPositive
        );
        assert_eq!(
            require_positive("x", f64::NAN).unwrap_err().reason(),
            &InvalidReason::NotANumber
        );
        assert_eq!(
            require_positive("x", f64::INFINITY).unwrap_err().reason(),
            &InvalidReason::NotFinite
        );
    }

    #[test]
    fn test_require_finite_allows_negative() {
        assert_eq!(require_finite("k", -3.5), Ok(-3.5));
        assert!(require_finite("k", f64::NEG_INFINITY).is_err());
    }
}
