//! Measurement-uncertainty interval in log10 space.
//!
//! # Algorithm
//!
//! Endotoxin results are approximately log-normal, so the expanded
//! uncertainty `U` is applied symmetrically to `log10(x)`:
//!
//! ```text
//! L       = log10(x)
//! MU_low  = 10^(L - U)
//! MU_high = 10^(L + U)
//! ```
//!
//! `U` is usually taken from [`ExpandedUncertaintyDefaults`] for the
//! sample's dilution factor, but any positive value is accepted.
//!
//! [`ExpandedUncertaintyDefaults`]: super::ExpandedUncertaintyDefaults

use crate::error::{require_positive, Result};

/// Log10 uncertainty interval around one result.
#[derive(Debug, Clone, PartialEq)]
pub struct Log10Interval {
    /// Measured result (EU/mL).
    pub result_eu: f64,
    /// Expanded uncertainty in log10 units.
    pub expanded_uncertainty_log10: f64,
    /// `log10(result_eu)`.
    pub log10_result: f64,
    /// `log10_result - U`.
    pub lower_log10: f64,
    /// `log10_result + U`.
    pub upper_log10: f64,
    /// `10^lower_log10`.
    pub mu_lower: f64,
    /// `10^upper_log10`.
    pub mu_upper: f64,
}

impl Log10Interval {
    /// The uncertainty interval `(mu_lower, mu_upper)`.
    pub fn uncertainty_interval(&self) -> (f64, f64) {
        (self.mu_lower, self.mu_upper)
    }
}

/// Computes the log10 uncertainty interval for `result_eu`.
///
/// A NaN input is treated as 0 before validation, so unreadable input fails
/// the same way as a zero result.
///
/// # Errors
///
/// `InvalidInput` unless both inputs are finite and strictly positive.
///
/// # Examples
///
/// ```
/// use u_endotoxin::uncertainty::compute_log10_uncertainty_interval;
///
/// let iv = compute_log10_uncertainty_interval(50.0, 0.058971).unwrap();
/// assert!((iv.log10_result - 1.69897).abs() < 1e-5);
/// assert!(iv.mu_lower < 50.0 && 50.0 < iv.mu_upper);
///
/// assert!(compute_log10_uncertainty_interval(-1.0, 0.058971).is_err());
/// ```
pub fn compute_log10_uncertainty_interval(
    result_eu: f64,
    expanded_uncertainty_log10: f64,
) -> Result<Log10Interval> {
    let result_eu = require_positive("result_eu", zero_if_nan(result_eu))?;
    let u = require_positive(
        "expanded_uncertainty_log10",
        zero_if_nan(expanded_uncertainty_log10),
    )?;

    let log10_result = result_eu.log10();
    let lower_log10 = log10_result - u;
    let upper_log10 = log10_result + u;

    Ok(Log10Interval {
        result_eu,
        expanded_uncertainty_log10: u,
        log10_result,
        lower_log10,
        upper_log10,
        mu_lower: 10f64.powf(lower_log10),
        mu_upper: 10f64.powf(upper_log10),
    })
}

fn zero_if_nan(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidReason;

    /// result = 50, U = 0.058971
    /// log10(50) = 1.698970, MU = [10^1.639999, 10^1.757941] = [43.651, 57.272]
    #[test]
    fn test_scenario_50_eu() {
        let iv = compute_log10_uncertainty_interval(50.0, 0.058971).unwrap();
        assert!((iv.log10_result - 1.698_970_004).abs() < 1e-8);
        assert!((iv.mu_lower - 43.651_483).abs() < 1e-5, "lower = {}", iv.mu_lower);
        assert!((iv.mu_upper - 57.271_823).abs() < 1e-5, "upper = {}", iv.mu_upper);
        assert_eq!(iv.uncertainty_interval(), (iv.mu_lower, iv.mu_upper));
    }

    #[test]
    fn test_log_bounds() {
        let iv = compute_log10_uncertainty_interval(100.0, 0.06).unwrap();
        assert!((iv.log10_result - 2.0).abs() < 1e-12);
        assert!((iv.lower_log10 - 1.94).abs() < 1e-12);
        assert!((iv.upper_log10 - 2.06).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_negative_result() {
        let err = compute_log10_uncertainty_interval(-1.0, 0.058971).unwrap_err();
        assert_eq!(err.field(), "result_eu");
        assert_eq!(err.reason(), &InvalidReason::NotPositive);
    }

    #[test]
    fn test_rejects_zero_uncertainty() {
        let err = compute_log10_uncertainty_interval(50.0, 0.0).unwrap_err();
        assert_eq!(err.field(), "expanded_uncertainty_log10");
    }

    #[test]
    fn test_nan_is_coerced_to_zero() {
        let err = compute_log10_uncertainty_interval(f64::NAN, 0.05).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::NotPositive);

        let err = compute_log10_uncertainty_interval(50.0, f64::NAN).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::NotPositive);
    }

    #[test]
    fn test_rejects_infinite() {
        let err = compute_log10_uncertainty_interval(f64::INFINITY, 0.05).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::NotFinite);
    }
}
