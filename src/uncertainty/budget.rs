//! Uncertainty budget for a diluted LAL sample.
//!
//! The reported concentration of a sample is
//!
//! ```text
//! C = reading * dilution / potency
//! ```
//!
//! Its relative combined standard uncertainty is the root sum of squares of
//! the relative component uncertainties:
//!
//! ```text
//! u_c,rel = sqrt(u_reading,rel^2 + u_dilution,rel^2 + u_potency,rel^2)
//! ```
//!
//! and the expanded uncertainty is `U = k * u_c` for a coverage factor `k`
//! (k = 2 for approximately 95% confidence).
//!
//! # Reference
//!
//! JCGM 100:2008, *Guide to the Expression of Uncertainty in Measurement*,
//! sections 5.1 and 6.2.

use crate::error::{require_finite, require_positive, CalcError, InvalidReason, Result};

/// Coverage factor `k` applied to a combined standard uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageFactor(f64);

impl CoverageFactor {
    /// k = 2, approximately 95% coverage.
    pub const NINETY_FIVE: Self = Self(2.0);

    /// Creates a coverage factor. Returns `None` unless `k` is finite and
    /// positive.
    pub fn new(k: f64) -> Option<Self> {
        (k.is_finite() && k > 0.0).then_some(Self(k))
    }

    /// The multiplier `k`.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for CoverageFactor {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

/// Relative standard uncertainties of the three inputs to `C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyBudget {
    reading: f64,
    dilution: f64,
    potency: f64,
}

impl UncertaintyBudget {
    /// Creates a budget from relative component uncertainties (fractions).
    ///
    /// # Errors
    ///
    /// `InvalidInput` if any component is NaN, infinite or negative. A zero
    /// component is allowed (a negligible contribution).
    ///
    /// # Examples
    ///
    /// ```
    /// use u_endotoxin::uncertainty::{CoverageFactor, UncertaintyBudget};
    ///
    /// let budget = UncertaintyBudget::new(0.03, 0.004, 0.0).unwrap();
    /// let uc = budget.relative_combined();
    /// assert!((uc - (0.03f64.powi(2) + 0.004f64.powi(2)).sqrt()).abs() < 1e-15);
    /// assert!((budget.expanded(CoverageFactor::default()) - 2.0 * uc).abs() < 1e-15);
    /// ```
    pub fn new(reading: f64, dilution: f64, potency: f64) -> Result<Self> {
        Ok(Self {
            reading: require_non_negative("reading", reading)?,
            dilution: require_non_negative("dilution", dilution)?,
            potency: require_non_negative("potency", potency)?,
        })
    }

    /// Relative uncertainty of the instrument reading.
    pub fn reading(&self) -> f64 {
        self.reading
    }

    /// Relative uncertainty of the dilution step.
    pub fn dilution(&self) -> f64 {
        self.dilution
    }

    /// Relative uncertainty of the potency (or standard) value.
    pub fn potency(&self) -> f64 {
        self.potency
    }

    /// Relative combined standard uncertainty (root sum of squares).
    pub fn relative_combined(&self) -> f64 {
        (self.reading.powi(2) + self.dilution.powi(2) + self.potency.powi(2)).sqrt()
    }

    /// Relative expanded uncertainty `k * u_c,rel`.
    pub fn expanded(&self, coverage: CoverageFactor) -> f64 {
        coverage.value() * self.relative_combined()
    }

    /// Absolute expanded uncertainty for a concentration.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `concentration` is not finite.
    pub fn absolute_expanded(&self, concentration: f64, coverage: CoverageFactor) -> Result<f64> {
        let c = require_finite("concentration", concentration)?;
        Ok(c.abs() * self.expanded(coverage))
    }
}

/// Concentration of the undiluted sample, `reading * dilution / potency`.
///
/// # Errors
///
/// `InvalidInput` if `reading` is not finite, or if `dilution` or `potency`
/// is not finite and strictly positive.
///
/// # Examples
///
/// ```
/// use u_endotoxin::uncertainty::sample_concentration;
///
/// let c = sample_concentration(0.25, 10.0, 1.0).unwrap();
/// assert!((c - 2.5).abs() < 1e-12);
/// ```
pub fn sample_concentration(reading: f64, dilution: f64, potency: f64) -> Result<f64> {
    let reading = require_finite("reading", reading)?;
    let dilution = require_positive("dilution", dilution)?;
    let potency = require_positive("potency", potency)?;
    Ok(reading * dilution / potency)
}

fn require_non_negative(field: &'static str, value: f64) -> Result<f64> {
    let value = require_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid(field, InvalidReason::NotPositive));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rss_three_four_twelve() {
        // sqrt(0.03^2 + 0.04^2 + 0.12^2) = 0.13
        let budget = UncertaintyBudget::new(0.03, 0.04, 0.12).unwrap();
        assert!((budget.relative_combined() - 0.13).abs() < 1e-12);
        assert!((budget.expanded(CoverageFactor::NINETY_FIVE) - 0.26).abs() < 1e-12);
    }

    #[test]
    fn test_single_component_passthrough() {
        let budget = UncertaintyBudget::new(0.0295, 0.0, 0.0).unwrap();
        assert!((budget.relative_combined() - 0.0295).abs() < 1e-15);
        assert!((budget.expanded(CoverageFactor::default()) - 0.059).abs() < 1e-12);
    }

    #[test]
    fn test_absolute_expanded() {
        let budget = UncertaintyBudget::new(0.03, 0.04, 0.0).unwrap();
        let k3 = CoverageFactor::new(3.0).unwrap();
        let u = budget.absolute_expanded(10.0, k3).unwrap();
        assert!((u - 1.5).abs() < 1e-12, "U = {u}");
        assert!(budget.absolute_expanded(f64::NAN, k3).is_err());
    }

    #[test]
    fn test_budget_rejects_negative_component() {
        let err = UncertaintyBudget::new(0.03, -0.01, 0.0).unwrap_err();
        assert_eq!(err.field(), "dilution");
        assert!(UncertaintyBudget::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(UncertaintyBudget::new(0.0, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coverage_factor() {
        assert_eq!(CoverageFactor::default().value(), 2.0);
        assert!(CoverageFactor::new(0.0).is_none());
        assert!(CoverageFactor::new(-2.0).is_none());
        assert!(CoverageFactor::new(f64::NAN).is_none());
    }

    #[test]
    fn test_sample_concentration() {
        let c = sample_concentration(0.5, 25.0, 2.0).unwrap();
        assert!((c - 6.25).abs() < 1e-12);
        assert!(sample_concentration(0.5, 0.0, 1.0).is_err());
        assert!(sample_concentration(0.5, 10.0, -1.0).is_err());
        assert!(sample_concentration(f64::NAN, 10.0, 1.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn combined_dominates_each_component(
            a in 0.0_f64..0.5, b in 0.0_f64..0.5, c in 0.0_f64..0.5
        ) {
            let budget = UncertaintyBudget::new(a, b, c).unwrap();
            let uc = budget.relative_combined();
            prop_assert!(uc >= a.max(b).max(c) - 1e-15);
            prop_assert!(uc <= a + b + c + 1e-15);
        }
    }
}
