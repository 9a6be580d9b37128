//! Combined and expanded uncertainty from the coefficient table.
//!
//! # Algorithm
//!
//! For a measured result `x` and the coefficients `(u_c,rel, U)` of the
//! selected dilution factor:
//!
//! ```text
//! u_c      = u_c,rel * x
//! U_abs    = U * x
//! k        = 10^U
//! interval = [x / k, x * k]
//! ```
//!
//! The interval is multiplicative, so `low * high = x^2`.

use super::coefficients::{CoefficientTable, DilutionFactor, UncertaintyCoefficient};
use crate::error::{require_positive, Result};

/// Uncertainty of one result, computed from the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableUncertainty {
    /// Dilution factor used for the lookup.
    pub dilution: DilutionFactor,
    /// Measured result (EU/mL).
    pub result: f64,
    /// Coefficients that were applied.
    pub coefficient: UncertaintyCoefficient,
    /// Absolute combined standard uncertainty, `u_c,rel * result`.
    pub absolute_uc: f64,
    /// Absolute expanded uncertainty, `U * result`.
    pub absolute_u: f64,
    /// Multiplicative interval factor, `10^U`.
    pub log_term: f64,
    /// Lower bound, `result / 10^U`.
    pub interval_low: f64,
    /// Upper bound, `result * 10^U`.
    pub interval_high: f64,
}

impl TableUncertainty {
    /// Relative combined uncertainty in percent.
    pub fn relative_combined_percent(&self) -> f64 {
        self.coefficient.combined_relative() * 100.0
    }
}

/// Computes combined/expanded uncertainty and the interval for `result`.
///
/// # Errors
///
/// `InvalidInput` if `result` is NaN, infinite or `<= 0`, or if `dilution`
/// has no entry in `table`.
///
/// # Examples
///
/// ```
/// use u_endotoxin::uncertainty::{compute_uncertainty_from_table, CoefficientTable, DilutionFactor};
///
/// let table = CoefficientTable::standard();
/// let u = compute_uncertainty_from_table(table, DilutionFactor::X10, 100.0).unwrap();
/// assert!((u.absolute_uc - 3.04).abs() < 1e-9);
/// assert!((u.interval_low * u.interval_high - 100.0 * 100.0).abs() < 1e-6);
/// ```
pub fn compute_uncertainty_from_table(
    table: &CoefficientTable,
    dilution: DilutionFactor,
    result: f64,
) -> Result<TableUncertainty> {
    let result = require_positive("result", result)?;
    let coefficient = *table.lookup(dilution)?;

    let absolute_uc = coefficient.combined_relative() * result;
    let absolute_u = coefficient.expanded_log10() * result;
    let log_term = 10f64.powf(coefficient.expanded_log10());

    Ok(TableUncertainty {
        dilution,
        result,
        coefficient,
        absolute_uc,
        absolute_u,
        log_term,
        interval_low: result / log_term,
        interval_high: result * log_term,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidReason;

    fn standard(dilution: DilutionFactor, result: f64) -> Result<TableUncertainty> {
        compute_uncertainty_from_table(CoefficientTable::standard(), dilution, result)
    }

    /// 10X, result = 100:
    /// u_c = 0.0304 * 100 = 3.04, U_abs = 6.08, k = 10^0.0608 = 1.150271
    #[test]
    fn test_10x_scenario() {
        let u = standard(DilutionFactor::X10, 100.0).unwrap();
        assert!((u.absolute_uc - 3.04).abs() < 1e-9);
        assert!((u.absolute_u - 6.08).abs() < 1e-9);
        assert!((u.log_term - 1.150_270_5).abs() < 1e-6, "k = {}", u.log_term);
        assert!((u.interval_low - 86.936_069).abs() < 1e-5, "low = {}", u.interval_low);
        assert!((u.interval_high - 115.027_055).abs() < 1e-5, "high = {}", u.interval_high);
        assert!((u.relative_combined_percent() - 3.04).abs() < 1e-12);
    }

    #[test]
    fn test_1x_and_25x() {
        let u = standard(DilutionFactor::X1, 100.0).unwrap();
        assert!((u.interval_low - 87.297_137).abs() < 1e-5);
        assert!((u.interval_high - 114.551_294).abs() < 1e-5);

        let u = standard(DilutionFactor::X25, 100.0).unwrap();
        assert!((u.interval_low - 87.942_741).abs() < 1e-5);
        assert!((u.interval_high - 113.710_351).abs() < 1e-5);
    }

    #[test]
    fn test_coefficient_echoed() {
        let u = standard(DilutionFactor::X25, 1.0).unwrap();
        assert_eq!(u.coefficient.expanded_log10(), 0.0558);
        assert_eq!(u.dilution, DilutionFactor::X25);
    }

    #[test]
    fn test_rejects_non_positive_result() {
        for r in [0.0, -1.0] {
            let err = standard(DilutionFactor::X1, r).unwrap_err();
            assert_eq!(err.field(), "result");
            assert_eq!(err.reason(), &InvalidReason::NotPositive);
        }
    }

    #[test]
    fn test_rejects_nan_result() {
        let err = standard(DilutionFactor::X1, f64::NAN).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::NotANumber);
    }

    #[test]
    fn test_rejects_unknown_dilution() {
        let err = standard(DilutionFactor::new(100).unwrap(), 10.0).unwrap_err();
        assert_eq!(err.field(), "dilution");
        assert_eq!(err.reason(), &InvalidReason::UnknownKey("100X".into()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dilution() -> impl Strategy<Value = DilutionFactor> {
        prop_oneof![
            Just(DilutionFactor::X1),
            Just(DilutionFactor::X10),
            Just(DilutionFactor::X25),
        ]
    }

    proptest! {
        #[test]
        fn interval_is_multiplicatively_symmetric(d in dilution(), result in 1e-3_f64..1e4) {
            let u = compute_uncertainty_from_table(CoefficientTable::standard(), d, result).unwrap();
            let product = u.interval_low * u.interval_high;
            let expected = result * result;
            prop_assert!(
                ((product - expected) / expected).abs() < 1e-12,
                "low*high = {product}, result^2 = {expected}"
            );
        }

        #[test]
        fn interval_brackets_result(d in dilution(), result in 1e-3_f64..1e4) {
            let u = compute_uncertainty_from_table(CoefficientTable::standard(), d, result).unwrap();
            prop_assert!(u.interval_low < result && result < u.interval_high);
        }

        #[test]
        fn non_positive_result_rejected(d in dilution(), result in -1e4_f64..=0.0) {
            prop_assert!(compute_uncertainty_from_table(CoefficientTable::standard(), d, result).is_err());
        }
    }
}
