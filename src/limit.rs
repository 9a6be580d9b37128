//! Endotoxin limit (EL).
//!
//! The endotoxin limit is the maximum permissible endotoxin concentration
//! in a product:
//!
//! ```text
//! EL = K / M
//! ```
//!
//! where K is the threshold pyrogenic dose for the route of administration
//! (EU/kg/hr) and M is the maximum recommended dose per kg body weight per
//! hour. The unit of M decides the unit of the limit (EU/mg, EU/Unit or
//! EU/mL).
//!
//! # Reference
//!
//! USP <85> Bacterial Endotoxins Test; FDA (2012), *Guidance for Industry:
//! Pyrogen and Endotoxins Testing*.

use crate::error::{require_finite, require_positive, Result};

/// Unit in which the maximum dose M is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoseUnit {
    /// Dose by mass or activity (mg/kg/hr or Unit/kg/hr).
    Mass,
    /// Dose by volume (mL/kg/hr).
    Volume,
    /// Any other selection. Produces an empty unit label.
    #[default]
    Unspecified,
}

impl DoseUnit {
    /// Maps a unit selector value to a [`DoseUnit`].
    ///
    /// Only the exact values `"mass"` and `"volume"` are recognized; every
    /// other value is [`DoseUnit::Unspecified`], which is not an error.
    ///
    /// ```
    /// use u_endotoxin::limit::DoseUnit;
    ///
    /// assert_eq!(DoseUnit::from_selection("mass"), DoseUnit::Mass);
    /// assert_eq!(DoseUnit::from_selection("volume"), DoseUnit::Volume);
    /// assert_eq!(DoseUnit::from_selection("Mass"), DoseUnit::Unspecified);
    /// ```
    pub fn from_selection(selection: &str) -> Self {
        match selection {
            "mass" => Self::Mass,
            "volume" => Self::Volume,
            _ => Self::Unspecified,
        }
    }

    /// Selector value for this unit (`""` for [`DoseUnit::Unspecified`]).
    pub fn selection(self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::Volume => "volume",
            Self::Unspecified => "",
        }
    }

    /// Unit label used for the endotoxin limit, e.g. `EU / mg or Unit`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mass => "mg or Unit",
            Self::Volume => "mL",
            Self::Unspecified => "",
        }
    }

    /// Unit label used for the per-kg dose line.
    ///
    /// This is [`label`](Self::label) with the literal `" or Unit"` removed,
    /// so a mass dose reads `mg/kg/hr` while the limit still reads
    /// `EU / mg or Unit`.
    pub fn dose_label(self) -> String {
        self.label().replacen(" or Unit", "", 1)
    }
}

/// Computed endotoxin limit.
#[derive(Debug, Clone, PartialEq)]
pub struct EndotoxinLimit {
    /// Threshold pyrogenic dose K (EU/kg/hr).
    pub k: f64,
    /// Maximum dose M per kg per hour.
    pub m: f64,
    /// Endotoxin limit EL = K / M.
    pub el: f64,
    /// Unit of M.
    pub unit: DoseUnit,
}

impl EndotoxinLimit {
    /// Unit label of the limit (unstripped).
    pub fn unit_label(&self) -> &'static str {
        self.unit.label()
    }
}

/// Computes the endotoxin limit `EL = K / M`.
///
/// `k` may be any finite number. `m` must be finite and strictly positive.
///
/// # Errors
///
/// [`CalcError::InvalidInput`](crate::CalcError::InvalidInput) if `k` or `m`
/// is NaN or infinite, or if `m <= 0`.
///
/// # Examples
///
/// ```
/// use u_endotoxin::limit::{compute_endotoxin_limit, DoseUnit};
///
/// let limit = compute_endotoxin_limit(5.0, 0.2, DoseUnit::Mass).unwrap();
/// assert!((limit.el - 25.0).abs() < 1e-12);
/// assert_eq!(limit.unit_label(), "mg or Unit");
///
/// assert!(compute_endotoxin_limit(5.0, 0.0, DoseUnit::Mass).is_err());
/// ```
pub fn compute_endotoxin_limit(k: f64, m: f64, unit: DoseUnit) -> Result<EndotoxinLimit> {
    let k = require_finite("k", k)?;
    let m = require_positive("m", m)?;
    Ok(EndotoxinLimit {
        k,
        m,
        el: k / m,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidReason;

    #[test]
    fn test_el_basic() {
        let limit = compute_endotoxin_limit(5.0, 0.2, DoseUnit::Mass).unwrap();
        assert!((limit.el - 25.0).abs() < 1e-9, "el = {}", limit.el);
        assert_eq!(limit.k, 5.0);
        assert_eq!(limit.m, 0.2);
    }

    #[test]
    fn test_el_intrathecal_route() {
        // Intrathecal K = 0.2 EU/kg/hr, M = 0.01 mL/kg/hr -> 20 EU/mL
        let limit = compute_endotoxin_limit(0.2, 0.01, DoseUnit::Volume).unwrap();
        assert!((limit.el - 20.0).abs() < 1e-9);
        assert_eq!(limit.unit_label(), "mL");
    }

    #[test]
    fn test_el_negative_k_allowed() {
        let limit = compute_endotoxin_limit(-5.0, 2.0, DoseUnit::Mass).unwrap();
        assert!((limit.el + 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_el_rejects_non_positive_m() {
        for m in [0.0, -0.2, -100.0] {
            let err = compute_endotoxin_limit(5.0, m, DoseUnit::Mass).unwrap_err();
            assert_eq!(err.field(), "m");
            assert_eq!(err.reason(), &InvalidReason::NotPositive);
        }
    }

    #[test]
    fn test_el_rejects_nan() {
        let err = compute_endotoxin_limit(f64::NAN, 0.2, DoseUnit::Mass).unwrap_err();
        assert_eq!(err.field(), "k");
        assert_eq!(err.reason(), &InvalidReason::NotANumber);

        let err = compute_endotoxin_limit(5.0, f64::NAN, DoseUnit::Mass).unwrap_err();
        assert_eq!(err.field(), "m");
    }

    #[test]
    fn test_el_rejects_infinite() {
        assert!(compute_endotoxin_limit(f64::INFINITY, 1.0, DoseUnit::Mass).is_err());
        assert!(compute_endotoxin_limit(1.0, f64::INFINITY, DoseUnit::Mass).is_err());
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(DoseUnit::Mass.label(), "mg or Unit");
        assert_eq!(DoseUnit::Volume.label(), "mL");
        assert_eq!(DoseUnit::Unspecified.label(), "");
    }

    #[test]
    fn test_dose_label_strips_or_unit() {
        assert_eq!(DoseUnit::Mass.dose_label(), "mg");
        assert_eq!(DoseUnit::Volume.dose_label(), "mL");
        assert_eq!(DoseUnit::Unspecified.dose_label(), "");
    }

    #[test]
    fn test_from_selection() {
        assert_eq!(DoseUnit::from_selection("mass"), DoseUnit::Mass);
        assert_eq!(DoseUnit::from_selection("volume"), DoseUnit::Volume);
        assert_eq!(DoseUnit::from_selection(""), DoseUnit::Unspecified);
        assert_eq!(DoseUnit::from_selection("weight"), DoseUnit::Unspecified);
        for unit in [DoseUnit::Mass, DoseUnit::Volume, DoseUnit::Unspecified] {
            assert_eq!(DoseUnit::from_selection(unit.selection()), unit);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn el_is_k_over_m(k in -1e4_f64..1e4, m in 1e-4_f64..1e4) {
            let limit = compute_endotoxin_limit(k, m, DoseUnit::Volume).unwrap();
            prop_assert!((limit.el - k / m).abs() < 1e-9, "el = {}", limit.el);
        }

        #[test]
        fn non_positive_m_rejected(k in -1e4_f64..1e4, m in -1e4_f64..=0.0) {
            prop_assert!(compute_endotoxin_limit(k, m, DoseUnit::Mass).is_err());
        }
    }
}
