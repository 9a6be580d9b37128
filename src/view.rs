//! Text views of calculation results.
//!
//! Each calculator has a view holding exactly the strings shown in its
//! output fields. Views are built from the calculation outcome, valid or
//! not, so every field always has fresh content.
//!
//! | Calculator | Valid | Invalid |
//! |------------|-------|---------|
//! | Endotoxin limit | four result lines | one error line |
//! | Table uncertainty | formatted values | `Invalid Result` in the report, `N/A` elsewhere |
//! | Log10 interval | formatted values | `ERR` everywhere, plus a notification |

use crate::error::Result;
use crate::format::{to_fixed, to_percent};
use crate::limit::EndotoxinLimit;
use crate::uncertainty::{Log10Interval, TableUncertainty};

/// Error line shown in place of the endotoxin limit.
pub const EL_ERROR_MESSAGE: &str = "**Error:** Please enter valid, positive numbers for the Dose (M).";

/// Marker for the primary table-uncertainty field on invalid input.
pub const INVALID_RESULT: &str = "Invalid Result";

/// Marker for dependent table-uncertainty fields on invalid input.
pub const NOT_AVAILABLE: &str = "N/A";

/// Marker for every log10-interval field on invalid input.
pub const ERR: &str = "ERR";

/// Notification raised when the log10 interval cannot be computed.
pub const LOG10_ERROR_MESSAGE: &str =
    "Please enter a valid positive Result (EU/mL) and Expanded Uncertainty (log10).";

/// Display of the endotoxin limit calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndotoxinLimitView {
    /// A computed limit.
    Computed {
        /// K to 2 decimals.
        k: String,
        /// M to 4 decimals.
        m: String,
        /// EL to 4 decimals.
        el: String,
        /// Unit of M with `" or Unit"` stripped.
        dose_label: String,
        /// Unit of EL, unstripped.
        unit_label: &'static str,
    },
    /// Input was rejected.
    Invalid,
}

impl EndotoxinLimitView {
    /// Builds the view from a calculation outcome.
    pub fn from_outcome(outcome: &Result<EndotoxinLimit>) -> Self {
        match outcome {
            Ok(limit) => Self::Computed {
                k: to_fixed(limit.k, 2),
                m: to_fixed(limit.m, 4),
                el: to_fixed(limit.el, 4),
                dose_label: limit.unit.dose_label(),
                unit_label: limit.unit_label(),
            },
            Err(_) => Self::Invalid,
        }
    }

    /// Lines of the result block.
    ///
    /// ```
    /// use u_endotoxin::limit::{compute_endotoxin_limit, DoseUnit};
    /// use u_endotoxin::view::EndotoxinLimitView;
    ///
    /// let view = EndotoxinLimitView::from_outcome(&compute_endotoxin_limit(5.0, 0.2, DoseUnit::Mass));
    /// let lines = view.lines();
    /// assert_eq!(lines[1], "M Value (Max Dose/kg/hr): 0.2000 mg/kg/hr");
    /// assert_eq!(lines[2], "Endotoxin Limit (EL): 25.0000 EU / mg or Unit");
    /// ```
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Computed {
                k,
                m,
                el,
                dose_label,
                unit_label,
            } => vec![
                format!("K Value (Threshold Pyrogenic Dose): {k} EU/kg/hr"),
                format!("M Value (Max Dose/kg/hr): {m} {dose_label}/kg/hr"),
                format!("Endotoxin Limit (EL): {el} EU / {unit_label}"),
                format!(
                    "This means your product cannot exceed {el} Endotoxin Units per {unit_label} of product."
                ),
            ],
            Self::Invalid => vec![EL_ERROR_MESSAGE.to_string()],
        }
    }
}

/// Display of the table-based uncertainty calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableUncertaintyView {
    /// Absolute combined uncertainty, 4 decimals.
    pub absolute_uc: String,
    /// Relative combined uncertainty in percent, 2 decimals and `%`.
    pub relative_uc: String,
    /// Stored expanded uncertainty coefficient, 4 decimals.
    pub expanded_log10: String,
    /// `"{result} ± {U}"`, 4 decimals each.
    pub report: String,
    /// Lower interval bound, 4 decimals.
    pub interval_low: String,
    /// Upper interval bound, 4 decimals.
    pub interval_high: String,
}

impl TableUncertaintyView {
    /// Builds the view from a calculation outcome.
    pub fn from_outcome(outcome: &Result<TableUncertainty>) -> Self {
        match outcome {
            Ok(u) => Self {
                absolute_uc: to_fixed(u.absolute_uc, 4),
                relative_uc: to_percent(u.coefficient.combined_relative(), 2),
                expanded_log10: to_fixed(u.coefficient.expanded_log10(), 4),
                report: format!("{} ± {}", to_fixed(u.result, 4), to_fixed(u.absolute_u, 4)),
                interval_low: to_fixed(u.interval_low, 4),
                interval_high: to_fixed(u.interval_high, 4),
            },
            Err(_) => Self::invalid(),
        }
    }

    /// View shown when the result cannot be computed.
    pub fn invalid() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            absolute_uc: na(),
            relative_uc: na(),
            expanded_log10: na(),
            report: INVALID_RESULT.to_string(),
            interval_low: na(),
            interval_high: na(),
        }
    }

    /// Whether this is the invalid view.
    pub fn is_invalid(&self) -> bool {
        self.report == INVALID_RESULT
    }
}

/// Display of the log10 uncertainty interval calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log10IntervalView {
    /// `log10(result)`, 4 decimals.
    pub log10_result: String,
    /// Echoed result, 1 decimal.
    pub result_eu: String,
    /// Echoed expanded uncertainty, 4 decimals.
    pub expanded_uncertainty: String,
    /// Lower MU bound, 3 decimals.
    pub mu_lower: String,
    /// Upper MU bound, 3 decimals.
    pub mu_upper: String,
    /// Lower bound of the uncertainty interval (same text as `mu_lower`).
    pub interval_lower: String,
    /// Upper bound of the uncertainty interval (same text as `mu_upper`).
    pub interval_upper: String,
    /// Notification to raise, if any.
    pub notification: Option<&'static str>,
}

impl Log10IntervalView {
    /// Builds the view from a calculation outcome.
    ///
    /// ```
    /// use u_endotoxin::uncertainty::compute_log10_uncertainty_interval;
    /// use u_endotoxin::view::{Log10IntervalView, ERR};
    ///
    /// let view = Log10IntervalView::from_outcome(&compute_log10_uncertainty_interval(-1.0, 0.05));
    /// assert_eq!(view.mu_lower, ERR);
    /// assert!(view.notification.is_some());
    /// ```
    pub fn from_outcome(outcome: &Result<Log10Interval>) -> Self {
        match outcome {
            Ok(iv) => {
                let (low, high) = iv.uncertainty_interval();
                Self {
                    log10_result: to_fixed(iv.log10_result, 4),
                    result_eu: to_fixed(iv.result_eu, 1),
                    expanded_uncertainty: to_fixed(iv.expanded_uncertainty_log10, 4),
                    mu_lower: to_fixed(iv.mu_lower, 3),
                    mu_upper: to_fixed(iv.mu_upper, 3),
                    interval_lower: to_fixed(low, 3),
                    interval_upper: to_fixed(high, 3),
                    notification: None,
                }
            }
            Err(_) => Self::invalid(),
        }
    }

    /// View shown when the interval cannot be computed.
    pub fn invalid() -> Self {
        let err = || ERR.to_string();
        Self {
            log10_result: err(),
            result_eu: err(),
            expanded_uncertainty: err(),
            mu_lower: err(),
            mu_upper: err(),
            interval_lower: err(),
            interval_upper: err(),
            notification: Some(LOG10_ERROR_MESSAGE),
        }
    }
}
