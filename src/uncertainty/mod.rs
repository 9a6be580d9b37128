//! Measurement uncertainty (MU) for endotoxin results.
//!
//! # Calculators
//!
//! - [`compute_uncertainty_from_table`] — combined/expanded uncertainty and a
//!   multiplicative interval from the predetermined coefficient table
//! - [`compute_log10_uncertainty_interval`] — interval applied in log10 space
//!   for an arbitrary expanded uncertainty
//! - [`UncertaintyBudget`] — root-sum-of-squares combination of component
//!   uncertainties with a coverage factor
//!
//! # Tables
//!
//! - [`CoefficientTable`] — `(u_c,rel, U)` per dilution factor
//! - [`ExpandedUncertaintyDefaults`] — suggested `U` per dilution factor for
//!   the log10 calculator
//!
//! # References
//!
//! - JCGM 100:2008, *Guide to the Expression of Uncertainty in Measurement*.
//! - USP <85> Bacterial Endotoxins Test.

mod budget;
mod coefficients;
mod log10;
mod table;

pub use budget::{sample_concentration, CoverageFactor, UncertaintyBudget};
pub use coefficients::{
    CoefficientTable, DilutionFactor, ExpandedUncertaintyDefaults, UncertaintyCoefficient,
};
pub use log10::{compute_log10_uncertainty_interval, Log10Interval};
pub use table::{compute_uncertainty_from_table, TableUncertainty};
