//! # u-endotoxin
//!
//! Endotoxin limits and measurement uncertainty for bacterial endotoxin
//! (LAL) assay results.
//!
//! The calculators are pure functions over `f64` inputs. They validate their
//! inputs and return a typed result or [`CalcError::InvalidInput`]; they do
//! not format or display anything.
//!
//! ## Modules
//!
//! - [`limit`] — Endotoxin limit EL = K / M with dose-unit labels
//! - [`uncertainty`] — Table-based combined/expanded uncertainty, log10
//!   uncertainty interval, root-sum-of-squares uncertainty budget
//! - [`format`] — Fixed-decimal rendering of numbers
//! - [`view`] — Display fields for each calculator, including invalid markers
//! - [`form`] — Adapter between a form surface and the calculators
//! - [`config`] — Pre-populated form values loaded from TOML
//!
//! ## Quick start
//!
//! ```
//! use u_endotoxin::limit::{compute_endotoxin_limit, DoseUnit};
//! use u_endotoxin::uncertainty::{
//!     compute_log10_uncertainty_interval, compute_uncertainty_from_table, CoefficientTable,
//!     DilutionFactor,
//! };
//!
//! let el = compute_endotoxin_limit(5.0, 0.2, DoseUnit::Volume).unwrap();
//! assert!((el.el - 25.0).abs() < 1e-9);
//!
//! let u = compute_uncertainty_from_table(CoefficientTable::standard(), DilutionFactor::X10, 100.0)
//!     .unwrap();
//! assert!((u.absolute_uc - 3.04).abs() < 1e-9);
//!
//! let iv = compute_log10_uncertainty_interval(50.0, 0.058971).unwrap();
//! assert!(iv.mu_lower < 50.0 && 50.0 < iv.mu_upper);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Pure core**: calculators take numbers and return values; reading and
//!   writing fields lives in [`form`]
//! - **Immutable tables**: coefficient tables are built once and passed by
//!   reference
//! - **Explicit failure**: invalid input always replaces the displayed result
//!   with a marker, never a stale or NaN value

pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod limit;
pub mod uncertainty;
pub mod view;

pub use error::{CalcError, InvalidReason};
