//! Form adapter: reads raw field text, runs a calculator, writes the view.
//!
//! The calculators in [`limit`](crate::limit) and
//! [`uncertainty`](crate::uncertainty) are pure. This module is the boundary
//! that touches the hosting surface, through two ports:
//!
//! - [`FormInput`] — read the current text of an input field
//! - [`FormOutput`] — write the text of an output field, raise a notification
//!
//! [`Workbench`] wires the ports to the calculators. [`MemoryForm`]
//! implements both ports in memory.
//!
//! # Parsing
//!
//! Field text is read with [`parse_float`] (leading numeric prefix, NaN
//! otherwise). The log10 interval calculator reads with
//! [`parse_float_or_zero`] instead, so unreadable input becomes `0`.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::limit::{compute_endotoxin_limit, DoseUnit, EndotoxinLimit};
use crate::uncertainty::{
    compute_log10_uncertainty_interval, compute_uncertainty_from_table, CoefficientTable,
    DilutionFactor, ExpandedUncertaintyDefaults, Log10Interval, TableUncertainty,
};
use crate::view::{EndotoxinLimitView, Log10IntervalView, TableUncertaintyView};

/// Field identifiers on the hosting surface.
pub mod fields {
    /// Input: threshold pyrogenic dose K for the selected route.
    pub const ROUTE: &str = "route";
    /// Input: maximum dose M.
    pub const MAX_DOSE: &str = "maxDose";
    /// Input: unit selector for M (`mass` / `volume`).
    pub const DOSE_UNIT: &str = "doseUnit";
    /// Output: endotoxin limit result block.
    pub const EL_RESULT: &str = "result";

    /// Input: dilution factor for the coefficient table (`1X`, `10X`, `25X`).
    pub const TABLE_DILUTION: &str = "dilutionFactor";
    /// Input: measured result for the table calculator.
    pub const TABLE_RESULT: &str = "resultValue";
    /// Output: absolute combined uncertainty.
    pub const ABSOLUTE_UC: &str = "absoluteUc";
    /// Output: relative combined uncertainty (%).
    pub const RELATIVE_UC: &str = "relativeUc";
    /// Output: expanded uncertainty coefficient (log10).
    pub const EXPANDED_LOG10: &str = "expandedLog10";
    /// Output: `result ± U` report.
    pub const MU_REPORT: &str = "muReport";
    /// Output: lower interval bound.
    pub const INTERVAL_LOW: &str = "intervalLow";
    /// Output: upper interval bound.
    pub const INTERVAL_HIGH: &str = "intervalHigh";

    /// Input: dilution factor for the default uncertainty (`1`, `10`, `25`).
    pub const LOG10_DILUTION: &str = "log10Dilution";
    /// Input: measured result (EU/mL).
    pub const RESULT_EU: &str = "resultEU";
    /// Input: expanded uncertainty (log10).
    pub const EXPANDED_UNCERTAINTY: &str = "expandedUncertainty";
    /// Output: log10 of the result.
    pub const LOG10_RESULT: &str = "log10Result";
    /// Output: echoed result.
    pub const ECHO_RESULT: &str = "echoResult";
    /// Output: echoed expanded uncertainty.
    pub const ECHO_UNCERTAINTY: &str = "echoUncertainty";
    /// Output: lower MU bound.
    pub const MU_LOWER: &str = "muLower";
    /// Output: upper MU bound.
    pub const MU_UPPER: &str = "muUpper";
    /// Output: lower bound of the uncertainty interval.
    pub const UI_LOWER: &str = "uiLower";
    /// Output: upper bound of the uncertainty interval.
    pub const UI_UPPER: &str = "uiUpper";
}

/// Reads input field text from the hosting surface.
pub trait FormInput {
    /// Current text of `field`, or `None` if the field does not exist.
    fn value(&self, field: &str) -> Option<String>;
}

/// Writes output to the hosting surface.
pub trait FormOutput {
    /// Replaces the text of `field`.
    fn write(&mut self, field: &str, text: &str);

    /// Raises an interruptive notification.
    fn notify(&mut self, message: &str);
}

/// Parses the leading decimal literal of `text`.
///
/// Leading whitespace is skipped. The longest prefix of the form
/// `[+-]digits[.digits][e[+-]digits]` (or `[+-]Infinity`) is parsed and the
/// rest ignored. Returns NaN when no such prefix exists.
///
/// ```
/// use u_endotoxin::form::parse_float;
///
/// assert_eq!(parse_float(" 12.5 EU/mL"), 12.5);
/// assert_eq!(parse_float(".5"), 0.5);
/// assert_eq!(parse_float("1e3x"), 1000.0);
/// assert!(parse_float("abc").is_nan());
/// assert!(parse_float("").is_nan());
/// ```
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// [`parse_float`], with NaN replaced by `0`.
pub fn parse_float_or_zero(text: &str) -> f64 {
    let value = parse_float(text);
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// In-memory form: a flat map of field text plus the raised notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryForm {
    fields: BTreeMap<String, String>,
    notifications: Vec<String>,
}

impl MemoryForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, builder style.
    pub fn with(mut self, field: &str, text: impl Into<String>) -> Self {
        self.set(field, text);
        self
    }

    /// Sets the text of a field.
    pub fn set(&mut self, field: &str, text: impl Into<String>) {
        self.fields.insert(field.to_string(), text.into());
    }

    /// Text of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// All fields, ordered by id.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Notifications raised so far, oldest first.
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }
}

impl FormInput for MemoryForm {
    fn value(&self, field: &str) -> Option<String> {
        self.fields.get(field).cloned()
    }
}

impl FormOutput for MemoryForm {
    fn write(&mut self, field: &str, text: &str) {
        self.set(field, text);
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}

/// Binds the calculators to a form through the [`FormInput`] and
/// [`FormOutput`] ports.
///
/// Every run writes all of its output fields, so a failed run never leaves
/// an earlier result on display.
///
/// # Examples
///
/// ```
/// use u_endotoxin::form::{fields, MemoryForm, Workbench};
///
/// let mut form = MemoryForm::new()
///     .with(fields::TABLE_DILUTION, "10X")
///     .with(fields::TABLE_RESULT, "100");
///
/// Workbench::standard().on_ready(&mut form);
/// assert_eq!(form.get(fields::ABSOLUTE_UC), Some("3.0400"));
/// assert_eq!(form.get(fields::MU_REPORT), Some("100.0000 ± 6.0800"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Workbench<'a> {
    coefficients: &'a CoefficientTable,
    defaults: &'a ExpandedUncertaintyDefaults,
}

impl Workbench<'static> {
    /// A workbench over the built-in tables.
    pub fn standard() -> Self {
        Self::new(
            CoefficientTable::standard(),
            ExpandedUncertaintyDefaults::standard(),
        )
    }
}

impl<'a> Workbench<'a> {
    /// A workbench over the given tables.
    pub fn new(
        coefficients: &'a CoefficientTable,
        defaults: &'a ExpandedUncertaintyDefaults,
    ) -> Self {
        Self {
            coefficients,
            defaults,
        }
    }

    /// Runs the calculations that happen when the surface becomes ready.
    ///
    /// Only the table-based uncertainty runs at startup, using whatever
    /// values the form was pre-populated with.
    pub fn on_ready<F: FormInput + FormOutput>(&self, form: &mut F) -> Result<TableUncertainty> {
        debug!("form ready, running initial uncertainty calculation");
        self.run_table_uncertainty(form)
    }

    /// Reads K, M and the dose unit, and writes the endotoxin limit block.
    pub fn run_endotoxin_limit<F: FormInput + FormOutput>(
        &self,
        form: &mut F,
    ) -> Result<EndotoxinLimit> {
        let k = read_number(form, fields::ROUTE);
        let m = read_number(form, fields::MAX_DOSE);
        let unit = DoseUnit::from_selection(&form.value(fields::DOSE_UNIT).unwrap_or_default());

        let outcome = compute_endotoxin_limit(k, m, unit);
        match &outcome {
            Ok(limit) => debug!(k, m, el = limit.el, unit = unit.selection(), "endotoxin limit computed"),
            Err(err) => warn!(%err, "endotoxin limit rejected"),
        }

        let lines = EndotoxinLimitView::from_outcome(&outcome).lines();
        form.write(fields::EL_RESULT, &lines.join("\n"));
        outcome
    }

    /// Reads the dilution factor and result, and writes the table-based
    /// uncertainty fields.
    pub fn run_table_uncertainty<F: FormInput + FormOutput>(
        &self,
        form: &mut F,
    ) -> Result<TableUncertainty> {
        let result = read_number(form, fields::TABLE_RESULT);
        let outcome = form
            .value(fields::TABLE_DILUTION)
            .unwrap_or_default()
            .parse::<DilutionFactor>()
            .and_then(|dilution| compute_uncertainty_from_table(self.coefficients, dilution, result));
        match &outcome {
            Ok(u) => debug!(
                dilution = %u.dilution,
                result = u.result,
                absolute_uc = u.absolute_uc,
                low = u.interval_low,
                high = u.interval_high,
                "table uncertainty computed"
            ),
            Err(err) => warn!(%err, "table uncertainty rejected"),
        }

        let view = TableUncertaintyView::from_outcome(&outcome);
        form.write(fields::ABSOLUTE_UC, &view.absolute_uc);
        form.write(fields::RELATIVE_UC, &view.relative_uc);
        form.write(fields::EXPANDED_LOG10, &view.expanded_log10);
        form.write(fields::MU_REPORT, &view.report);
        form.write(fields::INTERVAL_LOW, &view.interval_low);
        form.write(fields::INTERVAL_HIGH, &view.interval_high);
        outcome
    }

    /// Reads the result and expanded uncertainty, and writes the log10
    /// interval fields. Raises a notification on invalid input.
    pub fn run_log10_interval<F: FormInput + FormOutput>(
        &self,
        form: &mut F,
    ) -> Result<Log10Interval> {
        let result_eu = parse_float_or_zero(&form.value(fields::RESULT_EU).unwrap_or_default());
        let u = parse_float_or_zero(&form.value(fields::EXPANDED_UNCERTAINTY).unwrap_or_default());

        let outcome = compute_log10_uncertainty_interval(result_eu, u);
        match &outcome {
            Ok(iv) => debug!(
                result_eu,
                u,
                mu_lower = iv.mu_lower,
                mu_upper = iv.mu_upper,
                "log10 interval computed"
            ),
            Err(err) => warn!(%err, "log10 interval rejected"),
        }

        let view = Log10IntervalView::from_outcome(&outcome);
        form.write(fields::LOG10_RESULT, &view.log10_result);
        form.write(fields::ECHO_RESULT, &view.result_eu);
        form.write(fields::ECHO_UNCERTAINTY, &view.expanded_uncertainty);
        form.write(fields::MU_LOWER, &view.mu_lower);
        form.write(fields::MU_UPPER, &view.mu_upper);
        form.write(fields::UI_LOWER, &view.interval_lower);
        form.write(fields::UI_UPPER, &view.interval_upper);
        if let Some(message) = view.notification {
            form.notify(message);
        }
        outcome
    }

    /// Pre-fills the expanded uncertainty input with the default for the
    /// selected dilution factor.
    ///
    /// Returns the value written, or `None` (field left untouched) when the
    /// selection has no default.
    pub fn suggest_expanded_uncertainty<F: FormInput + FormOutput>(
        &self,
        form: &mut F,
    ) -> Option<f64> {
        let selection = form.value(fields::LOG10_DILUTION).unwrap_or_default();
        let suggested = selection
            .parse::<DilutionFactor>()
            .ok()
            .and_then(|d| self.defaults.get(d));
        match suggested {
            Some(u) => {
                debug!(dilution = %selection, u, "default expanded uncertainty applied");
                form.write(fields::EXPANDED_UNCERTAINTY, &u.to_string());
            }
            None => warn!(dilution = %selection, "no default expanded uncertainty"),
        }
        suggested
    }
}

fn read_number<F: FormInput>(form: &F, field: &str) -> f64 {
    form.value(field).map_or(f64::NAN, |text| parse_float(&text))
}
