//! Dilution factors and the predetermined uncertainty coefficient tables.
//!
//! Two tables are kept here. They come from different data snapshots and
//! are deliberately not unified:
//!
//! | Dilution | u_c,rel | U (log10) | default U for log10 interval |
//! |----------|---------|-----------|------------------------------|
//! | 1X       | 0.0295  | 0.0590    | 0.058971                     |
//! | 10X      | 0.0304  | 0.0608    | 0.060709                     |
//! | 25X      | 0.0279  | 0.0558    | 0.055825                     |
//!
//! Both tables are built once on first use and never mutated.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{require_positive, CalcError, InvalidReason, Result};

static STANDARD_COEFFICIENTS: LazyLock<CoefficientTable> = LazyLock::new(|| CoefficientTable {
    entries: BTreeMap::from([
        (
            DilutionFactor::X1,
            UncertaintyCoefficient::from_constants(0.0295, 0.0590),
        ),
        (
            DilutionFactor::X10,
            UncertaintyCoefficient::from_constants(0.0304, 0.0608),
        ),
        (
            DilutionFactor::X25,
            UncertaintyCoefficient::from_constants(0.0279, 0.0558),
        ),
    ]),
});

static STANDARD_DEFAULTS: LazyLock<ExpandedUncertaintyDefaults> =
    LazyLock::new(|| ExpandedUncertaintyDefaults {
        entries: BTreeMap::from([
            (DilutionFactor::X1, 0.058971),
            (DilutionFactor::X10, 0.060709),
            (DilutionFactor::X25, 0.055825),
        ]),
    });

/// Sample dilution factor, e.g. `10X`.
///
/// Parses from `"10X"`, `"10x"` or `"10"`. The factor must be a positive
/// integer.
///
/// ```
/// use u_endotoxin::uncertainty::DilutionFactor;
///
/// let d: DilutionFactor = "25X".parse().unwrap();
/// assert_eq!(d, DilutionFactor::X25);
/// assert_eq!(d.to_string(), "25X");
/// assert_eq!(d.bare_label(), "25");
/// assert!("0X".parse::<DilutionFactor>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DilutionFactor(u32);

impl DilutionFactor {
    /// Undiluted sample.
    pub const X1: Self = Self(1);
    /// Ten-fold dilution.
    pub const X10: Self = Self(10);
    /// Twenty-five-fold dilution.
    pub const X25: Self = Self(25);

    /// Creates a dilution factor. Returns `None` for zero.
    pub fn new(factor: u32) -> Option<Self> {
        (factor > 0).then_some(Self(factor))
    }

    /// The multiplier.
    pub fn factor(self) -> u32 {
        self.0
    }

    /// Label without the `X` suffix, as used by the log10 default table.
    pub fn bare_label(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for DilutionFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}X", self.0)
    }
}

impl FromStr for DilutionFactor {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix(['X', 'x'])
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CalcError::invalid("dilution", InvalidReason::UnknownKey(s.to_string())))
    }
}

/// Predetermined uncertainty coefficients for one dilution factor.
///
/// # Invariants
///
/// - Both values are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyCoefficient {
    combined_relative: f64,
    expanded_log10: f64,
}

impl UncertaintyCoefficient {
    /// Creates a coefficient record.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if either value is not finite or not strictly positive.
    pub fn new(combined_relative: f64, expanded_log10: f64) -> Result<Self> {
        Ok(Self {
            combined_relative: require_positive("combined_relative", combined_relative)?,
            expanded_log10: require_positive("expanded_log10", expanded_log10)?,
        })
    }

    const fn from_constants(combined_relative: f64, expanded_log10: f64) -> Self {
        Self {
            combined_relative,
            expanded_log10,
        }
    }

    /// Relative combined standard uncertainty u_c,rel (fraction).
    pub fn combined_relative(&self) -> f64 {
        self.combined_relative
    }

    /// Expanded uncertainty in log10 units (fraction).
    pub fn expanded_log10(&self) -> f64 {
        self.expanded_log10
    }
}

/// Immutable map from dilution factor to uncertainty coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    entries: BTreeMap<DilutionFactor, UncertaintyCoefficient>,
}

impl CoefficientTable {
    /// The built-in coefficient table (1X, 10X, 25X).
    ///
    /// ```
    /// use u_endotoxin::uncertainty::{CoefficientTable, DilutionFactor};
    ///
    /// let c = CoefficientTable::standard().get(DilutionFactor::X10).unwrap();
    /// assert_eq!(c.combined_relative(), 0.0304);
    /// assert_eq!(c.expanded_log10(), 0.0608);
    /// ```
    pub fn standard() -> &'static Self {
        &STANDARD_COEFFICIENTS
    }

    /// Builds a table from explicit entries. Later duplicates win.
    pub fn new(entries: impl IntoIterator<Item = (DilutionFactor, UncertaintyCoefficient)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Looks up the coefficients for `dilution`.
    pub fn get(&self, dilution: DilutionFactor) -> Option<&UncertaintyCoefficient> {
        self.entries.get(&dilution)
    }

    /// Like [`get`](Self::get), but an unknown key is an `InvalidInput` error.
    pub fn lookup(&self, dilution: DilutionFactor) -> Result<&UncertaintyCoefficient> {
        self.get(dilution).ok_or_else(|| {
            CalcError::invalid("dilution", InvalidReason::UnknownKey(dilution.to_string()))
        })
    }

    /// Dilution factors present in the table, ascending.
    pub fn dilutions(&self) -> impl Iterator<Item = DilutionFactor> + '_ {
        self.entries.keys().copied()
    }
}

/// Immutable map from dilution factor to a suggested default expanded
/// uncertainty (log10) for the log10 interval calculator.
///
/// The values only pre-fill the uncertainty input; the interval calculation
/// never reads this table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedUncertaintyDefaults {
    entries: BTreeMap<DilutionFactor, f64>,
}

impl ExpandedUncertaintyDefaults {
    /// The built-in defaults ("1", "10", "25").
    pub fn standard() -> &'static Self {
        &STANDARD_DEFAULTS
    }

    /// Builds a defaults table from explicit entries.
    pub fn new(entries: impl IntoIterator<Item = (DilutionFactor, f64)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Suggested expanded uncertainty for `dilution`, if any.
    pub fn get(&self, dilution: DilutionFactor) -> Option<f64> {
        self.entries.get(&dilution).copied()
    }

    /// Dilution factors present in the table, ascending.
    pub fn dilutions(&self) -> impl Iterator<Item = DilutionFactor> + '_ {
        self.entries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_values() {
        let table = CoefficientTable::standard();
        let cases = [
            (DilutionFactor::X1, 0.0295, 0.0590),
            (DilutionFactor::X10, 0.0304, 0.0608),
            (DilutionFactor::X25, 0.0279, 0.0558),
        ];
        for (d, uc, u) in cases {
            let c = table.get(d).expect("standard key");
            assert_eq!(c.combined_relative(), uc, "{d}");
            assert_eq!(c.expanded_log10(), u, "{d}");
        }
    }

    #[test]
    fn test_standard_table_invariants() {
        let table = CoefficientTable::standard();
        for d in table.dilutions() {
            let c = table.get(d).unwrap();
            assert!(c.combined_relative() > 0.0 && c.combined_relative() < 1.0);
            assert!(c.expanded_log10() > 0.0 && c.expanded_log10() < 1.0);
        }
        assert_eq!(table.dilutions().count(), 3);
    }

    #[test]
    fn test_default_table_is_distinct_snapshot() {
        let defaults = ExpandedUncertaintyDefaults::standard();
        assert_eq!(defaults.get(DilutionFactor::X1), Some(0.058971));
        assert_eq!(defaults.get(DilutionFactor::X10), Some(0.060709));
        assert_eq!(defaults.get(DilutionFactor::X25), Some(0.055825));

        let table = CoefficientTable::standard();
        for d in defaults.dilutions() {
            let u = table.get(d).unwrap().expanded_log10();
            assert_ne!(defaults.get(d), Some(u), "{d} should differ");
        }
    }

    #[test]
    fn test_lookup_unknown_key() {
        let err = CoefficientTable::standard()
            .lookup(DilutionFactor::new(5).unwrap())
            .unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::UnknownKey("5X".into()));
    }

    #[test]
    fn test_dilution_parse() {
        assert_eq!("1X".parse::<DilutionFactor>().unwrap(), DilutionFactor::X1);
        assert_eq!("10x".parse::<DilutionFactor>().unwrap(), DilutionFactor::X10);
        assert_eq!("25".parse::<DilutionFactor>().unwrap(), DilutionFactor::X25);
        assert_eq!(" 10X ".parse::<DilutionFactor>().unwrap(), DilutionFactor::X10);
        assert!("".parse::<DilutionFactor>().is_err());
        assert!("X".parse::<DilutionFactor>().is_err());
        assert!("0X".parse::<DilutionFactor>().is_err());
        assert!("-1X".parse::<DilutionFactor>().is_err());
        assert!("2.5X".parse::<DilutionFactor>().is_err());
    }

    #[test]
    fn test_dilution_labels() {
        assert_eq!(DilutionFactor::X10.to_string(), "10X");
        assert_eq!(DilutionFactor::X10.bare_label(), "10");
        assert_eq!(DilutionFactor::X25.factor(), 25);
        assert!(DilutionFactor::new(0).is_none());
    }

    #[test]
    fn test_coefficient_validation() {
        assert!(UncertaintyCoefficient::new(0.03, 0.06).is_ok());
        assert!(UncertaintyCoefficient::new(0.0, 0.06).is_err());
        assert!(UncertaintyCoefficient::new(0.03, -0.06).is_err());
        assert!(UncertaintyCoefficient::new(f64::NAN, 0.06).is_err());
    }

    #[test]
    fn test_custom_table() {
        let d = DilutionFactor::new(50).unwrap();
        let table = CoefficientTable::new([(d, UncertaintyCoefficient::new(0.04, 0.08).unwrap())]);
        assert!(table.get(d).is_some());
        assert!(table.get(DilutionFactor::X1).is_none());
    }
}
