//! Pre-populated form values.
//!
//! The hosting surface starts with default input values; the startup
//! calculation runs against them. They are loaded from TOML:
//!
//! ```toml
//! [endotoxin_limit]
//! k = "5.0"
//! m = "0.2"
//! unit = "mass"
//!
//! [table_uncertainty]
//! dilution = "1X"
//! result = "0.5"
//!
//! [log10_interval]
//! dilution = "1"
//! result_eu = "50"
//! # expanded_uncertainty = "0.058971"   # defaults to the table value
//! ```
//!
//! Values are kept as text because they pre-fill form fields and go through
//! the same parsing as anything typed by hand. Every section and key is
//! optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::form::{fields, MemoryForm};
use crate::uncertainty::{DilutionFactor, ExpandedUncertaintyDefaults};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Defaults for the endotoxin limit calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndotoxinLimitDefaults {
    /// K, threshold pyrogenic dose (EU/kg/hr). 5.0 is the parenteral value.
    pub k: String,
    /// M, maximum dose per kg per hour.
    pub m: String,
    /// Unit selector for M.
    pub unit: String,
}

impl Default for EndotoxinLimitDefaults {
    fn default() -> Self {
        Self {
            k: "5.0".to_string(),
            m: String::new(),
            unit: "mass".to_string(),
        }
    }
}

/// Defaults for the table-based uncertainty calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableUncertaintyDefaults {
    /// Dilution factor key.
    pub dilution: String,
    /// Measured result.
    pub result: String,
}

impl Default for TableUncertaintyDefaults {
    fn default() -> Self {
        Self {
            dilution: "1X".to_string(),
            result: "0.5".to_string(),
        }
    }
}

/// Defaults for the log10 interval calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Log10IntervalDefaults {
    /// Dilution factor key selecting the default expanded uncertainty.
    pub dilution: String,
    /// Measured result (EU/mL).
    pub result_eu: String,
    /// Expanded uncertainty. `None` takes the default for `dilution`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_uncertainty: Option<String>,
}

impl Default for Log10IntervalDefaults {
    fn default() -> Self {
        Self {
            dilution: "1".to_string(),
            result_eu: String::new(),
            expanded_uncertainty: None,
        }
    }
}

/// All pre-populated form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub endotoxin_limit: EndotoxinLimitDefaults,
    pub table_uncertainty: TableUncertaintyDefaults,
    pub log10_interval: Log10IntervalDefaults,
}

impl FormDefaults {
    /// Loads and validates defaults from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`]
    /// on malformed TOML, [`ConfigError::Invalid`] if a dilution key does not
    /// parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded form defaults");
        Ok(config)
    }

    /// Parses and validates defaults from TOML text.
    ///
    /// ```
    /// use u_endotoxin::config::FormDefaults;
    ///
    /// let config = FormDefaults::from_toml_str("[table_uncertainty]\ndilution = \"10X\"\n").unwrap();
    /// assert_eq!(config.table_uncertainty.dilution, "10X");
    /// assert_eq!(config.table_uncertainty.result, "0.5");
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both dilution keys parse.
    ///
    /// Numeric fields are not checked here; invalid numbers are a normal
    /// calculator outcome and are shown as such.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("table_uncertainty.dilution", &self.table_uncertainty.dilution),
            ("log10_interval.dilution", &self.log10_interval.dilution),
        ] {
            value
                .parse::<DilutionFactor>()
                .map_err(|err| ConfigError::Invalid {
                    key,
                    message: err.to_string(),
                })?;
        }
        Ok(())
    }

    /// Writes the defaults into the input fields of `form`.
    ///
    /// Without an explicit expanded uncertainty, the value suggested by
    /// `suggestions` for the log10 dilution is used (empty if none).
    pub fn seed(&self, form: &mut MemoryForm, suggestions: &ExpandedUncertaintyDefaults) {
        let el = &self.endotoxin_limit;
        form.set(fields::ROUTE, el.k.as_str());
        form.set(fields::MAX_DOSE, el.m.as_str());
        form.set(fields::DOSE_UNIT, el.unit.as_str());

        let table = &self.table_uncertainty;
        form.set(fields::TABLE_DILUTION, table.dilution.as_str());
        form.set(fields::TABLE_RESULT, table.result.as_str());

        let log10 = &self.log10_interval;
        form.set(fields::LOG10_DILUTION, log10.dilution.as_str());
        form.set(fields::RESULT_EU, log10.result_eu.as_str());
        let u = log10.expanded_uncertainty.clone().unwrap_or_else(|| {
            log10
                .dilution
                .parse::<DilutionFactor>()
                .ok()
                .and_then(|d| suggestions.get(d))
                .map(|u| u.to_string())
                .unwrap_or_default()
        });
        form.set(fields::EXPANDED_UNCERTAINTY, u);
    }
}
