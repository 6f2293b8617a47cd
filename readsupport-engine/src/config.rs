use std::path::Path;

use serde::{Deserialize, Serialize};

use readsupport_core::{ReadSupportError, Result, StrictnessMode};

use crate::consts::{
    DEFAULT_LENIENT_TOLERANCE, DEFAULT_MIN_SEPARATION, DEFAULT_STRICT_TOLERANCE,
    DEFAULT_WINDOW_MARGIN,
};

///
/// Tunable thresholds for window derivation and classification.
///
/// Every field has a default, so a TOML file only needs the values it changes:
///
/// ```toml
/// window_margin = 8
/// lenient_tolerance = 0.08
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub window_margin: usize,
    pub lenient_tolerance: f64,
    pub strict_tolerance: f64,
    pub min_separation: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            window_margin: DEFAULT_WINDOW_MARGIN,
            lenient_tolerance: DEFAULT_LENIENT_TOLERANCE,
            strict_tolerance: DEFAULT_STRICT_TOLERANCE,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }
}

impl ClassifierConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClassifierConfig = toml::from_str(content)
            .map_err(|err| ReadSupportError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    ///
    /// Check the thresholds are usable. Lenient mode may never be stricter than strict mode.
    ///
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("lenient_tolerance", self.lenient_tolerance),
            ("strict_tolerance", self.strict_tolerance),
            ("min_separation", self.min_separation),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ReadSupportError::InvalidConfig(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.lenient_tolerance < self.strict_tolerance {
            return Err(ReadSupportError::InvalidConfig(format!(
                "lenient_tolerance ({}) is below strict_tolerance ({})",
                self.lenient_tolerance, self.strict_tolerance
            )));
        }
        if self.window_margin == 0 {
            return Err(ReadSupportError::InvalidConfig(
                "window_margin must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Mismatch fraction a best candidate may carry under `mode`.
    pub fn tolerance(&self, mode: StrictnessMode) -> f64 {
        match mode {
            StrictnessMode::Lenient => self.lenient_tolerance,
            StrictnessMode::Strict => self.strict_tolerance,
        }
    }
}
