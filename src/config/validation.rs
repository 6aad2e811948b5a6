//! Configuration validation for riskmap-tools.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BehaviorConfig, InputConfig, OutputConfig};
use crate::model::factors;
use crate::reports::MAX_PRECISION;
use crate::scoring::RiskModelConfig;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.model.validate_all());
        errors.extend(self.input.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl RiskModelConfig {
    /// Collect every model problem as a [`ConfigError`].
    ///
    /// Weights and cut points are checked on construction; this reports the
    /// remaining rules plus factor options that match neither a weighted nor
    /// a known factor, which usually means a typo in the config file.
    #[must_use]
    pub fn validate_all(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Err(e) = self.validate() {
            errors.push(ConfigError::new("model", e.to_string()));
        }
        for name in self.factors.keys() {
            if !self.weights.contains(name) && !factors::ALL.contains(&name.as_str()) {
                errors.push(ConfigError::new(
                    format!("model.factors.{name}"),
                    format!(
                        "options given for '{name}', which is neither weighted nor a known factor ({})",
                        factors::ALL.join(", ")
                    ),
                ));
            }
        }
        errors
    }
}

impl Validatable for InputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.id_column.trim().is_empty() {
            errors.push(ConfigError::new("input.id_column", "must not be empty"));
        }
        if let Some(ref path) = self.geometry_file {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "input.geometry_file",
                    format!("File does not exist: {}", path.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        if self.precision > MAX_PRECISION {
            errors.push(ConfigError::new(
                "output.precision",
                format!("must be at most {MAX_PRECISION}, got {}", self.precision),
            ));
        }
        if self.top == 0 {
            errors.push(ConfigError::new("output.top", "must be at least 1"));
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // BehaviorConfig contains only boolean flags
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{FactorOptions, FactorRange};

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.is_valid(), "{:?}", config.validate());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.model.default_fill = 2.0;
        config.output.precision = 40;
        config.output.top = 0;
        config.input.id_column = " ".to_string();
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["model", "input.id_column", "output.precision", "output.top"]
        );
    }

    #[test]
    fn test_unknown_factor_options_flagged() {
        let model = RiskModelConfig::default().with_factor_options(
            "bird_densty",
            FactorOptions {
                range: FactorRange::Declared { min: 0.0, max: 1.0 },
                ..FactorOptions::default()
            },
        );
        let errors = model.validate_all();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "model.factors.bird_densty");
    }

    #[test]
    fn test_missing_output_parent() {
        let output = OutputConfig {
            file: Some("/nonexistent/dir/scores.csv".into()),
            ..OutputConfig::default()
        };
        assert!(!output.is_valid());
    }
}
