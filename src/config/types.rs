//! Configuration types for riskmap-tools runs.
//!
//! Provides structured configuration for scoring, input loading and output.

use super::defaults::{DEFAULT_ID_COLUMN, DEFAULT_TOP_N};
use crate::reports::{ExportFormat, ExportOptions, DEFAULT_PRECISION};
use crate::scoring::{CutPoints, RiskModelConfig, WeightPreset, WeightSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// Constructed from a config file, CLI arguments, or both (with CLI
/// overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Scoring model (weights, normalization, cut points, default fill)
    pub model: RiskModelConfig,
    /// Input loading options
    pub input: InputConfig,
    /// Output configuration (format, file, precision)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Export options derived from the output section.
    #[must_use]
    pub const fn export_options(&self) -> ExportOptions {
        ExportOptions {
            include_attributes: self.output.include_attributes,
            precision: self.output.precision,
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Use a weight preset, keeping the preset's factor options.
    pub fn preset(mut self, preset: WeightPreset) -> Self {
        let model = RiskModelConfig::from_preset(preset);
        self.config.model = RiskModelConfig {
            cut_points: self.config.model.cut_points,
            default_fill: self.config.model.default_fill,
            ..model
        };
        self
    }

    /// Replace the weights.
    pub fn weights(mut self, weights: WeightSet) -> Self {
        self.config.model.weights = weights;
        self
    }

    /// Set the tier boundaries.
    pub fn cut_points(mut self, cut_points: CutPoints) -> Self {
        self.config.model.cut_points = cut_points;
        self
    }

    /// Set the normalized value given to missing factors.
    pub fn default_fill(mut self, value: f64) -> Self {
        self.config.model.default_fill = value;
        self
    }

    /// Set the identifier column of tabular input.
    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.config.input.id_column = column.into();
        self
    }

    /// Set the geometry file joined onto loaded zones.
    pub fn geometry_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.input.geometry_file = file;
        self
    }

    /// Set the output format.
    pub fn output_format(mut self, format: ExportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Include source attributes in exports.
    pub fn include_attributes(mut self, include: bool) -> Self {
        self.config.output.include_attributes = include;
        self
    }

    /// Set the export precision.
    pub fn precision(mut self, precision: u32) -> Self {
        self.config.output.precision = precision;
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Suppress non-essential output.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// How zone input files are read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InputConfig {
    /// Column (CSV) or property (GeoJSON) holding the zone identifier
    pub id_column: String,
    /// Zero-pad purely numeric identifiers to five digits
    pub pad_zip_codes: bool,
    /// GeoJSON file whose geometries are joined onto zones by identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry_file: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            pad_zip_codes: true,
            geometry_file: None,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Export format
    pub format: ExportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Append population, area and raw factor values to exports
    pub include_attributes: bool,
    /// Decimal places on exported scores
    pub precision: u32,
    /// Zones shown in ranking tables
    pub top: usize,
    /// Disable colored output
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Tabular,
            file: None,
            include_attributes: false,
            precision: DEFAULT_PRECISION,
            top: DEFAULT_TOP_N,
            no_color: false,
        }
    }
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .preset(WeightPreset::H5n1)
            .default_fill(0.0)
            .output_format(ExportFormat::Geo)
            .include_attributes(true)
            .precision(2)
            .build();
        assert_eq!(config.model.weights, WeightPreset::H5n1.weight_set());
        assert_eq!(config.model.default_fill, 0.0);
        assert_eq!(config.output.format, ExportFormat::Geo);
        let options = config.export_options();
        assert!(options.include_attributes);
        assert_eq!(options.precision, 2);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("output:\n  format: geo\n").unwrap();
        assert_eq!(config.output.format, ExportFormat::Geo);
        assert_eq!(config.output.precision, DEFAULT_PRECISION);
        assert_eq!(config.input.id_column, "zip_code");
        assert!(config.input.pad_zip_codes);
        assert_eq!(config.model, RiskModelConfig::default());
    }
}
