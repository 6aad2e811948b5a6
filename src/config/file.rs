//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::{DEFAULT_ID_COLUMN, DEFAULT_TOP_N};
use super::types::AppConfig;
use crate::reports::{ExportFormat, DEFAULT_PRECISION};
use crate::scoring::{CutPoints, RiskModelConfig, WeightSet, DEFAULT_FILL};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".riskmap-tools.yaml",
    ".riskmap-tools.yml",
    "riskmap-tools.yaml",
    "riskmap-tools.yml",
    ".riskmaprc",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/riskmap-tools/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // An explicit path is returned even when missing so loading reports it
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("riskmap-tools")) {
            return Some(path);
        }
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error, including weights or cut points that fail validation
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from a discovered file, or return the default when none is found.
///
/// A file that exists but fails to load is an error: scoring never falls
/// back to default weights behind the caller's back.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    match discover_config_file(explicit_path) {
        Some(path) => {
            let config = load_config_file(&path)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok((config, Some(path)))
        }
        None => Ok((AppConfig::default(), None)),
    }
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only fields that differ from their defaults in `other` override, which
    /// is how CLI arguments are layered over file config.
    pub fn merge(&mut self, other: &Self) {
        // Model config
        if other.model.weights != WeightSet::default() {
            self.model.weights = other.model.weights.clone();
        }
        let default_factors = RiskModelConfig::default().factors;
        for (name, options) in &other.model.factors {
            if default_factors.get(name) != Some(options) {
                self.model.factors.insert(name.clone(), *options);
            }
        }
        if other.model.cut_points != CutPoints::default() {
            self.model.cut_points = other.model.cut_points;
        }
        if (other.model.default_fill - DEFAULT_FILL).abs() > f64::EPSILON {
            self.model.default_fill = other.model.default_fill;
        }

        // Input config
        if other.input.id_column != DEFAULT_ID_COLUMN {
            self.input.id_column.clone_from(&other.input.id_column);
        }
        if !other.input.pad_zip_codes {
            self.input.pad_zip_codes = false;
        }
        if other.input.geometry_file.is_some() {
            self.input.geometry_file.clone_from(&other.input.geometry_file);
        }

        // Output config - only override if explicitly set
        if other.output.format != ExportFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.include_attributes {
            self.output.include_attributes = true;
        }
        if other.output.precision != DEFAULT_PRECISION {
            self.output.precision = other.output.precision;
        }
        if other.output.top != DEFAULT_TOP_N {
            self.output.top = other.output.top;
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        // Behavior config
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> Result<(Self, Option<PathBuf>), ConfigFileError> {
        let (mut config, loaded_from) = load_or_default(config_path)?;
        config.merge(cli_overrides);
        Ok((config, loaded_from))
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# Zone Risk Scoring Configuration
# Place this file at .riskmap-tools.yaml in your project root or ~/.config/riskmap-tools/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# Zone Risk Scoring Configuration File
# =====================================
#
# Place it at:
#   - .riskmap-tools.yaml in your project root
#   - ~/.config/riskmap-tools/riskmap-tools.yaml for global config
#
# CLI arguments always override file settings.

# Scoring model
model:
  # Factor weights; must sum to 1.0
  weights:
    population_density: 0.25
    bird_density: 0.45
    water_proximity: 0.15
    healthcare_capacity: 0.10
    vulnerability_index: 0.05
  # Per-factor normalization (method: min-max | sigmoid,
  # range: {kind: observed} | {kind: declared, min, max},
  # direction: ascending | inverted)
  factors:
    healthcare_capacity:
      direction: inverted
  # Boundaries between Low|Medium, Medium|High, High|Very High
  cut_points: [0.25, 0.5, 0.75]
  # Normalized value given to missing factors
  default_fill: 0.5

# Input loading
input:
  # Identifier column (CSV) or property (GeoJSON)
  id_column: zip_code
  # Zero-pad numeric identifiers to five digits
  pad_zip_codes: true
  # GeoJSON boundaries joined onto zones by identifier
  # geometry_file: ./nyc_zip_boundaries.geojson

# Output configuration
output:
  # Format: tabular, geo, json
  format: tabular
  # Output file path (omit for stdout)
  # file: risk_scores.csv
  include_attributes: false
  precision: 4
  # Zones shown in ranking tables
  top: 10
  no_color: false

# Behavior flags
behavior:
  # Suppress non-essential output
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
