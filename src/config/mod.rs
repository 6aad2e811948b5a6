//! Configuration module for riskmap-tools.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust
//! use riskmap_tools::config::{AppConfig, ConfigPreset, Validatable};
//!
//! let config = AppConfig::from_preset(ConfigPreset::H5n1);
//! assert!(config.is_valid());
//! ```
//!
//! # Configuration File
//!
//! Place a `.riskmap-tools.yaml` file in your project root or
//! `~/.config/riskmap-tools/`:
//!
//! ```yaml
//! model:
//!   weights:
//!     bird_density: 0.6
//!     population_density: 0.4
//! output:
//!   format: geo
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{ConfigPreset, DEFAULT_ID_COLUMN, DEFAULT_TOP_N};
pub use types::{AppConfig, AppConfigBuilder, BehaviorConfig, InputConfig, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Documents every option that can be set in `.riskmap-tools.yaml` files,
/// for editor validation and autocompletion.
pub fn generate_json_schema() -> crate::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::RiskMapError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_documents_sections() {
        let schema = generate_json_schema().unwrap();
        for section in ["model", "input", "output", "behavior"] {
            assert!(schema.contains(section), "schema lacks {section}");
        }
    }
}
