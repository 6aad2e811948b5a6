//! Default configurations and presets for riskmap-tools.
//!
//! Provides named presets for common use cases and default values.

use super::types::AppConfig;
use crate::scoring::{RiskModelConfig, WeightPreset};

/// Identifier column of NYC zip-code tables
pub const DEFAULT_ID_COLUMN: &str = "zip_code";

/// Zones shown in ranking tables
pub const DEFAULT_TOP_N: usize = 10;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// General-purpose weighting
    Balanced,
    /// Weighting tuned for avian influenza spillover
    H5n1,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::H5n1 => "h5n1",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        WeightPreset::from_name(name).map(Self::from)
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Balanced => "Population density and bird habitat weighted evenly with local factors",
            Self::H5n1 => "Bird density emphasised for avian influenza surveillance",
        }
    }

    /// Weight preset backing this configuration preset.
    #[must_use]
    pub const fn weights(&self) -> WeightPreset {
        match self {
            Self::Balanced => WeightPreset::Balanced,
            Self::H5n1 => WeightPreset::H5n1,
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Balanced, Self::H5n1]
    }
}

impl From<WeightPreset> for ConfigPreset {
    fn from(preset: WeightPreset) -> Self {
        match preset {
            WeightPreset::Balanced => Self::Balanced,
            WeightPreset::H5n1 => Self::H5n1,
        }
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        Self {
            model: RiskModelConfig::from_preset(preset.weights()),
            ..Self::default()
        }
    }
}
