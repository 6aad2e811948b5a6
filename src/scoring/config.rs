//! Scoring model configuration.

use super::classifier::CutPoints;
use super::normalizer::{NormalizationMethod, Normalizer};
use super::weights::{WeightPreset, WeightSet};
use crate::error::{Result, RiskMapError};
use crate::model::factors;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Post-normalization value assigned to missing factors by default.
pub const DEFAULT_FILL: f64 = 0.5;

/// Where a factor's normalization bounds come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FactorRange {
    /// Derive from the extremes of the zones in the run
    #[default]
    Observed,
    /// Fixed bounds; values outside are clamped
    Declared { min: f64, max: f64 },
}

/// Whether larger raw values mean more or less risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Ascending,
    /// Risk falls as the raw value rises (e.g. healthcare capacity)
    Inverted,
}

/// Per-factor normalization options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FactorOptions {
    pub method: NormalizationMethod,
    pub range: FactorRange,
    pub direction: Direction,
}

impl FactorOptions {
    #[must_use]
    pub fn inverted() -> Self {
        Self {
            direction: Direction::Inverted,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sigmoid() -> Self {
        Self {
            method: NormalizationMethod::Sigmoid,
            ..Self::default()
        }
    }

    /// Min-max over fixed bounds rather than the observed extremes.
    #[must_use]
    pub fn declared(min: f64, max: f64) -> Self {
        Self {
            range: FactorRange::Declared { min, max },
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.method, self.range)
    }

    /// Apply the direction to an already-normalized value.
    #[must_use]
    pub fn orient(&self, normalized: f64) -> f64 {
        match self.direction {
            Direction::Ascending => normalized,
            Direction::Inverted => 1.0 - normalized,
        }
    }
}

/// Everything a scoring run needs besides the zones.
///
/// Owned by the caller and passed by reference to every
/// [`compute_scores`](super::RiskMapEngine::compute_scores) call; the engine
/// never mutates it. Weights and cut points validate on construction and
/// deserialization, [`RiskModelConfig::validate`] checks the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RiskModelConfig {
    /// Factor weights, summing to 1.0
    #[schemars(with = "BTreeMap<String, f64>")]
    pub weights: WeightSet,
    /// Normalization options for factors that differ from the defaults
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub factors: BTreeMap<String, FactorOptions>,
    /// Tier boundaries, default `[0.25, 0.5, 0.75]`
    #[schemars(with = "[f64; 3]")]
    pub cut_points: CutPoints,
    /// Normalized value given to missing factors
    pub default_fill: f64,
}

impl Default for RiskModelConfig {
    fn default() -> Self {
        Self::from_preset(WeightPreset::Balanced)
    }
}

impl RiskModelConfig {
    /// Preset weights, with healthcare capacity inverted.
    #[must_use]
    pub fn from_preset(preset: WeightPreset) -> Self {
        let mut factor_options = BTreeMap::new();
        factor_options.insert(
            factors::HEALTHCARE_CAPACITY.to_string(),
            FactorOptions::inverted(),
        );
        Self {
            weights: preset.weight_set(),
            factors: factor_options,
            cut_points: CutPoints::default(),
            default_fill: DEFAULT_FILL,
        }
    }

    #[must_use]
    pub fn h5n1() -> Self {
        Self::from_preset(WeightPreset::H5n1)
    }

    /// A config with the given weights and default options everywhere.
    #[must_use]
    pub fn from_weights(weights: WeightSet) -> Self {
        Self {
            weights,
            factors: BTreeMap::new(),
            cut_points: CutPoints::default(),
            default_fill: DEFAULT_FILL,
        }
    }

    #[must_use]
    pub fn with_default_fill(mut self, value: f64) -> Self {
        self.default_fill = value;
        self
    }

    #[must_use]
    pub fn with_cut_points(mut self, cut_points: CutPoints) -> Self {
        self.cut_points = cut_points;
        self
    }

    #[must_use]
    pub fn with_factor_options(mut self, factor: impl Into<String>, options: FactorOptions) -> Self {
        self.factors.insert(factor.into(), options);
        self
    }

    /// Options for a factor, falling back to defaults.
    #[must_use]
    pub fn options_for(&self, factor: &str) -> FactorOptions {
        self.factors.get(factor).copied().unwrap_or_default()
    }

    /// Check the parts not enforced by construction.
    pub fn validate(&self) -> Result<()> {
        if !self.default_fill.is_finite() || !(0.0..=1.0).contains(&self.default_fill) {
            return Err(RiskMapError::config(format!(
                "default fill must be between 0.0 and 1.0, got {}",
                self.default_fill
            )));
        }
        // Options for unweighted factors are inert: the defaults carry
        // healthcare inversion even when a file drops that factor.
        for (name, options) in &self.factors {
            if let FactorRange::Declared { min, max } = options.range {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(RiskMapError::config(format!(
                        "declared range for '{name}' must have finite min < max, got [{min}, {max}]"
                    )));
                }
            }
        }
        Ok(())
    }
}
