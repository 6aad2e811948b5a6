//! Validated factor weights.

use crate::error::{Result, RiskMapError};
use crate::model::factors;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default tolerance for the weight-sum check.
pub const DEFAULT_WEIGHT_EPSILON: f64 = 1e-6;

/// Mapping from factor name to weight.
///
/// Every weight lies in [0, 1] and the weights sum to 1.0 within epsilon.
/// Construction is the only place these checks happen; a `WeightSet` that
/// exists is valid. Iteration follows insertion order, which also fixes the
/// column order of exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, f64>", into = "IndexMap<String, f64>")]
pub struct WeightSet {
    weights: IndexMap<String, f64>,
}

impl WeightSet {
    /// Build a weight set with the default epsilon.
    pub fn new<I, K>(weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self::with_epsilon(weights, DEFAULT_WEIGHT_EPSILON)
    }

    /// Build a weight set, allowing the sum to differ from 1.0 by `epsilon`.
    pub fn with_epsilon<I, K>(weights: I, epsilon: f64) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let weights = collect_weights(weights)?;
        let total: f64 = weights.values().sum();
        if (total - 1.0).abs() > epsilon {
            return Err(RiskMapError::config(format!(
                "factor weights must sum to 1.0 (within {epsilon}), got {total}"
            )));
        }
        Ok(Self { weights })
    }

    /// Build a weight set by dividing every weight by the total.
    ///
    /// Opt-in alternative to [`WeightSet::new`] for relative weights such as
    /// `{a: 3, b: 1}`. Negative weights and a zero total are still rejected.
    pub fn rescaled<I, K>(weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut raw = IndexMap::new();
        for (name, weight) in weights {
            let name = name.into();
            if !weight.is_finite() || weight < 0.0 {
                return Err(RiskMapError::config(format!(
                    "weight for '{name}' must be a non-negative number, got {weight}"
                )));
            }
            raw.insert(name, weight);
        }
        let total: f64 = raw.values().sum();
        if total <= 0.0 {
            return Err(RiskMapError::config("weights must have a positive total"));
        }
        Self::new(raw.into_iter().map(|(name, w)| (name, w / total)))
    }

    /// Weight of a configured factor.
    pub fn weight(&self, factor: &str) -> Result<f64> {
        self.weights.get(factor).copied().ok_or_else(|| {
            RiskMapError::config(format!(
                "factor '{factor}' is not configured (known: {})",
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Whether the factor is part of this set.
    #[must_use]
    pub fn contains(&self, factor: &str) -> bool {
        self.weights.contains_key(factor)
    }

    /// Factor names in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// `(name, weight)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        WeightPreset::Balanced.weight_set()
    }
}

impl TryFrom<IndexMap<String, f64>> for WeightSet {
    type Error = RiskMapError;

    fn try_from(weights: IndexMap<String, f64>) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<WeightSet> for IndexMap<String, f64> {
    fn from(set: WeightSet) -> Self {
        set.weights
    }
}

fn collect_weights<I, K>(weights: I) -> Result<IndexMap<String, f64>>
where
    I: IntoIterator<Item = (K, f64)>,
    K: Into<String>,
{
    let mut out = IndexMap::new();
    for (name, weight) in weights {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RiskMapError::config("factor name must not be empty"));
        }
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(RiskMapError::config(format!(
                "weight for '{name}' must be between 0.0 and 1.0, got {weight}"
            )));
        }
        if out.insert(name.clone(), weight).is_some() {
            return Err(RiskMapError::config(format!(
                "factor '{name}' is weighted more than once"
            )));
        }
    }
    if out.is_empty() {
        return Err(RiskMapError::config("at least one factor must be weighted"));
    }
    Ok(out)
}

/// Named weight presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightPreset {
    /// General-purpose weights, bird density slightly dominant
    Balanced,
    /// Avian-influenza weights: bird density raised, population density lowered
    H5n1,
}

impl WeightPreset {
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
        match name.to_lowercase().as_str() {
            "balanced" | "default" => Some(Self::Balanced),
            "h5n1" | "avian" | "avian-flu" => Some(Self::H5n1),
            _ => None,
        }
    }

    /// Raw preset weights in canonical factor order.
    #[must_use]
    pub const fn weights(&self) -> [(&'static str, f64); 5] {
        let values = match self {
            Self::Balanced => [0.30, 0.40, 0.15, 0.10, 0.05],
            Self::H5n1 => [0.25, 0.45, 0.15, 0.10, 0.05],
        };
        [
            (factors::POPULATION_DENSITY, values[0]),
            (factors::BIRD_DENSITY, values[1]),
            (factors::WATER_PROXIMITY, values[2]),
            (factors::HEALTHCARE_CAPACITY, values[3]),
            (factors::VULNERABILITY_INDEX, values[4]),
        ]
    }

    /// The preset as a validated weight set.
    #[must_use]
    pub fn weight_set(&self) -> WeightSet {
        WeightSet {
            weights: self
                .weights()
                .iter()
                .map(|(name, w)| ((*name).to_string(), *w))
                .collect(),
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Balanced, Self::H5n1]
    }
}
