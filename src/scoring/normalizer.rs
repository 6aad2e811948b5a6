//! Per-factor normalization onto [0, 1].

use super::config::FactorRange;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Value given to every zone when a factor has no spread.
///
/// The midpoint avoids signalling maximum or minimum risk from a degenerate
/// value range.
const DEGENERATE_VALUE: f64 = 0.5;

/// How raw values are mapped onto [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMethod {
    /// `(v - min) / (max - min)`
    #[default]
    MinMax,
    /// Logistic function of the z-score
    Sigmoid,
}

/// A fitted mapping from raw value to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorScale {
    /// Every value maps to the same constant
    Constant(f64),
    /// Linear rescale of `[min, min + span]`, clamped
    Linear { min: f64, span: f64 },
    /// `1 / (1 + e^-z)` with `z = (v - mean) / std_dev`
    Sigmoid { mean: f64, std_dev: f64 },
}

impl FactorScale {
    /// Map a raw value onto [0, 1].
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Self::Constant(c) => c,
            Self::Linear { min, span } => ((value - min) / span).clamp(0.0, 1.0),
            Self::Sigmoid { mean, std_dev } => {
                let z = (value - mean) / std_dev;
                1.0 / (1.0 + (-z).exp())
            }
        }
    }
}

/// Fits a [`FactorScale`] from the present values of one factor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Normalizer {
    method: NormalizationMethod,
    range: FactorRange,
}

impl Normalizer {
    #[must_use]
    pub const fn new(method: NormalizationMethod, range: FactorRange) -> Self {
        Self { method, range }
    }

    /// Min-max over the observed extremes.
    #[must_use]
    pub const fn min_max() -> Self {
        Self::new(NormalizationMethod::MinMax, FactorRange::Observed)
    }

    /// Sigmoid of the z-score.
    #[must_use]
    pub const fn sigmoid() -> Self {
        Self::new(NormalizationMethod::Sigmoid, FactorRange::Observed)
    }

    /// Fit a scale from the values present across the run's zones.
    ///
    /// Callers pass only present values; missing ones must not reach the
    /// statistics. A declared range takes precedence over the method and
    /// does not depend on the data.
    #[must_use]
    pub fn fit(&self, values: &[f64]) -> FactorScale {
        if let FactorRange::Declared { min, max } = self.range {
            return if max > min {
                FactorScale::Linear {
                    min,
                    span: max - min,
                }
            } else {
                FactorScale::Constant(DEGENERATE_VALUE)
            };
        }

        match self.method {
            NormalizationMethod::MinMax => fit_min_max(values),
            NormalizationMethod::Sigmoid => fit_sigmoid(values),
        }
    }
}

fn fit_min_max(values: &[f64]) -> FactorScale {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return FactorScale::Constant(DEGENERATE_VALUE);
    };
    let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = max - min;
    if span > 0.0 {
        FactorScale::Linear { min, span }
    } else {
        FactorScale::Constant(DEGENERATE_VALUE)
    }
}

fn fit_sigmoid(values: &[f64]) -> FactorScale {
    let n = values.len();
    if n < 2 {
        return FactorScale::Constant(DEGENERATE_VALUE);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    // Sample standard deviation (n - 1), as census tooling reports it
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev > 0.0 {
        FactorScale::Sigmoid { mean, std_dev }
    } else {
        FactorScale::Constant(DEGENERATE_VALUE)
    }
}
