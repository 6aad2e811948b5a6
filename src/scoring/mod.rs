//! Zone risk scoring engine.
//!
//! Scoring runs in four stages over the zones loaded into a
//! [`RiskMapEngine`]:
//!
//! 1. **Normalization**: each factor's raw values are scaled onto [0, 1]
//!    across all zones of the run ([`Normalizer`]). Missing values are left
//!    out of the statistics and receive the configured default fill.
//! 2. **Aggregation**: a zone's normalized factors are combined into one
//!    score by weighted sum ([`RiskAggregator`], [`WeightSet`]).
//! 3. **Classification**: the score is mapped to a [`RiskCategory`] tier
//!    ([`RiskClassifier`]).
//! 4. **Queries**: the retained result serves ranking, thresholding and
//!    export.
//!
//! # Usage
//!
//! ```
//! use riskmap_tools::model::ZoneRecord;
//! use riskmap_tools::scoring::{RiskMapEngine, RiskModelConfig};
//!
//! let mut engine = RiskMapEngine::new();
//! engine.load(vec![
//!     ZoneRecord::new("10001", 10_000.0, 1.0).with_factor("bird_density", 100.0),
//!     ZoneRecord::new("10002", 5_000.0, 1.0).with_factor("bird_density", 50.0),
//!     ZoneRecord::new("10003", 20_000.0, 1.0).with_factor("bird_density", 200.0),
//! ])?;
//!
//! let config = RiskModelConfig::h5n1();
//! engine.compute_scores(&config)?;
//!
//! let top = engine.top_risk(1)?;
//! assert_eq!(top[0].zone_id.as_str(), "10003");
//! # Ok::<(), riskmap_tools::RiskMapError>(())
//! ```
//!
//! [`RiskCategory`]: crate::model::RiskCategory

mod aggregator;
mod classifier;
mod config;
mod engine;
mod normalizer;
mod summary;
mod weights;

pub use aggregator::RiskAggregator;
pub use classifier::{CutPoints, RiskClassifier};
pub use config::{Direction, FactorOptions, FactorRange, RiskModelConfig, DEFAULT_FILL};
pub use engine::{EngineState, RiskMapEngine};
pub use normalizer::{FactorScale, NormalizationMethod, Normalizer};
pub use summary::ScoreSummary;
pub use weights::{WeightPreset, WeightSet, DEFAULT_WEIGHT_EPSILON};

/// Decimal places past which f64 rounding is the identity.
const MAX_ROUNDING_DECIMALS: u32 = 15;

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals > MAX_ROUNDING_DECIMALS {
        return value;
    }
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123_456_7, 4), 0.1235);
        assert_eq!(round_to(0.5, 0), 1.0);
    }

    #[test]
    fn test_round_to_huge_precision_is_identity() {
        assert_eq!(round_to(0.123_456_7, 400), 0.123_456_7);
        assert_eq!(round_to(0.25, u32::MAX), 0.25);
    }
}
