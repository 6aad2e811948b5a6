//! Weighted-sum aggregation of normalized factors.

use super::round_to;
use super::weights::WeightSet;
use crate::error::{Result, RiskMapError};
use indexmap::IndexMap;

/// Decimal places kept on composite scores before classification.
const SCORE_DECIMALS: u32 = 6;

/// Combines one zone's normalized factor values into a composite score.
#[derive(Debug, Clone, Copy)]
pub struct RiskAggregator<'a> {
    weights: &'a WeightSet,
}

impl<'a> RiskAggregator<'a> {
    #[must_use]
    pub const fn new(weights: &'a WeightSet) -> Self {
        Self { weights }
    }

    /// `sum(weight_i * normalized_i)`, rounded to 6 decimals and clamped to
    /// [0, 1].
    ///
    /// The factor names in `normalized` must be exactly the weighted factors.
    pub fn aggregate(&self, zone: &str, normalized: &IndexMap<String, f64>) -> Result<f64> {
        let missing: Vec<String> = self
            .weights
            .names()
            .filter(|name| !normalized.contains_key(*name))
            .map(str::to_string)
            .collect();
        let unexpected: Vec<String> = normalized
            .keys()
            .filter(|name| !self.weights.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(RiskMapError::IncompleteFactors {
                zone: zone.to_string(),
                missing,
                unexpected,
            });
        }

        let score: f64 = self
            .weights
            .iter()
            .map(|(name, weight)| weight * normalized[name])
            .sum();

        Ok(round_to(score, SCORE_DECIMALS).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> WeightSet {
        WeightSet::new([("a", 0.5), ("b", 0.3), ("c", 0.2)]).unwrap()
    }

    fn values(pairs: &[(&str, f64)]) -> IndexMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_weighted_sum() {
        let weights = weights();
        let aggregator = RiskAggregator::new(&weights);
        let score = aggregator
            .aggregate("z", &values(&[("a", 1.0), ("b", 0.5), ("c", 0.0)]))
            .unwrap();
        assert!((score - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_hold_at_extremes() {
        let weights = weights();
        let aggregator = RiskAggregator::new(&weights);
        let all_ones = values(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        assert_eq!(aggregator.aggregate("z", &all_ones).unwrap(), 1.0);
        let all_zeros = values(&[("a", 0.0), ("b", 0.0), ("c", 0.0)]);
        assert_eq!(aggregator.aggregate("z", &all_zeros).unwrap(), 0.0);
    }

    #[test]
    fn test_order_of_input_does_not_matter() {
        let weights = weights();
        let aggregator = RiskAggregator::new(&weights);
        let forward = aggregator
            .aggregate("z", &values(&[("a", 0.1), ("b", 0.2), ("c", 0.3)]))
            .unwrap();
        let reversed = aggregator
            .aggregate("z", &values(&[("c", 0.3), ("b", 0.2), ("a", 0.1)]))
            .unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_mismatched_factor_sets() {
        let weights = weights();
        let aggregator = RiskAggregator::new(&weights);
        let err = aggregator
            .aggregate("10001", &values(&[("a", 0.1), ("b", 0.2), ("d", 0.3)]))
            .unwrap_err();
        match err {
            RiskMapError::IncompleteFactors {
                zone,
                missing,
                unexpected,
            } => {
                assert_eq!(zone, "10001");
                assert_eq!(missing, vec!["c".to_string()]);
                assert_eq!(unexpected, vec!["d".to_string()]);
            }
            other => panic!("Expected IncompleteFactors, got {other:?}"),
        }
    }
}
