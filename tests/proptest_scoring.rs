//! Property-based tests for the scoring engine.
//!
//! Ensures scores stay bounded for arbitrary finite inputs and that weight
//! validation and classification hold their invariants.

use proptest::prelude::*;
use riskmap_tools::model::{RiskCategory, ZoneRecord};
use riskmap_tools::scoring::{RiskClassifier, RiskMapEngine, RiskModelConfig, WeightSet};

/// A zone with every preset factor, some of them missing.
fn zone_strategy() -> impl Strategy<Value = (f64, f64, Vec<Option<f64>>)> {
    (
        0.0..1e6_f64,
        0.01..100.0_f64,
        prop::collection::vec(prop::option::weighted(0.8, -1e4..1e4_f64), 4),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn scores_are_bounded(zones in prop::collection::vec(zone_strategy(), 1..40), fill in 0.0..=1.0_f64) {
        let names = ["bird_density", "water_proximity", "healthcare_capacity", "vulnerability_index"];
        let records: Vec<ZoneRecord> = zones
            .into_iter()
            .enumerate()
            .map(|(i, (population, area, values))| {
                let mut record = ZoneRecord::new(format!("z{i}"), population, area);
                for (name, value) in names.iter().zip(values) {
                    record = match value {
                        Some(v) => record.with_factor(*name, v),
                        None => record.with_missing(*name),
                    };
                }
                record
            })
            .collect();

        let mut engine = RiskMapEngine::new();
        engine.load(records).unwrap();
        let config = RiskModelConfig::h5n1().with_default_fill(fill);
        for score in engine.compute_scores(&config).unwrap() {
            prop_assert!((0.0..=1.0).contains(&score.score), "score {} out of range", score.score);
            prop_assert_eq!(score.category, RiskClassifier::default().classify(score.score));
        }
    }

    #[test]
    fn rescaled_weights_sum_to_one(raw in prop::collection::vec(0.01..10.0_f64, 1..8)) {
        let weights = WeightSet::rescaled(raw.iter().enumerate().map(|(i, w)| (format!("f{i}"), *w))).unwrap();
        prop_assert!((weights.total() - 1.0).abs() <= 1e-6);
        prop_assert!(WeightSet::new(weights.iter().map(|(n, w)| (n.to_string(), w))).is_ok());
    }

    #[test]
    fn classification_is_monotonic(a in 0.0..=1.0_f64, b in 0.0..=1.0_f64) {
        let classifier = RiskClassifier::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classifier.classify(lo) <= classifier.classify(hi));
    }

    #[test]
    fn top_risk_is_sorted(values in prop::collection::vec(0.0..1.0_f64, 1..30), n in 0usize..40) {
        let records: Vec<ZoneRecord> = values
            .iter()
            .enumerate()
            .map(|(i, v)| ZoneRecord::new(format!("z{i:03}"), 1.0, 1.0).with_factor("value", *v))
            .collect();
        let mut engine = RiskMapEngine::new();
        engine.load(records).unwrap();
        let config = RiskModelConfig::from_weights(WeightSet::new([("value", 1.0)]).unwrap());
        engine.compute_scores(&config).unwrap();

        let top = engine.top_risk(n).unwrap();
        prop_assert_eq!(top.len(), n.min(values.len()));
        for pair in top.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        prop_assert!(top.iter().all(|s| RiskCategory::ALL.contains(&s.category)));
    }
}
