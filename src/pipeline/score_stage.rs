//! Scoring stage.

use crate::model::ZoneRecord;
use crate::scoring::{RiskMapEngine, RiskModelConfig};
use anyhow::{Context, Result};

/// Load records into a fresh engine and score them with `model`.
pub fn score_zones(
    records: Vec<ZoneRecord>,
    model: &RiskModelConfig,
    quiet: bool,
) -> Result<RiskMapEngine> {
    let mut engine = RiskMapEngine::new();
    engine
        .load(records)
        .context("Zone records failed validation")?;

    if !quiet {
        tracing::info!(
            "Scoring {} zones on {} weighted factors",
            engine.len(),
            model.weights.len()
        );
    }

    let scores = engine
        .compute_scores(model)
        .context("Failed to compute risk scores")?;
    let filled: usize = scores.iter().map(|s| s.filled.len()).sum();
    if filled > 0 {
        tracing::warn!("{} missing factor values received the default fill", filled);
    }

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::EngineState;

    #[test]
    fn test_score_zones_reaches_scored_state() {
        let records = vec![
            ZoneRecord::new("10001", 100.0, 1.0).with_factor("bird_density", 1.0),
            ZoneRecord::new("10002", 200.0, 1.0).with_missing("bird_density"),
        ];
        let engine = score_zones(records, &RiskModelConfig::h5n1(), true).unwrap();
        assert_eq!(engine.state(), EngineState::Scored);
        assert_eq!(engine.result().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_ids_fail_with_context() {
        let records = vec![
            ZoneRecord::new("10001", 1.0, 1.0),
            ZoneRecord::new("10001", 2.0, 1.0),
        ];
        let err = score_zones(records, &RiskModelConfig::default(), true).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed validation"), "{message}");
        assert!(message.contains("duplicate"), "{message}");
    }
}
