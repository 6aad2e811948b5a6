//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod rank;
mod score;

pub use rank::{run_rank, RankRequest};
pub use score::{run_score, ScoreRequest};

use crate::config::{AppConfig, Validatable};
use crate::model::ZoneRecord;
use crate::scoring::WeightSet;
use anyhow::{bail, Context, Result};

/// Reject a config that fails validation, listing every problem.
pub fn ensure_valid(config: &AppConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let listing = errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("Invalid configuration:\n{listing}")
}

/// Parse `factor=weight` pairs into a weight set.
pub fn parse_weights(pairs: &[String]) -> Result<WeightSet> {
    let mut weights = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected FACTOR=WEIGHT, got '{pair}'"))?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid weight for '{}': '{}'", name.trim(), value.trim()))?;
        weights.push((name.trim().to_string(), value));
    }
    WeightSet::new(weights).context("Invalid --weight values")
}

/// Warn about weighted factors that no loaded zone carries.
///
/// Such factors are filled for every zone and only shift all scores equally.
pub(crate) fn warn_absent_factors(records: &[ZoneRecord], weights: &WeightSet) {
    for factor in weights.names() {
        let present = records
            .iter()
            .any(|record| record.factor_value(factor).is_some());
        if !present && !records.is_empty() {
            tracing::warn!("No zone has a value for weighted factor '{}'", factor);
        }
    }
}
