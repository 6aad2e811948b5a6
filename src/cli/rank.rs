//! Rank command handler.
//!
//! Implements the `rank` subcommand: a terminal summary of the score
//! distribution followed by the highest-risk zones.

use super::{ensure_valid, warn_absent_factors};
use crate::config::AppConfig;
use crate::model::ZoneScore;
use crate::pipeline::{
    exit_codes, load_zones, score_zones, should_use_color, write_output, OutputTarget,
};
use crate::reports::SummaryReporter;
use crate::scoring::RiskMapEngine;
use anyhow::Result;
use std::path::PathBuf;

/// Rank command inputs
#[derive(Debug, Clone)]
pub struct RankRequest {
    /// Zone attribute file
    pub input: PathBuf,
    /// Effective configuration; `output.top` bounds the table
    pub config: AppConfig,
    /// List every zone at or above this score instead of the top N
    pub threshold: Option<f64>,
}

/// Run the rank command, returning the desired exit code.
pub fn run_rank(request: RankRequest) -> Result<i32> {
    let RankRequest {
        input,
        config,
        threshold,
    } = request;
    ensure_valid(&config)?;
    let quiet = config.behavior.quiet;

    let loaded = load_zones(&input, &config.input, quiet)?;
    warn_absent_factors(&loaded.records, &config.model.weights);
    let engine = score_zones(loaded.records, &config.model, quiet)?;

    let target = OutputTarget::from_option(config.output.file.clone());
    let colored = should_use_color(config.output.no_color) && target.is_terminal();
    let text = render_ranking_report(&engine, config.output.top, threshold, colored)?;
    write_output(&text, &target, quiet)?;

    Ok(exit_codes::SUCCESS)
}

/// Summary block followed by the ranking table.
fn render_ranking_report(
    engine: &RiskMapEngine,
    top: usize,
    threshold: Option<f64>,
    colored: bool,
) -> Result<String> {
    let reporter = if colored {
        SummaryReporter::new()
    } else {
        SummaryReporter::new().no_color()
    };

    let (heading, ranked): (String, Vec<&ZoneScore>) = match threshold {
        Some(t) => (
            format!("Zones scoring at or above {t:.4}"),
            engine.above_threshold(t)?,
        ),
        None => (format!("Top {top} zones"), engine.top_risk(top)?),
    };

    Ok(format!(
        "{}\n\n{}\n{}\n",
        reporter.render_summary(&engine.summary()?),
        heading,
        reporter.render_ranking(&ranked)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ZoneRecord;
    use crate::scoring::RiskModelConfig;

    fn engine() -> RiskMapEngine {
        let mut engine = RiskMapEngine::new();
        engine
            .load(vec![
                ZoneRecord::new("10001", 10_000.0, 1.0).with_factor("bird_density", 100.0),
                ZoneRecord::new("10002", 5_000.0, 1.0).with_factor("bird_density", 50.0),
                ZoneRecord::new("10003", 20_000.0, 1.0).with_factor("bird_density", 200.0),
            ])
            .unwrap();
        engine.compute_scores(&RiskModelConfig::h5n1()).unwrap();
        engine
    }

    #[test]
    fn test_top_n_report() {
        let text = render_ranking_report(&engine(), 2, None, false).unwrap();
        assert!(text.contains("Top 2 zones"));
        assert!(text.contains("10003"));
        assert!(text.contains("10001"));
        assert!(!text.contains("10002"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_threshold_report() {
        let text = render_ranking_report(&engine(), 10, Some(1.0), false).unwrap();
        assert!(text.contains("at or above 1.0000"));
        assert!(text.contains("No zones"));
    }
}
