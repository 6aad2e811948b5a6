//! Score command handler.
//!
//! Implements the `score` subcommand: load zones, score them and export the
//! result.

use super::{ensure_valid, warn_absent_factors};
use crate::config::AppConfig;
use crate::pipeline::{
    exit_codes, export_scores, load_zones, score_zones, OutputTarget, PipelineError,
};
use anyhow::Result;
use std::path::PathBuf;

/// Score command inputs
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    /// Zone attribute file
    pub input: PathBuf,
    /// Effective configuration (file merged with CLI overrides)
    pub config: AppConfig,
    /// Exit with [`exit_codes::THRESHOLD_EXCEEDED`] when any zone scores at
    /// or above this value
    pub fail_above: Option<f64>,
}

/// Run the score command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_score(request: ScoreRequest) -> Result<i32> {
    let ScoreRequest {
        input,
        config,
        fail_above,
    } = request;
    ensure_valid(&config)?;
    let quiet = config.behavior.quiet;

    let loaded = load_zones(&input, &config.input, quiet).map_err(|source| {
        PipelineError::ParseFailed {
            path: input.display().to_string(),
            source,
        }
    })?;
    warn_absent_factors(&loaded.records, &config.model.weights);

    let engine = score_zones(loaded.records, &config.model, quiet)
        .map_err(|source| PipelineError::ScoreFailed { source })?;

    let target = OutputTarget::from_option(config.output.file.clone());
    export_scores(
        &engine,
        config.output.format,
        &config.export_options(),
        &target,
        quiet,
    )
    .map_err(|source| PipelineError::ExportFailed { source })?;

    if let Some(threshold) = fail_above {
        let flagged = engine.above_threshold(threshold)?;
        if !flagged.is_empty() {
            tracing::error!(
                "{} zones scored at or above {:.4} (highest: {} at {:.4})",
                flagged.len(),
                threshold,
                flagged[0].zone_id,
                flagged[0].score
            );
            return Ok(exit_codes::THRESHOLD_EXCEEDED);
        }
    }

    Ok(exit_codes::SUCCESS)
}
