//! Pipeline orchestration for scoring runs.
//!
//! This module provides shared orchestration logic for load → score → export
//! workflows, reducing duplication across CLI command handlers.

mod export_stage;
mod output;
mod parse;
mod score_stage;

pub use export_stage::{export_scores, render_export};
pub use output::{should_use_color, write_output, OutputTarget};
pub use parse::{load_zones, LoadedZones};
pub use score_stage::score_zones;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse a zone file
    #[error("Parse failed for {path}: {source}")]
    ParseFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Loading or scoring the zone collection failed
    #[error("Scoring failed: {source}")]
    ScoreFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Export or output failed
    #[error("Export failed: {source}")]
    ExportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for scripted use
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// The run succeeded but a `--fail-above` threshold was exceeded
    pub const THRESHOLD_EXCEEDED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::THRESHOLD_EXCEEDED, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::ParseFailed {
            path: "zones.csv".to_string(),
            source: anyhow::anyhow!("bad header"),
        };
        assert_eq!(err.to_string(), "Parse failed for zones.csv: bad header");
    }
}
