//! **Composite spatial risk scoring for geographic zones.**
//!
//! `riskmap-tools` turns a table of per-zone risk indicators (population
//! density, bird density, water proximity, healthcare capacity, social
//! vulnerability) into one bounded risk score per zone and an ordinal risk
//! category, ready to be drawn as a choropleth. It was built for NYC zip-code
//! risk maps of H5N1 avian influenza, but nothing in the engine is specific
//! to either.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`ZoneRecord`], the validated input for one zone, and
//!   [`ZoneScore`], one zone's result.
//! - **[`scoring`]**: the [`RiskMapEngine`] with its normalization,
//!   weighting and classification stages, configured by [`RiskModelConfig`].
//! - **[`parsers`]**: CSV, JSON and GeoJSON readers for zone tables and
//!   boundary files.
//! - **[`reports`]**: tabular, GeoJSON and JSON exporters plus a terminal
//!   summary.
//! - **[`config`]**: YAML configuration, presets and validation.
//! - **[`pipeline`]**: load → score → export orchestration shared by the CLI.
//!
//! ## Scoring a zone table
//!
//! ```
//! use riskmap_tools::parsers::{parse_zones_str, InputFormat, ParseOptions};
//! use riskmap_tools::scoring::{RiskMapEngine, RiskModelConfig};
//!
//! let csv = "zip_code,population,area_km2,bird_density,water_proximity\n\
//!            10001,21102,1.6,40,0.9\n\
//!            10002,76807,2.2,12,\n\
//!            10003,53877,1.5,85,0.4\n";
//! let zones = parse_zones_str(csv, InputFormat::Csv, &ParseOptions::default())?;
//!
//! let mut engine = RiskMapEngine::new();
//! engine.load(zones)?;
//! engine.compute_scores(&RiskModelConfig::h5n1())?;
//!
//! for score in engine.top_risk(3)? {
//!     println!("{} {:.3} {}", score.zone_id, score.score, score.category);
//! }
//!
//! let mut csv_out = Vec::new();
//! engine.export(&mut csv_out, "tabular", &Default::default())?;
//! # Ok::<(), riskmap_tools::RiskMapError>(())
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `riskmap-tools` binary wraps the library: `riskmap-tools score` exports
//! a scored table and `riskmap-tools rank` prints the highest-risk zones.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Zone counts and decimal places are small; usize/u32 to f64 casts are exact
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    // Variable names like `q1`/`q3` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;
pub mod scoring;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset};
pub use config::{BehaviorConfig, InputConfig, OutputConfig};
pub use config::{ConfigError, Validatable};
pub use error::{ErrorContext, OptionContext, ParseErrorKind, Result, RiskMapError};
pub use model::{Geometry, RiskCategory, ZoneId, ZoneRecord, ZoneScore};
pub use parsers::{parse_zones, parse_zones_str, InputFormat, ParseOptions, ZoneParser};
pub use reports::{create_exporter, ExportFormat, ExportOptions, Exporter};
pub use scoring::{
    CutPoints, EngineState, RiskClassifier, RiskMapEngine, RiskModelConfig, ScoreSummary,
    WeightPreset, WeightSet,
};
