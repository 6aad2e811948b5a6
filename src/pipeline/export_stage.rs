//! Export stage: render the current result and send it to its target.

use super::output::{write_output, OutputTarget};
use crate::reports::{ExportFormat, ExportOptions};
use crate::scoring::RiskMapEngine;
use anyhow::{Context, Result};

/// Render the engine's current result in `format`.
pub fn render_export(
    engine: &RiskMapEngine,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String> {
    let mut buffer = Vec::new();
    engine
        .export_as(&mut buffer, format, options)
        .with_context(|| format!("Failed to export scores as {format}"))?;
    String::from_utf8(buffer).context("Export produced invalid UTF-8")
}

/// Render the current result and write it to `target`.
pub fn export_scores(
    engine: &RiskMapEngine,
    format: ExportFormat,
    options: &ExportOptions,
    target: &OutputTarget,
    quiet: bool,
) -> Result<()> {
    let rendered = render_export(engine, format, options)?;
    if !quiet {
        tracing::info!("Exporting {} zones as {}", engine.len(), format);
    }
    write_output(&rendered, target, quiet)
}
