//! JSON exporter.

use super::{zone_properties, ExportFormat, ExportOptions, ExportTable, Exporter};
use crate::error::{Result, RiskMapError};
use crate::scoring::ScoreSummary;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

/// JSON exporter, pretty-printed
pub struct JsonExporter;

impl JsonExporter {
    /// Create a new JSON exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for JsonExporter {
    fn render(&self, table: &ExportTable<'_>, options: &ExportOptions) -> Result<String> {
        let scores: Vec<_> = table.rows.iter().map(|row| row.score.clone()).collect();
        let zones = table
            .rows
            .iter()
            .map(|row| {
                let mut zone = zone_properties(row, table.factors, options)?;
                if !row.score.filled.is_empty() {
                    zone.insert(
                        "filled".to_string(),
                        Value::Array(
                            row.score
                                .filled
                                .iter()
                                .map(|f| Value::String(f.clone()))
                                .collect(),
                        ),
                    );
                }
                Ok(zone)
            })
            .collect::<Result<Vec<_>>>()?;

        let report = JsonExport {
            metadata: JsonExportMetadata {
                tool: "riskmap-tools",
                version: env!("CARGO_PKG_VERSION"),
                generated_at: Utc::now().to_rfc3339(),
                zone_count: table.len(),
                factors: table.factors,
                precision: options.precision,
            },
            summary: ScoreSummary::from_scores(&scores),
            zones,
        };

        serde_json::to_string_pretty(&report).map_err(|e| RiskMapError::Serialization(e.to_string()))
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}

// ============================================================================
// JSON structures
// ============================================================================

#[derive(Serialize)]
struct JsonExport<'a> {
    metadata: JsonExportMetadata<'a>,
    summary: ScoreSummary,
    zones: Vec<Map<String, Value>>,
}

#[derive(Serialize)]
struct JsonExportMetadata<'a> {
    tool: &'static str,
    version: &'static str,
    generated_at: String,
    zone_count: usize,
    factors: &'a [String],
    precision: u32,
}
