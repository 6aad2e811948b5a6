//! Export of scoring results.
//!
//! This module serializes a scored zone table into the formats downstream
//! mapping tools consume:
//! - Tabular: delimited text, one row per zone
//! - Geo: GeoJSON FeatureCollection carrying each zone's geometry
//! - JSON: structured output with run metadata
//!
//! Field names are shared across formats: `zip_code`, `risk_score`,
//! `risk_category`, then one `<factor>_norm` field per weighted factor.
//! The terminal summary used by the CLI lives in [`summary`].

mod csv;
mod geojson;
mod json;
pub mod summary;
mod types;

pub use csv::TabularExporter;
pub use geojson::GeoExporter;
pub use json::JsonExporter;
pub use summary::SummaryReporter;
pub use types::{
    ExportFormat, ExportOptions, ExportRow, ExportTable, DEFAULT_PRECISION, MAX_PRECISION,
};

use crate::error::{Result, RiskMapError};
use serde_json::{Map, Value};
use std::io::Write;

/// Column holding the zone identifier
pub const ID_FIELD: &str = "zip_code";
/// Column holding the composite score
pub const SCORE_FIELD: &str = "risk_score";
/// Column holding the category label
pub const CATEGORY_FIELD: &str = "risk_category";

/// Name of the normalized-value column for a factor.
#[must_use]
pub fn normalized_field(factor: &str) -> String {
    format!("{factor}_norm")
}

/// Trait for result exporters
pub trait Exporter {
    /// Render the table to a string
    fn render(&self, table: &ExportTable<'_>, options: &ExportOptions) -> Result<String>;

    /// Write the rendered table to a writer
    fn write_to(
        &self,
        table: &ExportTable<'_>,
        options: &ExportOptions,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let rendered = self.render(table, options)?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Get the format this exporter produces
    fn format(&self) -> ExportFormat;
}

/// Create an exporter for the given format
#[must_use]
pub fn create_exporter(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Tabular => Box::new(TabularExporter::new()),
        ExportFormat::Geo => Box::new(GeoExporter::new()),
        ExportFormat::Json => Box::new(JsonExporter::new()),
    }
}

/// Round a value for output.
pub(crate) fn round_output(value: f64, precision: u32) -> f64 {
    crate::scoring::round_to(value, precision)
}

/// Convert a float to a JSON number, rejecting non-finite values.
pub(crate) fn json_number(value: f64) -> Result<Value> {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| RiskMapError::Serialization(format!("non-finite value {value}")))
}

/// Flat field map for one zone, shared by the JSON-based exporters.
///
/// Scores and normalized values are rounded to the export precision; raw
/// attributes are written as loaded. Missing values become `null`.
pub(crate) fn zone_properties(
    row: &ExportRow<'_>,
    factors: &[String],
    options: &ExportOptions,
) -> Result<Map<String, Value>> {
    let mut properties = Map::new();
    properties.insert(ID_FIELD.to_string(), Value::String(row.score.zone_id.to_string()));
    properties.insert(
        SCORE_FIELD.to_string(),
        json_number(round_output(row.score.score, options.precision))?,
    );
    properties.insert(
        CATEGORY_FIELD.to_string(),
        Value::String(row.score.category.label().to_string()),
    );
    for factor in factors {
        let value = match row.score.normalized(factor) {
            Some(v) => json_number(round_output(v, options.precision))?,
            None => Value::Null,
        };
        properties.insert(normalized_field(factor), value);
    }
    if options.include_attributes {
        properties.insert("population".to_string(), json_number(row.record.population)?);
        properties.insert("area_km2".to_string(), json_number(row.record.area_km2)?);
        for factor in factors {
            let value = match row.raw_factor(factor) {
                Some(v) => json_number(v)?,
                None => Value::Null,
            };
            properties.insert(factor.clone(), value);
        }
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_exporter_formats() {
        for format in [ExportFormat::Tabular, ExportFormat::Geo, ExportFormat::Json] {
            assert_eq!(create_exporter(format).format(), format);
        }
    }

    #[test]
    fn test_normalized_field() {
        assert_eq!(normalized_field("bird_density"), "bird_density_norm");
    }
}
