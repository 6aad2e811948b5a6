//! Geo (GeoJSON) exporter.

use super::{zone_properties, ExportFormat, ExportOptions, ExportRow, ExportTable, Exporter};
use crate::error::{Result, RiskMapError};
use serde_json::{json, Value};

/// GeoJSON FeatureCollection exporter.
///
/// Geometry is copied through untouched; zones without one get a `null`
/// geometry, which GeoJSON permits for unlocated features.
pub struct GeoExporter;

impl GeoExporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn feature(&self, row: &ExportRow<'_>, factors: &[String], options: &ExportOptions) -> Result<Value> {
        let properties = zone_properties(row, factors, options)?;
        let geometry = row
            .record
            .geometry
            .as_ref()
            .map_or(Value::Null, |g| g.as_json().clone());

        Ok(json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": properties,
        }))
    }
}

impl Default for GeoExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for GeoExporter {
    fn render(&self, table: &ExportTable<'_>, options: &ExportOptions) -> Result<String> {
        let features = table
            .rows
            .iter()
            .map(|row| self.feature(row, table.factors, options))
            .collect::<Result<Vec<_>>>()?;
        let collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });

        serde_json::to_string(&collection).map_err(|e| RiskMapError::Serialization(e.to_string()))
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Geo
    }
}
