//! Zone input parsers.
//!
//! This module reads per-zone attribute tables into [`ZoneRecord`]s:
//! - CSV: header row, one zone per line
//! - JSON: an array of record objects
//! - GeoJSON: a FeatureCollection whose properties hold the attributes
//!
//! Boundary files can also be read on their own and joined onto records by
//! zone id ([`parse_geometries`], [`attach_geometries`]).
//!
//! ## Usage
//!
//! ```
//! use riskmap_tools::parsers::{parse_zones_str, InputFormat, ParseOptions};
//!
//! let csv = "zip_code,population,area_km2,bird_density\n10001,21102,1.6,40.5\n";
//! let zones = parse_zones_str(csv, InputFormat::Csv, &ParseOptions::default())?;
//! assert_eq!(zones[0].factor("bird_density"), Some(40.5));
//! # Ok::<(), riskmap_tools::RiskMapError>(())
//! ```
//!
//! [`ZoneRecord`]: crate::model::ZoneRecord

mod csv;
mod geojson;
mod json;
mod traits;

pub use csv::CsvZoneParser;
pub use geojson::{attach_geometries, parse_geometries, GeoJsonZoneParser};
pub use json::JsonZoneParser;
pub use traits::{is_missing_marker, ParseOptions, ZoneParser, AREA_COLUMNS, POPULATION_COLUMN};

use crate::error::{ErrorContext, ParseErrorKind, Result, RiskMapError};
use crate::model::ZoneRecord;
use std::path::Path;

/// Maximum input file size (256 MB); zone tables are a few hundred rows.
const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Zone input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    GeoJson,
}

impl InputFormat {
    /// Format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "geojson" => Ok(Self::GeoJson),
            _ => Err(RiskMapError::parse(
                path.display().to_string(),
                ParseErrorKind::UnknownFormat(path.display().to_string()),
            )),
        }
    }

    /// Sniff the format from content: a FeatureCollection object is
    /// GeoJSON, any other JSON is a record array, everything else CSV.
    #[must_use]
    pub fn detect(content: &str) -> Self {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with('{') && trimmed.contains("\"FeatureCollection\"") {
            Self::GeoJson
        } else if trimmed.starts_with('[') || trimmed.starts_with('{') {
            Self::Json
        } else {
            Self::Csv
        }
    }

    fn parser(self) -> Box<dyn ZoneParser> {
        match self {
            Self::Csv => Box::new(CsvZoneParser::new()),
            Self::Json => Box::new(JsonZoneParser::new()),
            Self::GeoJson => Box::new(GeoJsonZoneParser::new()),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.parser().name())
    }
}

/// Read a zone file, choosing the parser from its extension.
///
/// Files without a recognised extension are sniffed from their content.
pub fn parse_zones(path: &Path, options: &ParseOptions) -> Result<Vec<ZoneRecord>> {
    let content = read_input(path)?;
    let format = InputFormat::from_path(path).unwrap_or_else(|_| InputFormat::detect(&content));
    parse_zones_str(&content, format, options).with_context(|| path.display().to_string())
}

/// Parse zone records from content in a known format.
pub fn parse_zones_str(
    content: &str,
    format: InputFormat,
    options: &ParseOptions,
) -> Result<Vec<ZoneRecord>> {
    format.parser().parse_str(content, options)
}

/// Read a file, rejecting ones too large to be a zone table.
pub fn read_input(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).map_err(|e| RiskMapError::io(path, e))?;
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(RiskMapError::validation(format!(
            "{} is {} MB, exceeding the {} MB input limit",
            path.display(),
            metadata.len() / (1024 * 1024),
            MAX_INPUT_FILE_SIZE / (1024 * 1024)
        )));
    }
    std::fs::read_to_string(path).map_err(|e| RiskMapError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("z.csv")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("z.JSON")).unwrap(), InputFormat::Json);
        assert_eq!(
            InputFormat::from_path(Path::new("nyc.geojson")).unwrap(),
            InputFormat::GeoJson
        );
        assert!(InputFormat::from_path(Path::new("z.shp")).is_err());
    }

    #[test]
    fn test_detect() {
        assert_eq!(
            InputFormat::detect(r#"{"type": "FeatureCollection", "features": []}"#),
            InputFormat::GeoJson
        );
        assert_eq!(InputFormat::detect("[]"), InputFormat::Json);
        assert_eq!(InputFormat::detect("zip_code,population"), InputFormat::Csv);
    }

    #[test]
    fn test_empty_csv_is_empty() {
        let zones = parse_zones_str("", InputFormat::Csv, &ParseOptions::default()).unwrap();
        assert!(zones.is_empty());
    }
}
