//! Export type definitions.

use crate::error::RiskMapError;
use crate::model::{ZoneRecord, ZoneScore};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default number of decimals on exported scores
pub const DEFAULT_PRECISION: u32 = 4;
/// Largest supported export precision; beyond this f64 rounding is noise.
pub const MAX_PRECISION: u32 = 12;

/// Serialization target for a scoring result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Flat delimited records
    #[default]
    #[value(alias = "csv")]
    #[serde(alias = "csv")]
    Tabular,
    /// GeoJSON FeatureCollection with geometry
    #[value(alias = "geojson")]
    #[serde(alias = "geojson")]
    Geo,
    /// Structured JSON with run metadata
    Json,
}

impl ExportFormat {
    /// Conventional file extension for the format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Tabular => "csv",
            Self::Geo => "geojson",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tabular => write!(f, "tabular"),
            Self::Geo => write!(f, "geo"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = RiskMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tabular" | "csv" => Ok(Self::Tabular),
            "geo" | "geojson" => Ok(Self::Geo),
            "json" => Ok(Self::Json),
            _ => Err(RiskMapError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// What an export includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExportOptions {
    /// Append population, area and raw factor values
    pub include_attributes: bool,
    /// Decimal places on scores and normalized values
    pub precision: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_attributes: false,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub const fn with_attributes(mut self) -> Self {
        self.include_attributes = true;
        self
    }

    #[must_use]
    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Reject a precision the exporters cannot represent.
    pub fn validate(&self) -> Result<(), RiskMapError> {
        if self.precision > MAX_PRECISION {
            return Err(RiskMapError::validation(format!(
                "export precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// One zone's score joined with its input record
#[derive(Debug, Clone, Copy)]
pub struct ExportRow<'a> {
    pub record: &'a ZoneRecord,
    pub score: &'a ZoneScore,
}

impl ExportRow<'_> {
    /// Raw input value of a factor, deriving population density when the
    /// record does not carry it.
    #[must_use]
    pub fn raw_factor(&self, factor: &str) -> Option<f64> {
        self.record.factor_value(factor)
    }
}

/// A scoring result ready for serialization
#[derive(Debug, Clone)]
pub struct ExportTable<'a> {
    /// Weighted factor names, in weight order
    pub factors: &'a [String],
    pub rows: Vec<ExportRow<'a>>,
}

impl ExportTable<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
