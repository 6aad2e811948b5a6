//! Parser trait and shared input options.

use crate::config::{InputConfig, DEFAULT_ID_COLUMN};
use crate::error::Result;
use crate::model::{ZoneId, ZoneRecord};

/// Population column name
pub const POPULATION_COLUMN: &str = "population";
/// Area column names, preferred first
pub const AREA_COLUMNS: &[&str] = &["area_km2", "area"];

/// Options shared by every zone parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Column or property holding the zone identifier
    pub id_column: String,
    /// Zero-pad purely numeric identifiers to five digits
    pub pad_zip_codes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            pad_zip_codes: true,
        }
    }
}

impl From<&InputConfig> for ParseOptions {
    fn from(config: &InputConfig) -> Self {
        Self {
            id_column: config.id_column.clone(),
            pad_zip_codes: config.pad_zip_codes,
        }
    }
}

impl ParseOptions {
    /// Build a zone id from a raw cell, applying padding when enabled.
    #[must_use]
    pub fn zone_id(&self, raw: &str) -> ZoneId {
        if self.pad_zip_codes {
            ZoneId::zip_code(raw)
        } else {
            ZoneId::new(raw)
        }
    }

    /// True for columns that hold record fields rather than factors.
    #[must_use]
    pub fn is_reserved(&self, column: &str) -> bool {
        column == self.id_column || column == POPULATION_COLUMN || AREA_COLUMNS.contains(&column)
    }
}

/// Markers read as a missing value.
#[must_use]
pub fn is_missing_marker(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty()
        || cell.eq_ignore_ascii_case("na")
        || cell.eq_ignore_ascii_case("nan")
        || cell.eq_ignore_ascii_case("null")
        || cell.eq_ignore_ascii_case("n/a")
}

/// Trait for zone input parsers
pub trait ZoneParser {
    /// Parse zone records from file content
    fn parse_str(&self, content: &str, options: &ParseOptions) -> Result<Vec<ZoneRecord>>;

    /// Human-readable format name
    fn name(&self) -> &'static str;
}
