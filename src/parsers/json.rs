//! JSON zone parser: an array of zone record objects.

use super::traits::{ParseOptions, ZoneParser};
use crate::error::{ErrorContext, Result};
use crate::model::ZoneRecord;

/// JSON zone parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonZoneParser;

impl JsonZoneParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ZoneParser for JsonZoneParser {
    fn parse_str(&self, content: &str, options: &ParseOptions) -> Result<Vec<ZoneRecord>> {
        let mut records: Vec<ZoneRecord> =
            serde_json::from_str(content).context("reading zone record array")?;
        for record in &mut records {
            record.id = options.zone_id(record.id.as_str());
        }
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "JSON"
    }
}
