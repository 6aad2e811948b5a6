//! Tabular (CSV) exporter.
//!
//! Writes one row per zone, suitable for spreadsheet import and for
//! choropleth tools that join on `zip_code`.

use super::{
    normalized_field, ExportFormat, ExportOptions, ExportTable, Exporter, CATEGORY_FIELD,
    ID_FIELD, SCORE_FIELD,
};
use crate::error::Result;

/// CSV exporter.
pub struct TabularExporter;

impl TabularExporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for TabularExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for TabularExporter {
    fn render(&self, table: &ExportTable<'_>, options: &ExportOptions) -> Result<String> {
        let precision = options.precision as usize;
        let mut content = String::new();

        let mut header = vec![
            ID_FIELD.to_string(),
            SCORE_FIELD.to_string(),
            CATEGORY_FIELD.to_string(),
        ];
        header.extend(table.factors.iter().map(|f| normalized_field(f)));
        if options.include_attributes {
            header.push("population".to_string());
            header.push("area_km2".to_string());
            header.extend(table.factors.iter().cloned());
        }
        push_row(&mut content, &header);

        for row in &table.rows {
            let mut fields = vec![
                row.score.zone_id.to_string(),
                format!("{:.*}", precision, row.score.score),
                row.score.category.label().to_string(),
            ];
            for factor in table.factors {
                fields.push(
                    row.score
                        .normalized(factor)
                        .map(|v| format!("{v:.precision$}"))
                        .unwrap_or_default(),
                );
            }
            if options.include_attributes {
                fields.push(row.record.population.to_string());
                fields.push(row.record.area_km2.to_string());
                for factor in table.factors {
                    fields.push(row.raw_factor(factor).map(|v| v.to_string()).unwrap_or_default());
                }
            }
            push_row(&mut content, &fields);
        }

        Ok(content)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Tabular
    }
}

fn push_row(content: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
    content.push_str(&line.join(","));
    content.push('\n');
}

/// Quote a field when it holds a delimiter, quote or line break, doubling
/// embedded quotes per RFC 4180. Line breaks are flattened to spaces.
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\"").replace(['\n', '\r'], " "))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskCategory, ZoneId, ZoneRecord, ZoneScore};
    use crate::reports::ExportRow;
    use indexmap::IndexMap;

    fn fixture() -> (Vec<String>, ZoneRecord, ZoneScore) {
        let factors = vec!["bird_density".to_string(), "water_proximity".to_string()];
        let record = ZoneRecord::new("10001", 1200.0, 2.0).with_factor("bird_density", 40.0);
        let mut normalized = IndexMap::new();
        normalized.insert("bird_density".to_string(), 0.123_456);
        normalized.insert("water_proximity".to_string(), 0.5);
        let score = ZoneScore {
            zone_id: ZoneId::new("10001"),
            score: 0.311_728,
            category: RiskCategory::Medium,
            normalized,
            filled: vec!["water_proximity".to_string()],
        };
        (factors, record, score)
    }

    #[test]
    fn test_header_and_row() {
        let (factors, record, score) = fixture();
        let table = ExportTable {
            factors: &factors,
            rows: vec![ExportRow {
                record: &record,
                score: &score,
            }],
        };
        let out = TabularExporter::new()
            .render(&table, &ExportOptions::default())
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "zip_code,risk_score,risk_category,bird_density_norm,water_proximity_norm"
        );
        assert_eq!(lines[1], "10001,0.3117,Medium,0.1235,0.5000");
    }

    #[test]
    fn test_attributes_leave_missing_blank() {
        let (factors, record, score) = fixture();
        let table = ExportTable {
            factors: &factors,
            rows: vec![ExportRow {
                record: &record,
                score: &score,
            }],
        };
        let options = ExportOptions::default().with_attributes().with_precision(2);
        let out = TabularExporter::new().render(&table, &options).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("population,area_km2,bird_density,water_proximity"));
        assert_eq!(lines[1], "10001,0.31,Medium,0.12,0.50,1200,2,40,");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("10001"), "10001");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
