//! Delimited-text zone parser.
//!
//! Reads one zone per row from a header-led CSV table. Besides the id,
//! `population` and `area_km2` (or `area`) columns, every column with a
//! numeric cell (and every well-known factor column) becomes a factor. Text
//! columns such as a borough name are skipped; a stray non-numeric cell in a
//! factor column is an error.

use super::traits::{is_missing_marker, ParseOptions, ZoneParser, AREA_COLUMNS, POPULATION_COLUMN};
use crate::error::{ParseErrorKind, Result, RiskMapError};
use crate::model::{factors, ZoneRecord};
use tracing::debug;

/// CSV zone parser
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvZoneParser;

impl CsvZoneParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ZoneParser for CsvZoneParser {
    fn parse_str(&self, content: &str, options: &ParseOptions) -> Result<Vec<ZoneRecord>> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Ok(Vec::new());
        };
        let header: Vec<String> = split_line(header_line.trim_start_matches('\u{feff}'))
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let id_idx = column_index(&header, &options.id_column)?;
        let pop_idx = column_index(&header, POPULATION_COLUMN)?;
        let area_idx = AREA_COLUMNS
            .iter()
            .find_map(|name| header.iter().position(|h| h == name))
            .ok_or_else(|| {
                RiskMapError::parse(
                    "reading CSV header",
                    ParseErrorKind::MissingColumn(AREA_COLUMNS.join(" or ")),
                )
            })?;

        let mut rows = Vec::new();
        for (index, line) in lines {
            let fields = split_line(line);
            if fields.len() != header.len() {
                return Err(RiskMapError::parse(
                    "reading CSV rows",
                    ParseErrorKind::RaggedRow {
                        row: index + 1,
                        expected: header.len(),
                        found: fields.len(),
                    },
                ));
            }
            rows.push((index + 1, fields));
        }

        // A column is a factor once any cell in it is numeric; after that a
        // cell that is neither numeric nor a missing marker is an error.
        let factor_columns: Vec<usize> = (0..header.len())
            .filter(|&col| col != id_idx && col != pop_idx && col != area_idx)
            .filter(|&col| !options.is_reserved(&header[col]))
            .filter(|&col| {
                let numeric = factors::ALL.contains(&header[col].as_str())
                    || rows.iter().any(|(_, fields)| {
                        !is_missing_marker(&fields[col]) && parse_number(&fields[col]).is_some()
                    });
                if !numeric {
                    debug!(column = %header[col], "Skipping non-numeric column");
                }
                numeric
            })
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        for (row, fields) in &rows {
            let population = required_number(*row, &header[pop_idx], &fields[pop_idx])?;
            let area = required_number(*row, &header[area_idx], &fields[area_idx])?;
            let mut record = ZoneRecord::new(options.zone_id(&fields[id_idx]), population, area);
            for &col in &factor_columns {
                let cell = &fields[col];
                record = if is_missing_marker(cell) {
                    record.with_missing(header[col].clone())
                } else {
                    record.with_factor(header[col].clone(), required_number(*row, &header[col], cell)?)
                };
            }
            records.push(record);
        }

        debug!(
            zones = records.len(),
            factors = factor_columns.len(),
            "Parsed CSV zone table"
        );
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "CSV"
    }
}

fn column_index(header: &[String], name: &str) -> Result<usize> {
    header.iter().position(|h| h == name).ok_or_else(|| {
        RiskMapError::parse(
            "reading CSV header",
            ParseErrorKind::MissingColumn(name.to_string()),
        )
    })
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn required_number(row: usize, column: &str, cell: &str) -> Result<f64> {
    parse_number(cell).ok_or_else(|| {
        RiskMapError::parse(
            "reading CSV rows",
            ParseErrorKind::InvalidNumber {
                row,
                column: column.to_string(),
                value: cell.to_string(),
            },
        )
    })
}

/// Split one CSV line into fields, honouring double-quoted fields with
/// `""` escapes.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Vec<ZoneRecord>> {
        CsvZoneParser::new().parse_str(content, &ParseOptions::default())
    }

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_line("\"a,b\",c"), vec!["a,b", "c"]);
        assert_eq!(split_line("\"say \"\"hi\"\"\",x"), vec!["say \"hi\"", "x"]);
        assert_eq!(split_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(split_line("a,b\r"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_basic_table() {
        let csv = "zip_code,population,area_km2,bird_density,borough\n\
                   10001,21102,1.6,40.5,Manhattan\n\
                   501,100,0.5,,Queens\n";
        let records = parse(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "10001");
        assert_eq!(records[0].factor("bird_density"), Some(40.5));
        assert!(!records[0].factors.contains_key("borough"));
        assert_eq!(records[1].id.as_str(), "00501");
        assert!(records[1].factors.contains_key("bird_density"));
        assert_eq!(records[1].factor("bird_density"), None);
    }

    #[test]
    fn test_missing_markers_and_area_alias() {
        let csv = "zip_code,population,area,water_proximity\n\
                   10001,10,1,NA\n\
                   10002,20,2,null\n\
                   10003,30,3,0.7\n";
        let records = parse(csv).unwrap();
        assert_eq!(records[2].area_km2, 3.0);
        assert_eq!(records[0].factor("water_proximity"), None);
        assert_eq!(records[1].factor("water_proximity"), None);
        assert_eq!(records[2].factor("water_proximity"), Some(0.7));
    }

    #[test]
    fn test_thousands_separator_in_quoted_population() {
        let csv = "zip_code,population,area_km2\n10001,\"21,102\",1.6\n";
        let records = parse(csv).unwrap();
        assert_eq!(records[0].population, 21102.0);
    }

    #[test]
    fn test_missing_id_column() {
        let err = parse("zip,population,area_km2\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            RiskMapError::Parse {
                source: ParseErrorKind::MissingColumn(_),
                ..
            }
        ));
    }

    #[test]
    fn test_ragged_row() {
        let err = parse("zip_code,population,area_km2\n10001,2\n").unwrap_err();
        assert!(matches!(
            err,
            RiskMapError::Parse {
                source: ParseErrorKind::RaggedRow { row: 2, expected: 3, found: 2 },
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_population() {
        let err = parse("zip_code,population,area_km2\n10001,lots,1\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse zone data"));
    }

    #[test]
    fn test_typo_in_factor_column_is_an_error() {
        let csv = "zip_code,population,area_km2,bird_density\n\
                   10001,10000,1,100\n\
                   10002,5000,1,50\n\
                   10003,20000,1,2OO\n";
        let err = parse(csv).unwrap_err();
        match err {
            RiskMapError::Parse {
                source: ParseErrorKind::InvalidNumber { row, column, value },
                ..
            } => {
                assert_eq!(row, 4);
                assert_eq!(column, "bird_density");
                assert_eq!(value, "2OO");
            }
            other => panic!("Expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_text_in_known_factor_column_is_an_error() {
        let csv = "zip_code,population,area_km2,water_proximity\n10001,10,1,near\n";
        assert!(matches!(
            parse(csv),
            Err(RiskMapError::Parse {
                source: ParseErrorKind::InvalidNumber { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_all_missing_custom_column_is_skipped() {
        let csv = "zip_code,population,area_km2,notes\n10001,10,1,\n10002,20,2,NA\n";
        let records = parse(csv).unwrap();
        assert!(!records[0].factors.contains_key("notes"));
    }

    #[test]
    fn test_custom_id_column() {
        let options = ParseOptions {
            id_column: "modzcta".to_string(),
            pad_zip_codes: true,
        };
        let records = CsvZoneParser::new()
            .parse_str("modzcta,population,area_km2\n10001,1,1\n", &options)
            .unwrap();
        assert_eq!(records[0].id.as_str(), "10001");
    }
}
