//! GeoJSON zone parser and boundary geometry loading.

use super::traits::{is_missing_marker, ParseOptions, ZoneParser, AREA_COLUMNS, POPULATION_COLUMN};
use crate::error::{ErrorContext, ParseErrorKind, Result, RiskMapError};
use crate::model::{factors, Geometry, ZoneId, ZoneRecord};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Identifier properties tried after the configured id column when reading
/// boundary files (NYC MODZCTA and Census ZCTA layers).
const GEOMETRY_ID_FALLBACKS: &[&str] = &["zip_code", "modzcta", "MODZCTA", "zcta", "ZCTA5CE20", "ZIPCODE"];

/// GeoJSON FeatureCollection zone parser
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonZoneParser;

impl GeoJsonZoneParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ZoneParser for GeoJsonZoneParser {
    fn parse_str(&self, content: &str, options: &ParseOptions) -> Result<Vec<ZoneRecord>> {
        let features = feature_array(content)?;
        let factor_keys = factor_properties(&features, options);
        let mut records = Vec::with_capacity(features.len());

        for (index, feature) in features.iter().enumerate() {
            let context = || format!("feature {index}");
            let properties = feature
                .get("properties")
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    RiskMapError::parse(
                        context(),
                        ParseErrorKind::InvalidJson("feature has no properties object".to_string()),
                    )
                })?;

            let id = property_id(properties, &[options.id_column.as_str()]).ok_or_else(|| {
                RiskMapError::parse(context(), ParseErrorKind::MissingColumn(options.id_column.clone()))
            })?;
            let population = required_property(properties, &[POPULATION_COLUMN]).with_context(context)?;
            let area = required_property(properties, AREA_COLUMNS).with_context(context)?;

            let mut record = ZoneRecord::new(options.zone_id(&id), population, area);
            for (key, value) in properties {
                if options.is_reserved(key) {
                    continue;
                }
                match numeric_value(value) {
                    NumericValue::Present(v) => record = record.with_factor(key.clone(), v),
                    NumericValue::Missing => record = record.with_missing(key.clone()),
                    NumericValue::NotNumeric if factor_keys.contains(key.as_str()) => {
                        return Err(RiskMapError::parse(
                            context(),
                            ParseErrorKind::InvalidNumber {
                                row: index,
                                column: key.clone(),
                                value: value.to_string(),
                            },
                        ));
                    }
                    NumericValue::NotNumeric => {}
                }
            }
            if let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) {
                record = record.with_geometry(Geometry::new(geometry.clone()));
            }
            records.push(record);
        }

        debug!(zones = records.len(), "Parsed GeoJSON zone features");
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "GeoJSON"
    }
}

/// Read boundary geometries keyed by zone id.
///
/// The id is taken from the configured id property, then from the usual
/// NYC and Census identifier properties. Features without an id or a
/// geometry are skipped.
pub fn parse_geometries(content: &str, options: &ParseOptions) -> Result<IndexMap<ZoneId, Geometry>> {
    let features = feature_array(content)?;
    let mut candidates = vec![options.id_column.as_str()];
    candidates.extend(GEOMETRY_ID_FALLBACKS.iter().copied());

    let mut geometries = IndexMap::with_capacity(features.len());
    let mut skipped = 0_usize;
    for feature in &features {
        let id = feature
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|props| property_id(props, &candidates));
        let geometry = feature.get("geometry").filter(|g| !g.is_null());
        match (id, geometry) {
            (Some(id), Some(geometry)) => {
                geometries.insert(options.zone_id(&id), Geometry::new(geometry.clone()));
            }
            _ => skipped += 1,
        }
    }

    debug!(geometries = geometries.len(), skipped, "Parsed boundary geometries");
    Ok(geometries)
}

/// Attach geometries to records by id, returning how many records matched.
///
/// Records that already carry a geometry keep it.
pub fn attach_geometries(records: &mut [ZoneRecord], geometries: &IndexMap<ZoneId, Geometry>) -> usize {
    let mut matched = 0;
    for record in records.iter_mut() {
        if record.geometry.is_some() {
            continue;
        }
        if let Some(geometry) = geometries.get(&record.id) {
            record.geometry = Some(geometry.clone());
            matched += 1;
        }
    }
    matched
}

fn feature_array(content: &str) -> Result<Vec<Value>> {
    let root: Value = serde_json::from_str(content).context("reading GeoJSON")?;
    let is_collection = root.get("type").and_then(Value::as_str) == Some("FeatureCollection");
    match root {
        Value::Object(mut map) if is_collection => match map.remove("features") {
            Some(Value::Array(features)) => Ok(features),
            _ => Err(RiskMapError::parse(
                "reading GeoJSON",
                ParseErrorKind::InvalidJson("FeatureCollection has no features array".to_string()),
            )),
        },
        _ => Err(RiskMapError::parse(
            "reading GeoJSON",
            ParseErrorKind::NotFeatureCollection,
        )),
    }
}

/// Property names treated as factors: the well-known factor names plus any
/// property holding a number in at least one feature.
fn factor_properties<'a>(features: &'a [Value], options: &ParseOptions) -> HashSet<&'a str> {
    features
        .iter()
        .filter_map(|feature| feature.get("properties").and_then(Value::as_object))
        .flat_map(Map::iter)
        .filter(|(key, value)| {
            !options.is_reserved(key.as_str())
                && matches!(numeric_value(value), NumericValue::Present(_))
        })
        .map(|(key, _)| key.as_str())
        .chain(factors::ALL.iter().copied())
        .collect()
}

fn property_id(properties: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|key| match properties.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn required_property(properties: &Map<String, Value>, names: &[&str]) -> Result<f64> {
    let found = names
        .iter()
        .find_map(|name| properties.get(*name).map(|value| (*name, value)));
    match found {
        Some((_, value)) => match numeric_value(value) {
            NumericValue::Present(v) => Ok(v),
            _ => Err(RiskMapError::parse(
                "reading properties",
                ParseErrorKind::InvalidNumber {
                    row: 0,
                    column: names[0].to_string(),
                    value: value.to_string(),
                },
            )),
        },
        None => Err(RiskMapError::parse(
            "reading properties",
            ParseErrorKind::MissingColumn(names.join(" or ")),
        )),
    }
}

enum NumericValue {
    Present(f64),
    Missing,
    NotNumeric,
}

fn numeric_value(value: &Value) -> NumericValue {
    match value {
        Value::Null => NumericValue::Missing,
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map_or(NumericValue::NotNumeric, NumericValue::Present),
        Value::String(s) if is_missing_marker(s) => NumericValue::Missing,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map_or(NumericValue::NotNumeric, NumericValue::Present),
        _ => NumericValue::NotNumeric,
    }
}
