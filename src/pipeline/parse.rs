//! Zone loading stage.
//!
//! Reads the zone table, then joins boundary geometries when a geometry
//! file is configured.

use crate::config::InputConfig;
use crate::model::ZoneRecord;
use crate::parsers::{attach_geometries, parse_geometries, parse_zones, read_input, ParseOptions};
use anyhow::{Context, Result};
use std::path::Path;

/// Loaded zone records with the files they came from
#[derive(Debug)]
pub struct LoadedZones {
    /// Parsed records, geometry attached where available
    pub records: Vec<ZoneRecord>,
    /// Records that received a geometry from the geometry file
    pub geometries_attached: usize,
}

impl LoadedZones {
    /// Records carrying any geometry.
    #[must_use]
    pub fn with_geometry(&self) -> usize {
        self.records.iter().filter(|r| r.geometry.is_some()).count()
    }
}

/// Read zones from `path`, applying the input options.
pub fn load_zones(path: &Path, input: &InputConfig, quiet: bool) -> Result<LoadedZones> {
    if !quiet {
        tracing::info!("Loading zones: {:?}", path);
    }

    let options = ParseOptions::from(input);
    let mut records = parse_zones(path, &options)
        .with_context(|| format!("Failed to load zones from {}", path.display()))?;

    let mut geometries_attached = 0;
    if let Some(ref geometry_file) = input.geometry_file {
        let content = read_input(geometry_file)?;
        let geometries = parse_geometries(&content, &options).with_context(|| {
            format!("Failed to read geometries from {}", geometry_file.display())
        })?;
        geometries_attached = attach_geometries(&mut records, &geometries);
        if geometries_attached < records.len() {
            tracing::warn!(
                "{} of {} zones have no boundary in {}",
                records.len() - geometries_attached,
                records.len(),
                geometry_file.display()
            );
        }
    }

    if !quiet {
        tracing::info!("Loaded {} zones", records.len());
    }

    Ok(LoadedZones {
        records,
        geometries_attached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_csv_with_geometry_file() {
        let tmp = TempDir::new().unwrap();
        let zones = tmp.path().join("zones.csv");
        std::fs::write(
            &zones,
            "zip_code,population,area_km2,bird_density\n10001,100,1,3\n10002,50,1,\n",
        )
        .unwrap();
        let boundaries = tmp.path().join("boundaries.geojson");
        std::fs::write(
            &boundaries,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"zip_code":"10001"},
                 "geometry":{"type":"Point","coordinates":[-73.99,40.75]}}]}"#,
        )
        .unwrap();

        let input = InputConfig {
            geometry_file: Some(boundaries),
            ..InputConfig::default()
        };
        let loaded = load_zones(&zones, &input, true).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.geometries_attached, 1);
        assert_eq!(loaded.with_geometry(), 1);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_zones(Path::new("/nonexistent/zones.csv"), &InputConfig::default(), true)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load zones"));
    }
}
