//! Zone input records.

use crate::error::{Result, RiskMapError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable zone identifier (a zip code for the NYC data set).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Build an id, zero-padding purely numeric values to five digits.
    ///
    /// Census tables drop leading zeros (`501` for `00501`); boundary files
    /// keep them, so ids are padded before records from both are joined.
    #[must_use]
    pub fn zip_code(value: impl Into<String>) -> Self {
        let raw = value.into();
        let trimmed = raw.trim();
        // "10001.0" from spreadsheets that stored the zip as a float
        let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        if !trimmed.is_empty() && trimmed.len() < 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Self(format!("{trimmed:0>5}"))
        } else {
            Self(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ZoneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ZoneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ZoneId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Opaque zone geometry.
///
/// Held as the raw GeoJSON geometry object and handed to the geo exporter
/// untouched. The engine never reads coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(serde_json::Value);

impl Geometry {
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}

/// One geographic zone's input attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Zone identifier, unique within a loaded collection
    #[serde(alias = "zip_code")]
    pub id: ZoneId,
    /// Population count
    pub population: f64,
    /// Area in square kilometres
    #[serde(alias = "area")]
    pub area_km2: f64,
    /// Named risk-factor values; `None` marks a factor known to be absent
    #[serde(default)]
    pub factors: IndexMap<String, Option<f64>>,
    /// Optional geometry, passed through to geo exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl ZoneRecord {
    /// Create a record with no factor values and no geometry.
    pub fn new(id: impl Into<ZoneId>, population: f64, area_km2: f64) -> Self {
        Self {
            id: id.into(),
            population,
            area_km2,
            factors: IndexMap::new(),
            geometry: None,
        }
    }

    /// Set a factor value.
    #[must_use]
    pub fn with_factor(mut self, name: impl Into<String>, value: f64) -> Self {
        self.factors.insert(name.into(), Some(value));
        self
    }

    /// Record a factor as explicitly absent.
    #[must_use]
    pub fn with_missing(mut self, name: impl Into<String>) -> Self {
        self.factors.insert(name.into(), None);
        self
    }

    /// Attach a geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Present value of a factor, `None` when absent or never recorded.
    #[must_use]
    pub fn factor(&self, name: &str) -> Option<f64> {
        self.factors.get(name).copied().flatten()
    }

    /// Value of a factor for scoring; population density falls back to
    /// [`population_density`](Self::population_density) when not supplied.
    #[must_use]
    pub fn factor_value(&self, name: &str) -> Option<f64> {
        match self.factor(name) {
            Some(value) => Some(value),
            None if name == super::factors::POPULATION_DENSITY => Some(self.population_density()),
            None => None,
        }
    }

    /// People per square kilometre.
    ///
    /// A zero area gives 0 rather than infinity, so a zone without a usable
    /// boundary does not dominate the density scale.
    #[must_use]
    pub fn population_density(&self) -> f64 {
        if self.area_km2 > 0.0 {
            self.population / self.area_km2
        } else {
            0.0
        }
    }

    /// Check the record's own invariants.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(RiskMapError::validation("zone identifier must not be empty"));
        }
        if !self.population.is_finite() || self.population < 0.0 {
            return Err(RiskMapError::validation(format!(
                "zone {}: population must be a non-negative number, got {}",
                self.id, self.population
            )));
        }
        if !self.area_km2.is_finite() || self.area_km2 < 0.0 {
            return Err(RiskMapError::validation(format!(
                "zone {}: area must be a non-negative number, got {}",
                self.id, self.area_km2
            )));
        }
        if self.factor(super::factors::POPULATION_DENSITY).is_none()
            && !self.population_density().is_finite()
        {
            return Err(RiskMapError::validation(format!(
                "zone {}: population {} over area {} km2 overflows population density",
                self.id, self.population, self.area_km2
            )));
        }
        for (name, value) in &self.factors {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(RiskMapError::validation(format!(
                        "zone {}: factor '{name}' is not a finite number ({v})",
                        self.id
                    )));
                }
            }
        }
        Ok(())
    }
}
