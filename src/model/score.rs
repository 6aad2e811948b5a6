//! Scoring output types.

use super::zone::ZoneId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal risk tier.
///
/// Variants are declared from lowest to highest so the derived `Ord`
/// matches the risk ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskCategory {
    /// All categories, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    /// The fixed label downstream renderers key their colour scale on.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Parse a label, case-insensitively. Returns None for unrecognized values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "very high" => Some(Self::VeryHigh),
            _ => None,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of scoring one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneScore {
    /// Source record identifier
    pub zone_id: ZoneId,
    /// Composite score in [0, 1], rounded to 6 decimals
    pub score: f64,
    /// Tier assigned by the classifier
    pub category: RiskCategory,
    /// Normalized value of every weighted factor, in weight-set order
    pub normalized: IndexMap<String, f64>,
    /// Factors that were absent and received the default fill value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filled: Vec<String>,
}

impl ZoneScore {
    /// Normalized value used for a factor.
    #[must_use]
    pub fn normalized(&self, factor: &str) -> Option<f64> {
        self.normalized.get(factor).copied()
    }

    /// Whether the factor was default-filled for this zone.
    #[must_use]
    pub fn was_filled(&self, factor: &str) -> bool {
        self.filled.iter().any(|f| f == factor)
    }
}
