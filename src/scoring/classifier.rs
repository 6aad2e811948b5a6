//! Score to risk-tier classification.

use crate::error::{Result, RiskMapError};
use crate::model::RiskCategory;
use serde::{Deserialize, Serialize};

/// Interior tier boundaries `[low|medium, medium|high, high|very high]`.
///
/// Always finite, inside [0, 1] and strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct CutPoints([f64; 3]);

impl CutPoints {
    pub fn new(medium: f64, high: f64, very_high: f64) -> Result<Self> {
        let points = [medium, high, very_high];
        if points.iter().any(|p| !p.is_finite() || !(0.0..=1.0).contains(p)) {
            return Err(RiskMapError::config(format!(
                "cut points must lie within [0, 1], got {points:?}"
            )));
        }
        if !(medium < high && high < very_high) {
            return Err(RiskMapError::config(format!(
                "cut points must be strictly increasing, got {points:?}"
            )));
        }
        Ok(Self(points))
    }

    #[must_use]
    pub const fn values(&self) -> [f64; 3] {
        self.0
    }

    /// Lower bound of a category's interval.
    #[must_use]
    pub const fn lower_bound(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::Low => 0.0,
            RiskCategory::Medium => self.0[0],
            RiskCategory::High => self.0[1],
            RiskCategory::VeryHigh => self.0[2],
        }
    }
}

impl Default for CutPoints {
    fn default() -> Self {
        Self([0.25, 0.5, 0.75])
    }
}

impl TryFrom<[f64; 3]> for CutPoints {
    type Error = RiskMapError;

    fn try_from(points: [f64; 3]) -> Result<Self> {
        Self::new(points[0], points[1], points[2])
    }
}

impl From<CutPoints> for [f64; 3] {
    fn from(points: CutPoints) -> Self {
        points.0
    }
}

/// Maps a score onto one of four ordinal tiers using half-open intervals:
/// `[0, c1)` Low, `[c1, c2)` Medium, `[c2, c3)` High, `[c3, 1]` Very High.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskClassifier {
    cut_points: CutPoints,
}

impl RiskClassifier {
    #[must_use]
    pub const fn new(cut_points: CutPoints) -> Self {
        Self { cut_points }
    }

    /// Build a classifier from raw boundaries, validating them.
    pub fn with_cut_points(medium: f64, high: f64, very_high: f64) -> Result<Self> {
        CutPoints::new(medium, high, very_high).map(Self::new)
    }

    #[must_use]
    pub const fn cut_points(&self) -> CutPoints {
        self.cut_points
    }

    /// Classify a score. Values slightly outside [0, 1] from floating-point
    /// drift are clamped first.
    #[must_use]
    pub fn classify(&self, score: f64) -> RiskCategory {
        let [medium, high, very_high] = self.cut_points.values();
        let score = score.clamp(0.0, 1.0);
        if score < medium {
            RiskCategory::Low
        } else if score < high {
            RiskCategory::Medium
        } else if score < very_high {
            RiskCategory::High
        } else {
            RiskCategory::VeryHigh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_boundaries() {
        let classifier = RiskClassifier::default();
        assert_eq!(classifier.classify(0.0), RiskCategory::Low);
        assert_eq!(classifier.classify(0.2499), RiskCategory::Low);
        assert_eq!(classifier.classify(0.25), RiskCategory::Medium);
        assert_eq!(classifier.classify(0.499_999_9), RiskCategory::Medium);
        assert_eq!(classifier.classify(0.5), RiskCategory::High);
        assert_eq!(classifier.classify(0.75), RiskCategory::VeryHigh);
        assert_eq!(classifier.classify(1.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_drift_is_clamped() {
        let classifier = RiskClassifier::default();
        assert_eq!(classifier.classify(-1e-12), RiskCategory::Low);
        assert_eq!(classifier.classify(1.000_000_1), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_non_increasing_cut_points_rejected() {
        assert!(matches!(
            RiskClassifier::with_cut_points(0.5, 0.5, 0.75),
            Err(RiskMapError::Config(_))
        ));
        assert!(RiskClassifier::with_cut_points(0.6, 0.4, 0.8).is_err());
        assert!(RiskClassifier::with_cut_points(0.2, 0.4, 1.2).is_err());
        assert!(RiskClassifier::with_cut_points(f64::NAN, 0.4, 0.8).is_err());
    }

    #[test]
    fn test_custom_cut_points() {
        let classifier = RiskClassifier::with_cut_points(0.1, 0.2, 0.3).unwrap();
        assert_eq!(classifier.classify(0.15), RiskCategory::Medium);
        assert_eq!(classifier.classify(0.35), RiskCategory::VeryHigh);
        assert!((classifier.cut_points().lower_bound(RiskCategory::High) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_cut_points_deserialize_validates() {
        let ok: CutPoints = serde_json::from_str("[0.2, 0.4, 0.6]").unwrap();
        assert_eq!(ok.values(), [0.2, 0.4, 0.6]);
        assert!(serde_json::from_str::<CutPoints>("[0.4, 0.2, 0.6]").is_err());
    }
}
