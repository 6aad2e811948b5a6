//! Descriptive statistics over a scoring result.

use crate::model::{RiskCategory, ZoneScore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distribution of composite scores across zones.
///
/// Quartiles use linear interpolation between closest ranks. An empty
/// result yields a zero count and zero statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 with fewer than two zones
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Zones per category, every category present
    pub distribution: BTreeMap<RiskCategory, usize>,
}

impl ScoreSummary {
    #[must_use]
    pub fn from_scores(scores: &[ZoneScore]) -> Self {
        let mut distribution: BTreeMap<RiskCategory, usize> =
            RiskCategory::ALL.iter().map(|c| (*c, 0)).collect();
        for score in scores {
            *distribution.entry(score.category).or_insert(0) += 1;
        }

        let mut values: Vec<f64> = scores.iter().map(|s| s.score).collect();
        values.sort_by(f64::total_cmp);

        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                q1: 0.0,
                median: 0.0,
                q3: 0.0,
                max: 0.0,
                distribution,
            };
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        Self {
            count,
            mean,
            std_dev,
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[count - 1],
            distribution,
        }
    }

    /// Number of zones in a category.
    #[must_use]
    pub fn count_in(&self, category: RiskCategory) -> usize {
        self.distribution.get(&category).copied().unwrap_or(0)
    }
}

/// Quantile of sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
