//! Summary report for shell output.
//!
//! Provides a compact, human-readable view of a scoring run: distribution
//! statistics, zones per category and a ranking table.

use crate::model::{RiskCategory, ZoneScore};
use crate::scoring::ScoreSummary;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "magenta" => format!("\x1b[35m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn category_color(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::Low => "green",
        RiskCategory::Medium => "yellow",
        RiskCategory::High => "red",
        RiskCategory::VeryHigh => "magenta",
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Statistics and category distribution.
    #[must_use]
    pub fn render_summary(&self, summary: &ScoreSummary) -> String {
        let mut lines = Vec::new();

        lines.push(self.color("Risk Score Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!("{}  {}", self.color("Zones:", "cyan"), summary.count));

        if summary.count > 0 {
            lines.push(format!(
                "{}  {:.4} (std {:.4})",
                self.color("Mean:", "cyan"),
                summary.mean,
                summary.std_dev
            ));
            lines.push(format!(
                "{}  min {:.4} | q1 {:.4} | median {:.4} | q3 {:.4} | max {:.4}",
                self.color("Range:", "cyan"),
                summary.min,
                summary.q1,
                summary.median,
                summary.q3,
                summary.max
            ));
        }

        lines.push(String::new());
        lines.push(self.color("Categories:", "bold"));
        for category in RiskCategory::ALL.iter().rev() {
            let count = summary.count_in(*category);
            lines.push(format!(
                "  {:<10} {}",
                self.color(category.label(), category_color(*category)),
                count
            ));
        }

        lines.join("\n")
    }

    /// Ranking table of the given scores, in the order given.
    #[must_use]
    pub fn render_ranking(&self, ranked: &[&ZoneScore]) -> String {
        let mut lines = Vec::new();

        lines.push(self.color(
            &format!("{:>4}  {:<10} {:>8}  {}", "Rank", "Zone", "Score", "Category"),
            "bold",
        ));
        for (index, score) in ranked.iter().enumerate() {
            let filled = if score.filled.is_empty() {
                String::new()
            } else {
                self.color(&format!("  (filled: {})", score.filled.join(", ")), "dim")
            };
            lines.push(format!(
                "{:>4}  {:<10} {:>8.4}  {}{}",
                index + 1,
                score.zone_id.as_str(),
                score.score,
                self.color(score.category.label(), category_color(score.category)),
                filled
            ));
        }
        if ranked.is_empty() {
            lines.push(format!("  {}", self.color("No zones", "dim")));
        }

        lines.join("\n")
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ZoneId;
    use indexmap::IndexMap;

    fn score(id: &str, value: f64, category: RiskCategory) -> ZoneScore {
        ZoneScore {
            zone_id: ZoneId::new(id),
            score: value,
            category,
            normalized: IndexMap::new(),
            filled: Vec::new(),
        }
    }

    #[test]
    fn test_ranking_without_color() {
        let a = score("10003", 0.85, RiskCategory::VeryHigh);
        let b = score("10001", 0.38, RiskCategory::Medium);
        let out = SummaryReporter::new().no_color().render_ranking(&[&a, &b]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("10003"));
        assert!(lines[1].contains("0.8500"));
        assert!(lines[1].contains("Very High"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_summary_lists_every_category() {
        let scores = vec![score("a", 0.1, RiskCategory::Low)];
        let summary = ScoreSummary::from_scores(&scores);
        let out = SummaryReporter::new().no_color().render_summary(&summary);
        for category in RiskCategory::ALL {
            assert!(out.contains(category.label()));
        }
    }
}
