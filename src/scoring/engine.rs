//! Zone collection orchestration and result queries.

use super::aggregator::RiskAggregator;
use super::classifier::RiskClassifier;
use super::config::RiskModelConfig;
use super::summary::ScoreSummary;
use crate::error::{Result, RiskMapError};
use crate::model::{ZoneId, ZoneRecord, ZoneScore};
use crate::reports::{create_exporter, ExportFormat, ExportOptions, ExportRow, ExportTable};
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::io::Write;
use tracing::debug;

/// Lifecycle of an engine: `Unloaded -> Loaded -> Scored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineState {
    Unloaded,
    Loaded,
    Scored,
}

/// Result of the last scoring run.
#[derive(Debug, Clone)]
struct ScoreTable {
    /// Weighted factors of the run, in weight order
    factors: Vec<String>,
    /// One score per loaded zone, in load order
    scores: Vec<ZoneScore>,
}

/// Scores a collection of zones and serves queries over the result.
///
/// `load` and `compute_scores` take `&mut self`; share an engine across
/// threads behind a lock, or give each independent collection its own
/// engine.
#[derive(Debug, Default)]
pub struct RiskMapEngine {
    zones: IndexMap<ZoneId, ZoneRecord>,
    loaded: bool,
    result: Option<ScoreTable>,
}

impl RiskMapEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and load a zone collection, replacing whatever was loaded
    /// before and discarding any result.
    ///
    /// On error the engine is left as it was.
    pub fn load(&mut self, records: impl IntoIterator<Item = ZoneRecord>) -> Result<()> {
        let mut zones = IndexMap::new();
        for record in records {
            record.validate()?;
            if zones.contains_key(&record.id) {
                return Err(RiskMapError::validation(format!(
                    "duplicate zone identifier '{}'",
                    record.id
                )));
            }
            zones.insert(record.id.clone(), record);
        }

        debug!(zones = zones.len(), "Loaded zone records");
        self.zones = zones;
        self.loaded = true;
        self.result = None;
        Ok(())
    }

    /// Normalize, aggregate and classify every loaded zone.
    ///
    /// The result is returned and kept as the current result until the next
    /// `load` or `compute_scores`. Missing factor values receive
    /// `config.default_fill` and never raise.
    pub fn compute_scores(&mut self, config: &RiskModelConfig) -> Result<&[ZoneScore]> {
        if !self.loaded {
            return Err(RiskMapError::state(
                "no zones loaded; call load before compute_scores",
            ));
        }
        config.validate()?;

        let factor_names: Vec<String> = config.weights.names().map(str::to_string).collect();
        let aggregator = RiskAggregator::new(&config.weights);
        let classifier = RiskClassifier::new(config.cut_points);

        let mut scales = Vec::with_capacity(factor_names.len());
        for name in &factor_names {
            let options = config.options_for(name);
            let present: Vec<f64> = self
                .zones
                .values()
                .filter_map(|zone| zone.factor_value(name))
                .collect();
            let scale = options.normalizer().fit(&present);
            debug!(
                factor = %name,
                present = present.len(),
                missing = self.zones.len() - present.len(),
                ?scale,
                "Fitted factor scale"
            );
            scales.push((options, scale));
        }

        let mut scores = Vec::with_capacity(self.zones.len());
        for zone in self.zones.values() {
            let mut normalized = IndexMap::with_capacity(factor_names.len());
            let mut filled = Vec::new();
            for (name, (options, scale)) in factor_names.iter().zip(&scales) {
                let value = match zone.factor_value(name) {
                    Some(raw) => options.orient(scale.apply(raw)),
                    None => {
                        filled.push(name.clone());
                        config.default_fill
                    }
                };
                normalized.insert(name.clone(), value);
            }

            let score = aggregator.aggregate(zone.id.as_str(), &normalized)?;
            scores.push(ZoneScore {
                zone_id: zone.id.clone(),
                score,
                category: classifier.classify(score),
                normalized,
                filled,
            });
        }

        debug!(zones = scores.len(), "Computed risk scores");
        let table = self.result.insert(ScoreTable {
            factors: factor_names,
            scores,
        });
        Ok(table.scores.as_slice())
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        if self.result.is_some() {
            EngineState::Scored
        } else if self.loaded {
            EngineState::Loaded
        } else {
            EngineState::Unloaded
        }
    }

    /// Number of loaded zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Loaded records in load order.
    pub fn zones(&self) -> impl Iterator<Item = &ZoneRecord> {
        self.zones.values()
    }

    /// Loaded record by identifier.
    #[must_use]
    pub fn zone(&self, id: &str) -> Option<&ZoneRecord> {
        self.zones.get(id)
    }

    /// The current result, in load order.
    pub fn result(&self) -> Result<&[ZoneScore]> {
        self.table().map(|table| table.scores.as_slice())
    }

    /// Score of one zone in the current result.
    pub fn score(&self, id: &str) -> Result<Option<&ZoneScore>> {
        let table = self.table()?;
        Ok(self
            .zones
            .get_index_of(id)
            .and_then(|index| table.scores.get(index)))
    }

    /// The current result ordered by score descending, ties broken by
    /// identifier ascending.
    pub fn ranked(&self) -> Result<Vec<&ZoneScore>> {
        let mut ranked: Vec<&ZoneScore> = self.table()?.scores.iter().collect();
        ranked.sort_by(|a, b| rank_order(a, b));
        Ok(ranked)
    }

    /// The `n` highest-risk zones in ranking order.
    pub fn top_risk(&self, n: usize) -> Result<Vec<&ZoneScore>> {
        let mut ranked = self.ranked()?;
        ranked.truncate(n);
        Ok(ranked)
    }

    /// Every zone scoring at least `threshold`, in ranking order.
    pub fn above_threshold(&self, threshold: f64) -> Result<Vec<&ZoneScore>> {
        let ranked = self.ranked()?;
        if threshold.is_nan() || !(0.0..=1.0).contains(&threshold) {
            return Err(RiskMapError::validation(format!(
                "threshold must be between 0.0 and 1.0, got {threshold}"
            )));
        }
        Ok(ranked
            .into_iter()
            .filter(|score| score.score >= threshold)
            .collect())
    }

    /// Distribution statistics of the current result.
    pub fn summary(&self) -> Result<ScoreSummary> {
        Ok(ScoreSummary::from_scores(&self.table()?.scores))
    }

    /// The current result joined with the input records, in load order.
    pub fn export_table(&self) -> Result<ExportTable<'_>> {
        let table = self.table()?;
        let rows = self
            .zones
            .values()
            .zip(&table.scores)
            .map(|(record, score)| ExportRow { record, score })
            .collect();
        Ok(ExportTable {
            factors: &table.factors,
            rows,
        })
    }

    /// Serialize the current result in the format named by `format`
    /// (`tabular`/`csv`, `geo`/`geojson` or `json`).
    pub fn export<W: Write>(
        &self,
        writer: W,
        format: &str,
        options: &ExportOptions,
    ) -> Result<()> {
        let format: ExportFormat = format.parse()?;
        self.export_as(writer, format, options)
    }

    /// Serialize the current result in a known format.
    pub fn export_as<W: Write>(
        &self,
        mut writer: W,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<()> {
        let table = self.export_table()?;
        options.validate()?;
        debug!(%format, zones = table.len(), "Exporting risk scores");
        create_exporter(format).write_to(&table, options, &mut writer)
    }

    fn table(&self) -> Result<&ScoreTable> {
        self.result.as_ref().ok_or_else(|| {
            RiskMapError::state("no scores available; call compute_scores first")
        })
    }
}

fn rank_order(a: &ZoneScore, b: &ZoneScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.zone_id.cmp(&b.zone_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{factors, RiskCategory};
    use crate::scoring::{FactorOptions, WeightSet};

    fn three_zones() -> Vec<ZoneRecord> {
        vec![
            ZoneRecord::new("10001", 10_000.0, 1.0).with_factor(factors::BIRD_DENSITY, 100.0),
            ZoneRecord::new("10002", 5_000.0, 1.0).with_factor(factors::BIRD_DENSITY, 50.0),
            ZoneRecord::new("10003", 20_000.0, 1.0).with_factor(factors::BIRD_DENSITY, 200.0),
        ]
    }

    fn scored_engine() -> RiskMapEngine {
        let mut engine = RiskMapEngine::new();
        engine.load(three_zones()).unwrap();
        engine.compute_scores(&RiskModelConfig::h5n1()).unwrap();
        engine
    }

    fn single_factor_config() -> RiskModelConfig {
        RiskModelConfig::from_weights(WeightSet::new([(factors::BIRD_DENSITY, 1.0)]).unwrap())
    }

    #[test]
    fn test_state_transitions() {
        let mut engine = RiskMapEngine::new();
        assert_eq!(engine.state(), EngineState::Unloaded);
        engine.load(three_zones()).unwrap();
        assert_eq!(engine.state(), EngineState::Loaded);
        engine.compute_scores(&RiskModelConfig::default()).unwrap();
        assert_eq!(engine.state(), EngineState::Scored);
        engine.load(three_zones()).unwrap();
        assert_eq!(engine.state(), EngineState::Loaded);
        assert!(matches!(engine.top_risk(1), Err(RiskMapError::State(_))));
    }

    #[test]
    fn test_compute_before_load_is_state_error() {
        let mut engine = RiskMapEngine::new();
        assert!(matches!(
            engine.compute_scores(&RiskModelConfig::default()),
            Err(RiskMapError::State(_))
        ));
    }

    #[test]
    fn test_empty_collection_scores_to_empty_result() {
        let mut engine = RiskMapEngine::new();
        engine.load(Vec::new()).unwrap();
        let scores = engine.compute_scores(&RiskModelConfig::default()).unwrap();
        assert!(scores.is_empty());
        assert!(engine.top_risk(5).unwrap().is_empty());
        assert_eq!(engine.summary().unwrap().count, 0);
    }

    #[test]
    fn test_duplicate_ids_rejected_and_state_kept() {
        let mut engine = scored_engine();
        let records = vec![
            ZoneRecord::new("10001", 1.0, 1.0),
            ZoneRecord::new("10001", 2.0, 1.0),
        ];
        assert!(matches!(engine.load(records), Err(RiskMapError::Validation(_))));
        assert_eq!(engine.state(), EngineState::Scored);
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn test_end_to_end_ordering() {
        let engine = scored_engine();
        let top = engine.top_risk(3).unwrap();
        let ids: Vec<&str> = top.iter().map(|s| s.zone_id.as_str()).collect();
        assert_eq!(ids, vec!["10003", "10001", "10002"]);
        assert!(top[0].score > top[1].score);
        assert!(top[1].score > top[2].score);
        assert!(top[0].category >= RiskCategory::Medium);
    }

    #[test]
    fn test_missing_factors_are_filled_not_inverted() {
        let engine = scored_engine();
        let score = engine.score("10001").unwrap().unwrap();
        assert!(score.was_filled(factors::HEALTHCARE_CAPACITY));
        assert!(score.was_filled(factors::WATER_PROXIMITY));
        assert!(!score.was_filled(factors::BIRD_DENSITY));
        assert_eq!(score.normalized(factors::HEALTHCARE_CAPACITY), Some(0.5));
    }

    #[test]
    fn test_population_density_derived() {
        let engine = scored_engine();
        let top = engine.score("10003").unwrap().unwrap();
        let bottom = engine.score("10002").unwrap().unwrap();
        assert_eq!(top.normalized(factors::POPULATION_DENSITY), Some(1.0));
        assert_eq!(bottom.normalized(factors::POPULATION_DENSITY), Some(0.0));
    }

    #[test]
    fn test_degenerate_factor_is_half() {
        let mut engine = RiskMapEngine::new();
        engine
            .load(vec![
                ZoneRecord::new("a", 1.0, 1.0).with_factor(factors::BIRD_DENSITY, 7.0),
                ZoneRecord::new("b", 1.0, 1.0).with_factor(factors::BIRD_DENSITY, 7.0),
            ])
            .unwrap();
        let scores = engine.compute_scores(&single_factor_config()).unwrap();
        assert!(scores.iter().all(|s| (s.score - 0.5).abs() < 1e-9));
    }

    #[test]
    fn test_inverted_factor_ranks_low_values_high() {
        let weights = WeightSet::new([(factors::HEALTHCARE_CAPACITY, 1.0)]).unwrap();
        let config = RiskModelConfig::from_weights(weights)
            .with_factor_options(factors::HEALTHCARE_CAPACITY, FactorOptions::inverted());
        let mut engine = RiskMapEngine::new();
        engine
            .load(vec![
                ZoneRecord::new("well-served", 1.0, 1.0)
                    .with_factor(factors::HEALTHCARE_CAPACITY, 10.0),
                ZoneRecord::new("underserved", 1.0, 1.0)
                    .with_factor(factors::HEALTHCARE_CAPACITY, 1.0),
            ])
            .unwrap();
        engine.compute_scores(&config).unwrap();
        let top = engine.top_risk(1).unwrap();
        assert_eq!(top[0].zone_id.as_str(), "underserved");
        assert_eq!(top[0].score, 1.0);
    }

    #[test]
    fn test_ties_break_by_id() {
        let mut engine = RiskMapEngine::new();
        engine
            .load(vec![
                ZoneRecord::new("B", 1.0, 1.0).with_factor(factors::BIRD_DENSITY, 8.0),
                ZoneRecord::new("C", 1.0, 1.0).with_factor(factors::BIRD_DENSITY, 6.0),
                ZoneRecord::new("A", 1.0, 1.0).with_factor(factors::BIRD_DENSITY, 8.0),
                ZoneRecord::new("D", 1.0, 1.0).with_factor(factors::BIRD_DENSITY, 0.0),
            ])
            .unwrap();
        engine.compute_scores(&single_factor_config()).unwrap();
        let ids: Vec<&str> = engine
            .top_risk(3)
            .unwrap()
            .iter()
            .map(|s| s.zone_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_above_threshold() {
        let engine = scored_engine();
        let all = engine.above_threshold(0.0).unwrap();
        assert_eq!(all.len(), 3);
        let top_score = engine.top_risk(1).unwrap()[0].score;
        let above = engine.above_threshold(top_score).unwrap();
        assert_eq!(above.len(), 1);
        assert!(matches!(
            engine.above_threshold(1.5),
            Err(RiskMapError::Validation(_))
        ));
        assert!(engine.above_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_export_rejects_unknown_format() {
        let engine = scored_engine();
        let mut out = Vec::new();
        assert!(matches!(
            engine.export(&mut out, "xml", &ExportOptions::default()),
            Err(RiskMapError::UnsupportedFormat(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_export_tabular_one_row_per_zone() {
        let engine = scored_engine();
        let mut out = Vec::new();
        engine
            .export(&mut out, "tabular", &ExportOptions::default())
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("zip_code,risk_score,risk_category"));
    }

    #[test]
    fn test_export_before_scoring_is_state_error() {
        let mut engine = RiskMapEngine::new();
        engine.load(three_zones()).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            engine.export(&mut out, "geo", &ExportOptions::default()),
            Err(RiskMapError::State(_))
        ));
    }

    #[test]
    fn test_zone_lookup() {
        let engine = scored_engine();
        assert_eq!(engine.zone("10002").unwrap().population, 5_000.0);
        assert!(engine.zone("99999").is_none());
        assert!(engine.score("99999").unwrap().is_none());
    }
}
