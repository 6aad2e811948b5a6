//! Benchmarks for zone scoring and export.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use riskmap_tools::model::ZoneRecord;
use riskmap_tools::reports::{ExportFormat, ExportOptions};
use riskmap_tools::scoring::{RiskMapEngine, RiskModelConfig};

/// NYC has 177 modified zip code tabulation areas; larger sizes cover
/// county- and state-level runs.
const SIZES: [usize; 3] = [177, 2_000, 20_000];

fn synthetic_zones(count: usize) -> Vec<ZoneRecord> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            let mut record = ZoneRecord::new(format!("{:05}", 10_000 + i), 1_000.0 + x * 37.0, 0.5 + (x % 17.0))
                .with_factor("bird_density", (x * 7.3) % 120.0)
                .with_factor("healthcare_capacity", 0.5 + (x % 9.0) * 0.4)
                .with_factor("vulnerability_index", (x % 100.0) / 100.0);
            record = if i % 11 == 0 {
                record.with_missing("water_proximity")
            } else {
                record.with_factor("water_proximity", (x % 13.0) / 13.0)
            };
            record
        })
        .collect()
}

fn bench_compute_scores(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_scores");
    let config = RiskModelConfig::h5n1();

    for size in SIZES {
        let mut engine = RiskMapEngine::new();
        engine.load(synthetic_zones(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let scores = engine.compute_scores(black_box(&config)).unwrap();
                black_box(scores.len())
            });
        });
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let mut engine = RiskMapEngine::new();
    engine.load(synthetic_zones(2_000)).unwrap();
    engine.compute_scores(&RiskModelConfig::h5n1()).unwrap();
    let options = ExportOptions::default().with_attributes();

    for format in [ExportFormat::Tabular, ExportFormat::Geo, ExportFormat::Json] {
        group.bench_function(format.to_string(), |b| {
            b.iter(|| {
                let mut sink = Vec::with_capacity(1 << 20);
                engine.export_as(&mut sink, format, &options).unwrap();
                black_box(sink.len())
            });
        });
    }
    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let mut engine = RiskMapEngine::new();
    engine.load(synthetic_zones(20_000)).unwrap();
    engine.compute_scores(&RiskModelConfig::h5n1()).unwrap();

    c.bench_function("top_risk_10_of_20000", |b| {
        b.iter(|| black_box(engine.top_risk(black_box(10)).unwrap().len()));
    });
}

criterion_group!(benches, bench_compute_scores, bench_export, bench_ranking);
criterion_main!(benches);
