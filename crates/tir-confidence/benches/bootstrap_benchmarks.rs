use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use tir_confidence::{cluster_resample, ClusterBootstrap, PercentileBootstrap};
use tir_core::{
    derive_row_features, sequential, utils, Panel, PanelEstimator, PointEstimate, Record, Result,
    TargetRange, TimeWindow,
};

/// Pooled in-range fraction, cheap enough to isolate bootstrap overhead
struct PooledFraction;

impl PanelEstimator for PooledFraction {
    fn estimate(&self, panel: &Panel, window: &TimeWindow) -> Result<PointEstimate> {
        let values: Vec<f64> = panel
            .observations()
            .filter(|(_, o)| window.contains(o.time))
            .map(|(_, o)| o.indicator())
            .collect();
        Ok(PointEstimate::new(utils::mean(&values)))
    }

    fn name(&self) -> &'static str {
        "pooled"
    }
}

/// Generate a glucose-like cohort with variable follow-up
fn generate_cohort(n_subjects: usize, seed: u64) -> Panel {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(140.0, 45.0).unwrap();
    let mut records = Vec::new();
    for s in 0..n_subjects {
        let rows = rng.gen_range(50..300);
        for k in 0..rows {
            records.push(Record::new(format!("s{s}"), 5.0 * k as f64, normal.sample(&mut rng)));
        }
    }
    let panel = Panel::from_records(Vec::new(), records).unwrap();
    derive_row_features(&panel, TargetRange::STANDARD_GLUCOSE, 5.0).unwrap()
}

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("ClusterResample");
    for &size in &[50, 200, 1000] {
        let panel = generate_cohort(size, 42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &panel, |b, panel| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            b.iter(|| cluster_resample(black_box(panel), &mut rng))
        });
    }
    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("ClusterBootstrap");
    group.sample_size(10);
    let window = TimeWindow::default();
    for &size in &[50, 200] {
        let panel = generate_cohort(size, 42);
        let bootstrap = ClusterBootstrap::new(sequential(), PercentileBootstrap)
            .with_resamples(200)
            .with_seed(1);
        group.bench_with_input(BenchmarkId::new("sequential", size), &panel, |b, panel| {
            b.iter(|| bootstrap.run(&PooledFraction, black_box(panel), &window))
        });

        #[cfg(feature = "parallel")]
        {
            let bootstrap = ClusterBootstrap::new(tir_core::parallel(), PercentileBootstrap)
                .with_resamples(200)
                .with_seed(1);
            group.bench_with_input(BenchmarkId::new("parallel", size), &panel, |b, panel| {
                b.iter(|| bootstrap.run(&PooledFraction, black_box(panel), &window))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_resample, bench_bootstrap);
criterion_main!(benches);
