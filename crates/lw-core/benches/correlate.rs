use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lw_core::{
    CorrelationConfig, Layer, Sample, TimeSlice, ZoomLevel, bind, find_recurring_slices_at,
    generate_slices_at,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// `weeks` consecutive day wheels with one random mood and sleep sample each.
fn history(weeks: i64) -> Vec<TimeSlice> {
    let mut rng = SmallRng::seed_from_u64(42);
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
    let mut slices: Vec<TimeSlice> = (0..weeks)
        .rev()
        .flat_map(|w| generate_slices_at(now - Duration::weeks(w), ZoomLevel::Day, now))
        .collect();
    let moods: Vec<Sample> = slices
        .iter()
        .map(|s| {
            Sample::new(s.instant)
                .with("valence", rng.random::<f64>())
                .with("energy", rng.random::<f64>())
        })
        .collect();
    let sleeps: Vec<Sample> = slices
        .iter()
        .map(|s| {
            Sample::new(s.instant)
                .with("quality", rng.random::<f64>())
                .with("duration", rng.random_range(4.0..10.0))
        })
        .collect();
    bind(&mut slices, Layer::Mood, &moods);
    bind(&mut slices, Layer::Sleep, &sleeps);
    slices
}

fn bench_correlate(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
    let config = CorrelationConfig::default();
    let mut group = c.benchmark_group("find_recurring_slices");
    for weeks in [4i64, 26, 104] {
        let slices = history(weeks);
        group.bench_with_input(BenchmarkId::from_parameter(weeks), &slices, |b, slices| {
            b.iter(|| find_recurring_slices_at(black_box(slices), &config, now))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_correlate);
criterion_main!(benches);
