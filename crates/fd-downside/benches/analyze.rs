//! Benchmarks for the full analysis pipeline.

use chrono::{Days, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use fd_downside::{Analyzer, PricePoint};
use std::hint::black_box;

/// Deterministic daily random walk, roughly 40 years of observations.
fn daily_prices(days: u64) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(1985, 1, 1).unwrap();
    let mut price = 100.0;
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..days)
        .map(|i| {
            // xorshift step mapped to roughly +/-1%
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let shock = (state % 2001) as f64 / 100_000.0 - 0.01;
            price *= 1.0 + shock;
            PricePoint::new(start + Days::new(i), price)
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let observations = daily_prices(40 * 365);
    let analyzer = Analyzer::new();

    c.bench_function("analyze_observations_40y_daily", |b| {
        b.iter(|| analyzer.analyze_observations(black_box(&observations)))
    });

    let monthly = fd_downside::resample::resample(&observations, Default::default()).unwrap();
    c.bench_function("analyze_480_months", |b| {
        b.iter(|| analyzer.analyze(black_box(&monthly)))
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
