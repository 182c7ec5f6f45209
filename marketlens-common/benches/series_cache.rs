use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marketlens_common::data::cache::{CacheConfig, SeriesCache, SeriesKey};
use marketlens_common::data::types::{PricePoint, PriceSeries};
use std::time::Duration;

fn build_series(days: usize) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let points = (0..days)
        .map(|i| PricePoint {
            date: start + chrono::Days::new(i as u64),
            open: 100.0 + i as f64,
            high: 101.0 + i as f64,
            low: 99.0 + i as f64,
            close: 100.5 + i as f64,
            volume: 10_000,
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

fn key_for(symbol: &str) -> SeriesKey {
    SeriesKey::new(
        symbol,
        chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    )
}

fn bench_single_insert(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cache = SeriesCache::default();
    let series = build_series(252);

    c.bench_function("single_insert", |b| {
        b.iter(|| {
            rt.block_on(cache.insert(black_box(key_for("AAPL")), black_box(series.clone())));
        });
    });
}

fn bench_insert_many(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("insert_many");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    for size in [10usize, 100, 1000].iter() {
        let series = build_series(252);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let cache = SeriesCache::new(CacheConfig {
                    ttl: Duration::from_secs(3600),
                    max_entries: size,
                });
                rt.block_on(async {
                    for i in 0..size {
                        cache
                            .insert(key_for(&format!("SYM{}", i)), series.clone())
                            .await;
                    }
                });
            });
        });
    }
    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cache = SeriesCache::default();
    rt.block_on(cache.insert(key_for("AAPL"), build_series(252)));

    c.bench_function("get_hit", |b| {
        b.iter(|| {
            rt.block_on(cache.get(black_box(&key_for("AAPL"))));
        });
    });
}

criterion_group!(benches, bench_single_insert, bench_insert_many, bench_get_hit);
criterion_main!(benches);
