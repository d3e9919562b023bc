//! Performance benchmarks for rategate-core.
//!
//! Run with: cargo bench -p rategate-core

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rategate_core::{LimiterConfig, Quota, SlidingWindowLimiter};

/// Benchmark the admission hot path for a single busy client.
fn bench_single_client(c: &mut Criterion) {
    let quota = Quota::new(1_000_000, Duration::from_secs(60)).unwrap();
    let limiter = SlidingWindowLimiter::new(quota);

    c.bench_function("check_single_client", |b| {
        b.iter(|| limiter.check(black_box("192.168.1.10")));
    });
}

/// Benchmark admission across many distinct clients and shard counts.
fn bench_many_clients(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_many_clients");

    for shards in [1, 16, 64] {
        group.bench_with_input(BenchmarkId::new("shards", shards), &shards, |b, &shards| {
            let quota = Quota::per_minute(100).unwrap();
            let config = LimiterConfig {
                shards,
                ..LimiterConfig::default()
            };
            let limiter = SlidingWindowLimiter::with_config(quota, config);
            let clients: Vec<String> = (0..1024).map(|i| format!("10.0.{}.{}", i / 256, i % 256)).collect();

            let mut i = 0;
            b.iter(|| {
                let client = &clients[i % clients.len()];
                i += 1;
                limiter.check(black_box(client))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_client, bench_many_clients);
criterion_main!(benches);
