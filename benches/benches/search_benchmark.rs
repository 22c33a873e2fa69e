//! Timestamp search benchmarks.
//!
//! Run with: `cargo bench --package barsmith-bench --bench search_benchmark`

use barsmith_bench::{random_walk, skewed_timestamps, stream_start};
use barsmith_lib::TimestampSearch;
use chrono::TimeDelta;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];
const QUERIES: usize = 1_000;

fn search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.throughput(Throughput::Elements(QUERIES as u64));

    for size in SIZES {
        let ticks = random_walk(size);
        let span = ticks[size - 1].timestamp - ticks[0].timestamp;
        let targets: Vec<_> = (0..QUERIES)
            .map(|i| ticks[0].timestamp + span * (i as i32) / (QUERIES as i32))
            .collect();

        group.bench_with_input(BenchmarkId::new("uniform_at_or_before", size), &targets, |b, targets| {
            b.iter(|| {
                for &t in targets {
                    black_box(ticks.as_slice().find_at_or_before(t));
                }
            });
        });

        let skewed = skewed_timestamps(size);
        let skewed_targets: Vec<_> = (0..QUERIES)
            .map(|i| stream_start() + TimeDelta::microseconds((i * size / QUERIES) as i64))
            .collect();
        group.bench_with_input(BenchmarkId::new("skewed_at_or_after", size), &skewed_targets, |b, targets| {
            b.iter(|| {
                for &t in targets {
                    black_box(skewed.as_slice().find_at_or_after(t));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, search_benchmark);
criterion_main!(benches);
