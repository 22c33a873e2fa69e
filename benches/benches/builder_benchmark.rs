//! Bar building throughput.
//!
//! Run with: `cargo bench --package barsmith-bench --bench builder_benchmark`

use barsmith_bench::{bars_info, random_walk};
use barsmith_lib::{BarBuilder, BarFormation, BarSeries, Bars, Period};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const TICKS: usize = 100_000;

fn periods() -> Vec<Period> {
    ["s30", "m1", "t100", "r4", "pa12/8", "pa12/8a"]
        .iter()
        .map(|p| p.parse().unwrap())
        .collect()
}

fn builder_benchmark(c: &mut Criterion) {
    let ticks = random_walk(TICKS);
    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements(TICKS as u64));
    group.sample_size(20);

    for period in periods() {
        group.bench_with_input(BenchmarkId::from_parameter(period), &period, |b, &period| {
            b.iter(|| {
                let mut builder = BarBuilder::<Bars>::new(bars_info(period)).unwrap();
                builder.on_ticks(&ticks);
                black_box(builder.bars().count())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, builder_benchmark);
criterion_main!(benches);
