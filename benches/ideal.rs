//! Offline optimum cost as trace length and capacity grow.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use evictkit::policy::ideal::optimal_hits;
use evictkit::trace::{DEFAULT_SEED, TraceSpec};

fn bench_optimal_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("ideal");
    group.sample_size(20);

    for (count, capacity, high) in [
        (10_000usize, 50usize, 100i64),
        (100_000, 50, 100),
        (100_000, 1_000, 25_000),
        (100_000, 10_000, 25_000),
    ] {
        let spec = TraceSpec {
            count,
            capacity,
            low: 0,
            high,
        };
        let Ok(trace) = spec.generate(DEFAULT_SEED) else {
            continue;
        };
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("n{count}"), capacity),
            &trace,
            |b, trace| b.iter(|| black_box(optimal_hits(trace.keys(), trace.capacity()))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_optimal_hits);
criterion_main!(benches);
