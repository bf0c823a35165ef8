//! Benchmarks for counter accumulation and batch grouping.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mongoutils::{MetaCounter, PipelineBuilder};

/// Fill a counter with `n` increments spread over a few collections and fields.
fn filled_counter(n: u32) -> MetaCounter<u32> {
    let collections = ["posts", "comments", "users"];
    let metas = ["views", "likes"];
    let mut counter = MetaCounter::new();
    for i in 0..n {
        counter.add(
            collections[(i % 3) as usize],
            metas[(i % 2) as usize],
            i % (n / 4 + 1),
            (i % 5) as i64,
        );
    }
    counter
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_add");

    for size in [100u32, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(filled_counter(size)))
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_aggregate");

    for size in [100u32, 1_000, 10_000] {
        let counter = filled_counter(size);
        group.throughput(Throughput::Elements(counter.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &counter, |b, counter| {
            b.iter(|| black_box(counter.aggregate()))
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    c.bench_function("pipeline_lookup_unwrap", |b| {
        b.iter(|| {
            black_box(
                PipelineBuilder::new()
                    .match_stage(|d| d.add("published", true))
                    .lookup("users", "author_id", "_id", "_author")
                    .unwrap("$_author", "author")
                    .un_project(["_author"])
                    .build(),
            )
        })
    });
}

criterion_group!(benches, bench_add, bench_aggregate, bench_pipeline);
criterion_main!(benches);
