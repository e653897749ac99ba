//! IDD operation benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench idd_ops
//! ```

use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use idd_rs::interval::{Boundary, Interval};
use idd_rs::manager::{IddConfig, IddManager};
use idd_rs::node::Idd;
use idd_rs::partition::Partition;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn random_box(rng: &mut ChaCha8Rng, dims: usize) -> HashMap<usize, Interval> {
    let mut b = HashMap::with_capacity(dims);
    for v in 0..dims {
        let mut low = rng.random_range(0.0..1000.0);
        if rng.random_bool(0.5) {
            low = -low;
        }
        let high = low + rng.random_range(0.0..1000.0);
        let lb = if rng.random_bool(0.5) { Boundary::Open } else { Boundary::Closed };
        let hb = if rng.random_bool(0.5) { Boundary::Open } else { Boundary::Closed };
        b.insert(v, Interval::from_bounds(low, lb, high, hb));
    }
    b
}

fn manager(dims: usize, cache_bits: usize) -> IddManager<usize, bool> {
    let config = IddConfig::default().with_cache_bits(cache_bits);
    let manager = IddManager::with_config(config);
    for v in 0..dims {
        manager.internalize_variable(v);
    }
    manager
}

/// Union of `count` random boxes.
fn union_of_boxes(manager: &IddManager<usize, bool>, rng: &mut ChaCha8Rng, dims: usize, count: usize) -> Idd {
    let mut dd = manager.bottom();
    for _ in 0..count {
        let tmp = manager.from_box(&random_box(rng, dims), true, false);
        dd = manager.apply_or(&dd, &tmp);
    }
    dd
}

fn bench_random_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("idd/random_operations");
    group.sample_size(10);

    for dims in [10, 50, 100] {
        group.bench_with_input(BenchmarkId::new("dims", dims), &dims, |b, &dims| {
            b.iter(|| {
                let manager = manager(dims, 10);
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                let mut dd = manager.from_box(&random_box(&mut rng, dims), true, false);
                for _ in 0..500 {
                    let tmp = manager.from_box(&random_box(&mut rng, dims), true, false);
                    dd = if rng.random_bool(0.5) {
                        manager.apply_and(&dd, &tmp)
                    } else {
                        manager.apply_or(&dd, &tmp)
                    };
                }
                manager.size(&dd)
            });
        });
    }

    group.finish();
}

fn bench_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("idd/union");
    group.sample_size(10);

    let dims = 20;
    for count in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::new("boxes", count), &count, |b, &count| {
            b.iter(|| {
                let manager = manager(dims, 12);
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                let dd = union_of_boxes(&manager, &mut rng, dims, count);
                manager.size(&dd)
            });
        });
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("idd/compare");

    let dims = 20;
    let manager = manager(dims, 12);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let f = union_of_boxes(&manager, &mut rng, dims, 100);
    let g = union_of_boxes(&manager, &mut rng, dims, 100);
    let h = manager.apply_or(&f, &g);

    group.bench_function("unordered", |b| b.iter(|| manager.compare(&f, &g)));
    group.bench_function("less", |b| b.iter(|| manager.compare(&f, &h)));

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("idd/queries");

    let dims = 20;
    let manager = manager(dims, 12);
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let dd = union_of_boxes(&manager, &mut rng, dims, 100);
    let points: Vec<HashMap<usize, f64>> = (0..100)
        .map(|_| (0..dims).map(|v| (v, rng.random_range(-1000.0..2000.0))).collect())
        .collect();
    let window = random_box(&mut rng, dims);

    group.bench_function("lookup", |b| {
        b.iter(|| points.iter().filter(|p| manager.lookup(&dd, p)).count())
    });
    group.bench_function("inf_terminal_cover", |b| b.iter(|| manager.inf_terminal_cover(&dd, &window)));
    group.bench_function("partial_overlaps", |b| b.iter(|| manager.partial_overlaps(&dd, &window)));
    group.bench_function("path_count", |b| b.iter(|| manager.path_count(&dd)));

    group.finish();
}

fn bench_partition_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition/insert");

    for count in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("intervals", count), &count, |b, &count| {
            let mut rng = ChaCha8Rng::seed_from_u64(17);
            let intervals: Vec<(Interval, u32)> = (0..count)
                .map(|i| {
                    let low = rng.random_range(-1000.0..1000.0);
                    let high = low + rng.random_range(0.0..100.0);
                    (Interval::closed(low, high), i % 7)
                })
                .collect();
            b.iter(|| {
                let mut partition = Partition::new(0u32);
                for (interval, value) in intervals.iter() {
                    partition.insert(interval, *value);
                }
                partition.len()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_random_operations,
    bench_union,
    bench_compare,
    bench_queries,
    bench_partition_insert,
);

criterion_main!(benches);
