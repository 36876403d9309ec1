//! Benchmark for BTree across orders, against the standard BTreeMap.

use std::collections::BTreeMap;
use std::hint::black_box;

use arbor::btree::BTree;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const SIZE: i32 = 10_000;

/// A fixed permutation of `0..SIZE` so inserts do not arrive sorted.
fn scrambled_keys() -> Vec<i32> {
    (0..SIZE).map(|index| (index * 7_919) % SIZE).collect()
}

// =============================================================================
// put Benchmark
// =============================================================================

fn benchmark_put(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("put");
    let keys = scrambled_keys();

    for order in [3, 8, 32, 128] {
        group.bench_with_input(BenchmarkId::new("BTree", order), &order, |bencher, &order| {
            bencher.iter(|| {
                let mut tree = BTree::new(order).unwrap();
                for &key in &keys {
                    tree.put(black_box(key), black_box(key * 2));
                }
                black_box(tree)
            });
        });
    }

    group.bench_function("BTreeMap", |bencher| {
        bencher.iter(|| {
            let mut map = BTreeMap::new();
            for &key in &keys {
                map.insert(black_box(key), black_box(key * 2));
            }
            black_box(map)
        });
    });

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");
    let keys = scrambled_keys();

    for order in [3, 8, 32, 128] {
        let mut tree = BTree::new(order).unwrap();
        for &key in &keys {
            tree.put(key, key);
        }
        group.bench_with_input(BenchmarkId::new("BTree", order), &order, |bencher, _| {
            bencher.iter(|| {
                let mut sum = 0i64;
                for key in 0..SIZE {
                    if let Some(&value) = tree.get(black_box(&key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });
    }

    let map: BTreeMap<i32, i32> = keys.iter().map(|&key| (key, key)).collect();
    group.bench_function("BTreeMap", |bencher| {
        bencher.iter(|| {
            let mut sum = 0i64;
            for key in 0..SIZE {
                if let Some(&value) = map.get(black_box(&key)) {
                    sum += i64::from(value);
                }
            }
            black_box(sum)
        });
    });

    group.finish();
}

// =============================================================================
// delete Benchmark
// =============================================================================

fn benchmark_delete(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("delete");
    let keys = scrambled_keys();

    for order in [3, 8, 32, 128] {
        let mut tree = BTree::new(order).unwrap();
        for &key in &keys {
            tree.put(key, key);
        }
        group.bench_with_input(BenchmarkId::new("BTree", order), &order, |bencher, _| {
            bencher.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for key in 0..SIZE {
                        black_box(tree.delete(&key));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");
    let keys = scrambled_keys();

    for order in [3, 32] {
        let mut tree = BTree::new(order).unwrap();
        for &key in &keys {
            tree.put(key, key);
        }
        group.bench_with_input(BenchmarkId::new("iter", order), &order, |bencher, _| {
            bencher.iter(|| {
                let sum: i64 = tree.values().map(|&value| i64::from(value)).sum();
                black_box(sum)
            });
        });
        group.bench_with_input(BenchmarkId::new("cursor", order), &order, |bencher, _| {
            bencher.iter(|| {
                let mut cursor = tree.cursor();
                let mut sum = 0i64;
                while cursor.next() {
                    sum += i64::from(*cursor.value());
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// clear and refill Benchmark
// =============================================================================

fn benchmark_clear_refill(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("clear_refill");
    let keys = scrambled_keys();

    for capacity in [0, 64, 1024] {
        group.bench_with_input(
            BenchmarkId::new("free_list_capacity", capacity),
            &capacity,
            |bencher, &capacity| {
                let config = arbor::btree::BTreeConfig::new(16).with_free_list_capacity(capacity);
                let mut tree = BTree::with_config(config, arbor::btree::NaturalOrder).unwrap();
                bencher.iter(|| {
                    tree.clear();
                    for &key in &keys {
                        tree.put(key, key);
                    }
                    black_box(tree.len())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_put,
    benchmark_get,
    benchmark_delete,
    benchmark_iteration,
    benchmark_clear_refill
);
criterion_main!(benches);
