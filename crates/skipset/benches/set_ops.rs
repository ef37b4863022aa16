//! Benchmarks for skip list set operations.
//!
//! Compares `SkipListSet` against `std::collections::BTreeSet`.

use std::collections::BTreeSet;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use skipset::SkipListSet;

const SIZES: [u64; 3] = [100, 1_000, 10_000];

/// Spread keys out so insertion order is not already sorted.
fn scrambled(n: u64) -> Vec<u64> {
    (0..n).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) % (n * 4)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for n in SIZES {
        let keys = scrambled(n);
        group.bench_with_input(BenchmarkId::new("skipset", n), &keys, |b, keys| {
            b.iter(|| {
                let mut set = SkipListSet::new();
                for &k in keys {
                    set.add(black_box(k));
                }
                set
            });
        });
        group.bench_with_input(BenchmarkId::new("btreeset", n), &keys, |b, keys| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &k in keys {
                    set.insert(black_box(k));
                }
                set
            });
        });
    }
    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains");
    for n in SIZES {
        let keys = scrambled(n);
        let set = SkipListSet::from_collection(keys.iter().copied());
        let mut rebalanced = set.clone();
        rebalanced.rebalance();

        group.bench_with_input(BenchmarkId::new("skipset", n), &keys, |b, keys| {
            b.iter(|| keys.iter().filter(|k| set.contains(black_box(*k))).count());
        });
        group.bench_with_input(BenchmarkId::new("skipset_rebalanced", n), &keys, |b, keys| {
            b.iter(|| keys.iter().filter(|k| rebalanced.contains(black_box(*k))).count());
        });
    }
    group.finish();
}

fn bench_remove_minimum(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_minimum");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("skipset", n), &n, |b, &n| {
            b.iter_batched(
                || SkipListSet::from_collection(0..n),
                |mut set| {
                    loop {
                        let Ok(&min) = set.first() else { break };
                        set.remove(&min);
                    }
                    set
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_contains, bench_remove_minimum);
criterion_main!(benches);
