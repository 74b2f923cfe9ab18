//! B-tree benchmarks for memtree
//!
//! These benchmarks measure the operations that determine index
//! performance under an embedding storage engine:
//!
//! - Insert: sequential and shuffled entry streams
//! - Rank fetch: point access through the cumulative tables
//! - Cursor scan: full ordered traversal throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memtree::{Btree, U64LeCompare};

const FANOUT: usize = 32;
const CAPACITY: usize = 64;

fn shuffled(count: usize) -> Vec<u64> {
    let mut values: Vec<u64> = (0..count as u64).collect();
    for i in (1..values.len()).rev() {
        // Deterministic permutation; no rng needed for a stable workload.
        let j = (i * 2_654_435_761) % (i + 1);
        values.swap(i, j);
    }
    values
}

fn filled_tree(values: &[u64]) -> Btree<U64LeCompare> {
    let mut tree = Btree::new(FANOUT, CAPACITY, 8, U64LeCompare).unwrap();
    for v in values {
        tree.insert(&v.to_le_bytes());
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_insert");

    for count in [1_000usize, 100_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), count, |b, &count| {
            b.iter_with_setup(
                || Btree::new(FANOUT, CAPACITY, 8, U64LeCompare).unwrap(),
                |mut tree| {
                    for v in 0..count as u64 {
                        tree.insert(&v.to_le_bytes());
                    }
                    tree
                },
            );
        });

        group.bench_with_input(BenchmarkId::new("random", count), count, |b, &count| {
            b.iter_with_setup(
                || {
                    let tree = Btree::new(FANOUT, CAPACITY, 8, U64LeCompare).unwrap();
                    (tree, shuffled(count))
                },
                |(mut tree, values)| {
                    for v in values {
                        tree.insert(&v.to_le_bytes());
                    }
                    tree
                },
            );
        });
    }

    group.finish();
}

fn bench_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_fetch");

    for count in [1_000usize, 100_000].iter() {
        let tree = filled_tree(&shuffled(*count));

        group.bench_with_input(BenchmarkId::new("by_rank", count), count, |b, &count| {
            let mut rank = 0;
            b.iter(|| {
                rank = (rank + 7_919) % count;
                let (entry, _run) = tree.fetch(black_box(rank)).unwrap();
                black_box(entry);
            });
        });

        group.bench_with_input(BenchmarkId::new("run_walk", count), count, |b, &count| {
            b.iter(|| {
                let mut rank = 0;
                while rank < count {
                    let (entry, run) = tree.fetch(rank).unwrap();
                    black_box(entry);
                    rank += run;
                }
            });
        });
    }

    group.finish();
}

fn bench_cursor_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_cursor_scan");

    for count in [1_000usize, 100_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        let tree = filled_tree(&shuffled(*count));

        group.bench_with_input(BenchmarkId::new("full_scan", count), count, |b, _| {
            b.iter(|| {
                let mut entries = 0usize;
                for entry in tree.entries() {
                    black_box(entry);
                    entries += 1;
                }
                entries
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_fetch, bench_cursor_scan);
criterion_main!(benches);
