use std::collections::{BTreeMap, HashMap};
use std::hint::black_box;

use corpus_collections::{
    BoundedOptions, BoundedSortedMultiMap, MultiMap, Score, SparseDoubleArray, TrieMap,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn words(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(17);
    (0..count)
        .map(|_| {
            let len = rng.random_range(3..12);
            (0..len).map(|_| rng.random_range('a'..='h')).collect()
        })
        .collect()
}

fn insert_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert Operations");

    for size in [100, 1000, 10_000] {
        let keys = words(size);

        group.bench_with_input(BenchmarkId::new("HashMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = HashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i);
                }
                black_box(map)
            })
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i);
                }
                black_box(map)
            })
        });

        group.bench_with_input(BenchmarkId::new("TrieMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = TrieMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key, i);
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

fn lookup_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Lookup Operations");

    for size in [1000, 10_000] {
        let keys = words(size);
        let btree: BTreeMap<&str, usize> = keys.iter().map(String::as_str).zip(0..).collect();
        let trie: TrieMap<usize> = keys.iter().zip(0..).collect();

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(btree.get(key.as_str()));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("TrieMap", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(trie.get(key));
                }
            })
        });
    }

    group.finish();
}

fn trie_maintenance_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trie Maintenance");
    let keys = words(5000);
    let trie: TrieMap<usize> = keys.iter().zip(0..).collect();

    group.bench_function("remove_then_compact", |b| {
        b.iter(|| {
            let mut trie = trie.clone();
            for key in keys.iter().step_by(2) {
                trie.remove(key);
            }
            black_box(trie.compact())
        })
    });

    group.bench_function("remove_and_compact", |b| {
        b.iter(|| {
            let mut trie = trie.clone();
            for key in keys.iter().step_by(2) {
                trie.remove_and_compact(key);
            }
            black_box(trie.node_count())
        })
    });

    group.bench_function("prefix_iter", |b| {
        b.iter(|| black_box(trie.prefix_iter("ab").count()))
    });

    group.finish();
}

fn top_k_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Top-K Selection");
    let mut rng = StdRng::seed_from_u64(5);
    let scores: Vec<(f64, u32)> = (0..10_000).map(|i| (rng.random::<f64>(), i)).collect();

    for bound in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("BoundedSortedMultiMap", bound), &bound, |b, &bound| {
            b.iter(|| {
                let options = BoundedOptions::new(bound);
                let mut top = BoundedSortedMultiMap::with_rng(options, StdRng::seed_from_u64(0))
                    .expect("positive bound");
                for &(score, id) in &scores {
                    top.insert(Score(score), id);
                }
                black_box(top.range())
            })
        });

        group.bench_with_input(BenchmarkId::new("sort_and_truncate", bound), &bound, |b, &bound| {
            b.iter(|| {
                let mut all = scores.clone();
                all.sort_by(|a, b| b.0.total_cmp(&a.0));
                all.truncate(bound);
                black_box(all)
            })
        });
    }

    group.finish();
}

fn sparse_array_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sparse Array");
    let mut rng = StdRng::seed_from_u64(11);
    let updates: Vec<(usize, f64)> = (0..5000)
        .map(|_| (rng.random_range(0..1_000_000), rng.random_range(-1.0..1.0)))
        .collect();

    group.bench_function("add", |b| {
        b.iter(|| {
            let mut array = SparseDoubleArray::new(1_000_000);
            for &(index, delta) in &updates {
                array.add(index, delta).expect("index in range");
            }
            black_box(array.cardinality())
        })
    });

    let mut filled = SparseDoubleArray::new(1_000_000);
    for &(index, delta) in &updates {
        filled.set(index, delta).expect("index in range");
    }
    group.bench_function("get", |b| {
        b.iter(|| {
            for &(index, _) in &updates {
                black_box(filled.get(index).expect("index in range"));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    insert_benchmarks,
    lookup_benchmarks,
    trie_maintenance_benchmarks,
    top_k_benchmarks,
    sparse_array_benchmarks
);
criterion_main!(benches);
