use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rbtree_arena::{RBTreeMap, RBTreeSet, Stack};
use std::collections::{BTreeMap, BTreeSet};

const N: usize = 10_000;

// ─── Key sequence generators ────────────────────────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_patterns(n: usize) -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(n)),
        ("reverse", reverse_ordered_keys(n)),
        ("random", random_keys(n)),
    ]
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert");

    for (pattern, keys) in key_patterns(N) {
        group.bench_function(BenchmarkId::new("RBTreeMap", pattern), |b| {
            b.iter(|| {
                let mut map = RBTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", pattern), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });
    }

    group.finish();
}

fn bench_map_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_get");

    for (pattern, keys) in key_patterns(N) {
        let rb_map: RBTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

        group.bench_function(BenchmarkId::new("RBTreeMap", pattern), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Some(&v) = rb_map.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", pattern), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Some(&v) = bt_map.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });
    }

    group.finish();
}

fn bench_map_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_remove");

    for (pattern, keys) in key_patterns(N) {
        group.bench_function(BenchmarkId::new("RBTreeMap", pattern), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<RBTreeMap<i64, i64>>(),
                |mut map| {
                    for &k in &keys {
                        map.remove(&k);
                    }
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeMap", pattern), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
                |mut map| {
                    for &k in &keys {
                        map.remove(&k);
                    }
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_map_iterate(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_map: RBTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_iterate");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for (&k, &v) in &rb_map {
                sum = sum.wrapping_add(k ^ v);
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for (&k, &v) in &bt_map {
                sum = sum.wrapping_add(k ^ v);
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_range(c: &mut Criterion) {
    let rb_map: RBTreeMap<i64, i64> = (0..N as i64).map(|k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = (0..N as i64).map(|k| (k, k)).collect();
    // A 1000-wide window in the middle of the key space.
    let half = N as i64 / 2;
    let window = half - 500..half + 500;

    let mut group = c.benchmark_group("map_range");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for (_, &v) in rb_map.range(window.clone()) {
                sum = sum.wrapping_add(v);
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for (_, &v) in bt_map.range(window.clone()) {
                sum = sum.wrapping_add(v);
            }
            sum
        });
    });

    group.finish();
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert");

    for (pattern, keys) in key_patterns(N) {
        group.bench_function(BenchmarkId::new("RBTreeSet", pattern), |b| {
            b.iter(|| {
                let mut set = RBTreeSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", pattern), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                set
            });
        });
    }

    group.finish();
}

fn bench_set_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_contains");

    for (pattern, keys) in key_patterns(N) {
        let rb_set: RBTreeSet<i64> = keys.iter().copied().collect();
        let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

        group.bench_function(BenchmarkId::new("RBTreeSet", pattern), |b| {
            b.iter(|| {
                let mut count = 0usize;
                for &k in &keys {
                    if rb_set.contains(&k) {
                        count += 1;
                    }
                }
                count
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", pattern), |b| {
            b.iter(|| {
                let mut count = 0usize;
                for &k in &keys {
                    if bt_set.contains(&k) {
                        count += 1;
                    }
                }
                count
            });
        });
    }

    group.finish();
}

fn bench_set_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_remove");

    for (pattern, keys) in key_patterns(N) {
        group.bench_function(BenchmarkId::new("RBTreeSet", pattern), |b| {
            b.iter_batched(
                || keys.iter().copied().collect::<RBTreeSet<i64>>(),
                |mut set| {
                    for &k in &keys {
                        set.remove(&k);
                    }
                    set
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeSet", pattern), |b| {
            b.iter_batched(
                || keys.iter().copied().collect::<BTreeSet<i64>>(),
                |mut set| {
                    for &k in &keys {
                        set.remove(&k);
                    }
                    set
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_set_intersection(c: &mut Criterion) {
    // Half-overlapping sets of equal size, so the stitch path does real work.
    let rb_low: RBTreeSet<i64> = (0..N as i64).collect();
    let rb_high: RBTreeSet<i64> = (N as i64 / 2..N as i64 * 3 / 2).collect();
    let bt_low: BTreeSet<i64> = (0..N as i64).collect();
    let bt_high: BTreeSet<i64> = (N as i64 / 2..N as i64 * 3 / 2).collect();

    let mut group = c.benchmark_group("set_intersection");

    group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
        b.iter(|| rb_low.intersection(&rb_high).count());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| bt_low.intersection(&bt_high).count());
    });

    group.finish();
}

// ─── Stack Benchmarks ───────────────────────────────────────────────────────

fn bench_stack_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_push_pop");

    group.bench_function(BenchmarkId::new("Stack", N), |b| {
        b.iter(|| {
            let mut stack = Stack::new();
            for i in 0..N as i64 {
                stack.push(i);
            }
            while stack.pop().is_some() {}
            stack
        });
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for i in 0..N as i64 {
                vec.push(i);
            }
            while vec.pop().is_some() {}
            vec
        });
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(map_benches, bench_map_insert, bench_map_get, bench_map_remove, bench_map_iterate, bench_map_range,);

criterion_group!(set_benches, bench_set_insert, bench_set_contains, bench_set_remove, bench_set_intersection,);

criterion_group!(stack_benches, bench_stack_push_pop);

criterion_main!(map_benches, set_benches, stack_benches);
