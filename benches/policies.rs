//! Criterion benchmarks comparing the eviction policies under common
//! access patterns: insert/get churn, pure eviction pressure, and a
//! hot/cold mix (70% of accesses to a small hot set).

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cachemux::builder::{Cache, CacheBuilder, PolicyKind};

const CAPACITY: usize = 1024;

fn kinds() -> Vec<(&'static str, PolicyKind)> {
    vec![
        ("lru", PolicyKind::Lru),
        (
            "lru_k",
            PolicyKind::LruK {
                history_capacity: CAPACITY,
                k: 2,
            },
        ),
        ("sharded_lru", PolicyKind::Sharded { shards: 8 }),
        (
            "lfu",
            PolicyKind::Lfu {
                max_avg_freq: 1_000_000,
            },
        ),
        ("arc", PolicyKind::Arc),
    ]
}

fn prefilled(kind: &PolicyKind) -> Cache<u64, u64> {
    let mut cache = CacheBuilder::new(CAPACITY)
        .try_build::<u64, u64>(kind.clone())
        .unwrap();
    for i in 0..CAPACITY as u64 {
        cache.put(i, i);
        // Give admission-filtered policies their second touch.
        cache.put(i, i);
    }
    cache
}

fn bench_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_get");
    for (name, kind) in kinds() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || prefilled(&kind),
                |mut cache| {
                    for i in 0..CAPACITY as u64 {
                        cache.put(std::hint::black_box(10_000 + i), i);
                        let _ = std::hint::black_box(cache.try_get(&std::hint::black_box(i)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_eviction_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction_churn");
    for (name, kind) in kinds() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || prefilled(&kind),
                |mut cache| {
                    for i in 0..4 * CAPACITY as u64 {
                        cache.put(std::hint::black_box(100_000 + i), i);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_hot_cold_mix(c: &mut Criterion) {
    // 70% of accesses go to a hot set of capacity/2 keys, the rest to a
    // cold universe 16x the capacity; 30% of operations are puts.
    let hot_keys = (CAPACITY / 2) as u64;
    let cold_keys = (CAPACITY * 16) as u64;

    let mut group = c.benchmark_group("hot_cold_mix");
    for (name, kind) in kinds() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || (prefilled(&kind), StdRng::seed_from_u64(42)),
                |(mut cache, mut rng)| {
                    for _ in 0..4096 {
                        let key = if rng.gen_range(0..100) < 70 {
                            rng.gen_range(0..hot_keys)
                        } else {
                            hot_keys + rng.gen_range(0..cold_keys)
                        };
                        if rng.gen_range(0..100) < 30 {
                            cache.put(std::hint::black_box(key), key);
                        } else {
                            let _ = std::hint::black_box(cache.try_get(&std::hint::black_box(key)));
                        }
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_get,
    bench_eviction_churn,
    bench_hot_cold_mix
);
criterion_main!(benches);
