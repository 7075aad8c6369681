// ==============================================
// CONCURRENCY TESTS (integration)
// ==============================================
//
// Multi-thread hammering of the two concurrent surfaces: the mutex
// wrapper (one lock, sequentially consistent per instance) and the
// sharded LRU (independent per-shard locks, per-shard atomicity only).

use std::sync::Arc;
use std::thread;

use cachemux::concurrent::{ConcurrentArcCache, ConcurrentLfuCache, ConcurrentLruCache};
use cachemux::policy::arc::ArcCache;
use cachemux::policy::lfu::LfuCache;
use cachemux::policy::lru::LruCache;
use cachemux::policy::sharded::ShardedLruCache;

const THREADS: u64 = 4;
const OPS_PER_THREAD: u64 = 2_000;

#[test]
fn mutex_wrapped_lru_stays_consistent() {
    let cache = Arc::new(ConcurrentLruCache::new(LruCache::try_new(32).unwrap()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t * 7 + i) % 64;
                    match i % 4 {
                        0 | 1 => cache.put(key, i),
                        2 => {
                            cache.try_get(&key);
                        },
                        _ => cache.remove(&key),
                    }
                    assert!(cache.len() <= 32);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let core = Arc::into_inner(cache).unwrap().into_inner();
    core.debug_validate_invariants();
}

#[test]
fn writes_by_one_thread_are_observed_atomically() {
    // Each thread owns a private key range: a read of its own key returns
    // either its latest write or a miss (evicted), never a torn or foreign
    // value.
    let cache = Arc::new(ConcurrentLruCache::new(LruCache::try_new(64).unwrap()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let base = t * 1_000;
                for i in 0..OPS_PER_THREAD {
                    let key = base + (i % 8);
                    cache.put(key, (t, i));
                    match cache.try_get(&key) {
                        Some((owner, _)) => assert_eq!(owner, t),
                        None => {} // evicted by other threads' inserts
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn mutex_wrapped_lfu_and_arc_survive_hammering() {
    let lfu = Arc::new(ConcurrentLfuCache::new(
        LfuCache::try_with_max_avg(16, 8).unwrap(),
    ));
    let arc = Arc::new(ConcurrentArcCache::new(ArcCache::new(16)));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let lfu = Arc::clone(&lfu);
            let arc = Arc::clone(&arc);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t + i * 3) % 40;
                    if i % 3 == 0 {
                        lfu.put(key, i);
                        arc.put(key, i);
                    } else {
                        lfu.try_get(&key);
                        arc.try_get(&key);
                    }
                    assert!(lfu.len() <= 16);
                    assert!(arc.len() <= 16);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    Arc::into_inner(lfu)
        .unwrap()
        .into_inner()
        .debug_validate_invariants();
    Arc::into_inner(arc)
        .unwrap()
        .into_inner()
        .debug_validate_invariants();
}

#[test]
fn sharded_lru_parallel_workload() {
    let cache = Arc::new(ShardedLruCache::try_new(128, 8).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t * 31 + i) % 256;
                    match i % 5 {
                        0..=2 => cache.put(key, key * 2),
                        3 => {
                            // A hit must return the one value every writer
                            // stores for this key.
                            if let Some(value) = cache.try_get(&key) {
                                assert_eq!(value, key * 2);
                            }
                        },
                        _ => cache.remove(&key),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    cache.debug_validate_invariants();

    // Sharded capacity bound: N * ceil(C / N).
    assert!(cache.len() <= 8 * 128usize.div_ceil(8));
}

#[test]
fn sharded_lru_thread_private_ranges_round_trip() {
    let cache = Arc::new(ShardedLruCache::try_new(1_024, 4).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let base = t * 10_000;
                for i in 0..100 {
                    cache.put(base + i, (t, i));
                }
                for i in 0..100 {
                    match cache.try_get(&(base + i)) {
                        Some((owner, value)) => {
                            assert_eq!(owner, t);
                            assert_eq!(value, i);
                        },
                        None => {} // pushed out by concurrent fill
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
