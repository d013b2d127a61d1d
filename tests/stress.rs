// Heavier randomized workloads. Kept moderate by default; build with
// `RUSTFLAGS="--cfg loquat_stress"` for the long versions.

use loquat::{HashMap, ShardedHashMap};

use rand::prelude::*;
use std::sync::Arc;
use std::thread;

mod common;

fn iterations(default: usize, stress: usize) -> usize {
    if cfg!(loquat_stress) {
        stress
    } else {
        default
    }
}

#[test]
fn single_threaded_model_check() {
    let mut map: HashMap<u64, u64> = HashMap::builder().capacity(0).build();
    let mut model = std::collections::HashMap::new();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..iterations(100_000, 10_000_000) {
        let key = rng.gen_range(0..2000u64);
        match rng.gen_range(0..10) {
            0..=3 => {
                let value = rng.gen_range(0..1_000_000u64);
                assert_eq!(map.insert(key, value), model.insert(key, value));
            }
            4..=6 => {
                assert_eq!(map.remove(&key), model.remove(&key));
            }
            7 => {
                let default = map.get_or_default(&key);
                assert_eq!(default, model.get(&key).copied().unwrap_or_default());
            }
            8 => {
                let old = model.get(&key).copied().unwrap_or_default();
                model.insert(key, old + 1);
                assert_eq!(map.add_to(key, 1), old);
            }
            _ => {
                assert_eq!(map.get(&key), model.get(&key));
            }
        }
        assert_eq!(map.len(), model.len());
    }

    for (k, v) in &model {
        assert_eq!(map.get(k), Some(v));
    }
}

#[test]
fn sharded_overlapping_churn() {
    let map = Arc::new(ShardedHashMap::<u64, u64>::builder().shards(8).build());
    let threads = common::threads();
    let rounds = iterations(20, 500);

    let handles: Vec<_> = (0..threads as u64)
        .map(|seed| {
            let map = map.clone();
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                for _ in 0..rounds {
                    for _ in 0..1000 {
                        let key = rng.gen_range(0..500u64);
                        match rng.gen_range(0..3) {
                            0 => {
                                map.insert(key, key);
                            }
                            1 => {
                                map.remove(&key);
                            }
                            _ => {
                                // Whatever the interleaving, a present value
                                // is always the key's own.
                                if let Some(v) = map.get(&key) {
                                    assert_eq!(v, key);
                                }
                            }
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Quiescent now: the map must be internally consistent.
    let len = map.len();
    assert_eq!(map.iter().count(), len);
    for (k, v) in map.iter() {
        assert_eq!(k, v);
        assert_eq!(map.get(&k), Some(v));
    }
}

#[test]
fn sharded_growth_and_shrink_under_contention() {
    let map = Arc::new(
        ShardedHashMap::<u64, u64>::builder()
            .shards(4)
            .capacity(0)
            .build(),
    );
    let threads = common::threads();
    let rounds = iterations(10, 200);

    let handles: Vec<_> = (0..threads as u64)
        .map(|t| {
            let map = map.clone();
            thread::spawn(move || {
                let base = t * 100_000;
                for _ in 0..rounds {
                    for i in 0..2000 {
                        map.insert(base + i, i);
                    }
                    for i in 0..2000 {
                        assert_eq!(map.remove(&(base + i)), Some(i));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(map.is_empty());
}
