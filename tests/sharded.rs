use loquat::{ShardedHashMap, ShardedHashSet};

use std::sync::Arc;
use std::thread;

mod common;

#[test]
fn insert_get_remove() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::new();
    assert_eq!(map.insert(1, 10), None);
    assert_eq!(map.insert(1, 11), Some(10));
    assert_eq!(map.get(&1), Some(11));
    assert_eq!(map.get(&2), None);
    assert!(map.contains_key(&1));
    assert_eq!(map.remove(&1), Some(11));
    assert_eq!(map.remove(&1), None);
    assert!(map.is_empty());
}

#[test]
fn default_key_round_trip() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::new();
    assert_eq!(map.insert(0, 5), None);
    assert_eq!(map.get(&0), Some(5));
    assert_eq!(map.remove(&0), Some(5));
    assert_eq!(map.get(&0), None);
}

#[test]
fn len_sums_shards() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder().shards(8).build();
    for k in 0..1000 {
        map.insert(k, k);
    }
    assert_eq!(map.len(), 1000);
    for k in 0..500 {
        map.remove(&k);
    }
    assert_eq!(map.len(), 500);
}

#[test]
fn update_operations() {
    let map: ShardedHashMap<u64, i64> = ShardedHashMap::new();

    assert_eq!(map.insert_if_absent(1, 10), None);
    assert_eq!(map.insert_if_absent(1, 20), Some(10));

    assert_eq!(map.replace(&2, 5), None);
    assert_eq!(map.replace(&1, 5), Some(10));

    assert_eq!(map.add_to(3, 2), 0);
    assert_eq!(map.add_to(3, 2), 2);
    assert_eq!(map.sub_from(3, 4), 4);
    assert!(!map.contains_key(&3));

    assert_eq!(map.compute(4, |_, v| { assert!(v.is_none()); Some(1) }), Some(1));
    assert_eq!(map.compute(4, |_, v| v.map(|v| v + 1)), Some(2));
    assert_eq!(map.compute(4, |_, _| None), None);
    assert!(!map.contains_key(&4));

    assert_eq!(map.compute_if_absent(5, |_| 7), 7);
    assert_eq!(map.compute_if_absent(5, |_| 9), 7);
    assert_eq!(map.compute_if_present(&5, |_, v| Some(v * 2)), Some(14));
    assert_eq!(map.compute_if_present(&6, |_, _| Some(0)), None);

    assert_eq!(map.merge(7, 3, |_, _| unreachable!()), Some(3));
    assert_eq!(map.merge(7, 4, |old, new| Some(old + new)), Some(7));
    assert_eq!(map.merge_or_remove(7, -7, |old, new| old + new), None);
    assert!(!map.contains_key(&7));

    assert_eq!(map.get_or_default(&100), 0);
    assert_eq!(map.remove_or_default(&100), 0);
}

#[test]
fn single_shard_iterates_in_insertion_order() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder().shards(1).build();
    let inserted = [9u64, 2, 7, 4];
    for k in inserted {
        map.insert(k, k * 10);
    }
    let keys: Vec<u64> = map.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, inserted);

    let rev: Vec<u64> = map.iter_rev().map(|(k, _)| k).collect();
    assert_eq!(rev, [4, 7, 2, 9]);
}

#[test]
fn iteration_visits_every_entry_once() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder().shards(16).build();
    for k in 0..1000 {
        map.insert(k, k);
    }
    let mut seen = std::collections::HashSet::new();
    for (k, v) in map.iter() {
        assert_eq!(k, v);
        assert!(seen.insert(k));
    }
    assert_eq!(seen.len(), 1000);

    // Reverse iteration covers the same entries.
    let mut seen_rev = std::collections::HashSet::new();
    for (k, _) in map.iter_rev() {
        assert!(seen_rev.insert(k));
    }
    assert_eq!(seen, seen_rev);
}

#[test]
fn iter_rev_is_exact_reverse() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder().shards(4).build();
    for k in 0..100 {
        map.insert(k, k);
    }
    let forward: Vec<u64> = map.iter().map(|(k, _)| k).collect();
    let mut backward: Vec<u64> = map.iter_rev().map(|(k, _)| k).collect();
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn clear_and_retain() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder().shards(4).build();
    for k in 0..100 {
        map.insert(k, k);
    }
    map.retain(|k, _| k % 2 == 0);
    assert_eq!(map.len(), 50);
    assert!(map.contains_key(&2));
    assert!(!map.contains_key(&3));

    map.clear();
    assert!(map.is_empty());
    map.insert(1, 1);
    assert_eq!(map.get(&1), Some(1));
}

#[test]
fn trim_shards() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder()
        .shards(4)
        .capacity(100_000)
        .build();
    for k in 0..100 {
        map.insert(k, k);
    }
    assert!(map.trim(100));
    for k in 0..100 {
        assert_eq!(map.get(&k), Some(k));
    }
    assert!(map.clear_and_trim(0));
    assert!(map.is_empty());
}

#[test]
fn clone_is_deep() {
    let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder().shards(4).build();
    for k in 0..100 {
        map.insert(k, k);
    }
    let copy = map.clone();
    map.clear();
    assert_eq!(copy.len(), 100);
    assert_eq!(copy.get(&42), Some(42));
}

#[test]
fn concurrent_inserts_disjoint_ranges() {
    let map = Arc::new(ShardedHashMap::<u64, u64>::new());
    let threads = common::threads();
    let per_thread = 10_000u64;

    let handles: Vec<_> = (0..threads as u64)
        .map(|t| {
            let map = map.clone();
            thread::spawn(move || {
                let base = t * per_thread;
                for i in 0..per_thread {
                    map.insert(base + i, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(map.len(), threads * per_thread as usize);
    for t in 0..threads as u64 {
        for i in (0..per_thread).step_by(997) {
            assert_eq!(map.get(&(t * per_thread + i)), Some(i));
        }
    }
}

#[test]
fn concurrent_insert_if_absent_single_winner() {
    let map = Arc::new(ShardedHashMap::<u64, u64>::new());
    let threads = common::threads();

    let handles: Vec<_> = (0..threads as u64)
        .map(|t| {
            let map = map.clone();
            thread::spawn(move || {
                let mut wins = 0u64;
                for k in 0..1000 {
                    if map.insert_if_absent(k, t).is_none() {
                        wins += 1;
                    }
                }
                wins
            })
        })
        .collect();

    let total_wins: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total_wins, 1000, "every key has exactly one winning insert");
    assert_eq!(map.len(), 1000);
}

#[test]
fn concurrent_mixed_churn() {
    let map = Arc::new(ShardedHashMap::<u64, u64>::builder().shards(8).build());
    let threads = common::threads();

    let handles: Vec<_> = (0..threads as u64)
        .map(|t| {
            let map = map.clone();
            thread::spawn(move || {
                for round in 0..50u64 {
                    let base = t * 1000;
                    for i in 0..1000 {
                        map.insert(base + i, round);
                    }
                    for i in 0..1000 {
                        assert!(map.get(&(base + i)).is_some());
                    }
                    for i in 0..500 {
                        assert_eq!(map.remove(&(base + i)), Some(round));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Each thread ends with keys base+500..base+1000 present.
    assert_eq!(map.len(), threads * 500);
}

#[test]
fn concurrent_counters() {
    let map = Arc::new(ShardedHashMap::<u64, u64>::new());
    let threads = common::threads();

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let map = map.clone();
            thread::spawn(move || {
                for k in 0..100 {
                    map.add_to(k, 1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for k in 0..100 {
        assert_eq!(map.get(&k), Some(threads as u64), "key {k}");
    }
}

#[test]
fn sharded_set() {
    let set: ShardedHashSet<u64> = ShardedHashSet::builder().shards(4).build();
    assert!(set.insert(1));
    assert!(!set.insert(1));
    assert!(set.contains(&1));
    assert_eq!(set.len(), 1);

    for k in 0..100 {
        set.insert(k);
    }
    set.retain(|k| k % 2 == 0);
    assert_eq!(set.len(), 50);
    assert!(set.remove(&2));
    assert!(!set.remove(&3));

    let mut seen = std::collections::HashSet::new();
    for k in set.iter() {
        assert!(seen.insert(k));
    }
    assert_eq!(seen.len(), set.len());

    set.clear();
    assert!(set.is_empty());
}

#[test]
fn concurrent_set_inserts() {
    let set = Arc::new(ShardedHashSet::<u64>::new());
    let threads = common::threads();

    let handles: Vec<_> = (0..threads as u64)
        .map(|_| {
            let set = set.clone();
            thread::spawn(move || {
                let mut added = 0u64;
                for k in 0..5000 {
                    if set.insert(k) {
                        added += 1;
                    }
                }
                added
            })
        })
        .collect();

    let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 5000);
    assert_eq!(set.len(), 5000);
}
