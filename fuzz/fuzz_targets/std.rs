#![no_main]

// Differential fuzzing against `std::collections::HashMap`. Narrow key and
// value domains force collisions, growth, shrinking, and reserved-slot
// traffic within short operation sequences.

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use loquat::HashMap as LoquatHashMap;
use std::collections::HashMap as StdHashMap;

#[derive(Debug, Arbitrary)]
enum Operation {
    Insert(u8, u8),
    InsertIfAbsent(u8, u8),
    Remove(u8),
    Get(u8),
    Contains(u8),
    AddTo(u8, u8),
    Merge(u8, u8),
    Clear,
    Retain(u8),
    Trim(u8),
    Len,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    operations: Vec<Operation>,
}

fuzz_target!(|input: FuzzInput| {
    let mut std_map: StdHashMap<u64, u64> = StdHashMap::new();
    let mut map: LoquatHashMap<u64, u64> = LoquatHashMap::builder().capacity(0).build();

    for op in input.operations {
        match op {
            Operation::Insert(k, v) => {
                let (k, v) = (u64::from(k), u64::from(v));
                assert_eq!(map.insert(k, v), std_map.insert(k, v));
            }
            Operation::InsertIfAbsent(k, v) => {
                let (k, v) = (u64::from(k), u64::from(v));
                let expected = std_map.get(&k).copied();
                if expected.is_none() {
                    std_map.insert(k, v);
                }
                assert_eq!(map.insert_if_absent(k, v).copied(), expected);
            }
            Operation::Remove(k) => {
                let k = u64::from(k);
                assert_eq!(map.remove(&k), std_map.remove(&k));
            }
            Operation::Get(k) => {
                let k = u64::from(k);
                assert_eq!(map.get(&k), std_map.get(&k));
            }
            Operation::Contains(k) => {
                let k = u64::from(k);
                assert_eq!(map.contains_key(&k), std_map.contains_key(&k));
            }
            Operation::AddTo(k, n) => {
                let (k, n) = (u64::from(k), u64::from(n));
                let old = std_map.get(&k).copied().unwrap_or_default();
                std_map.insert(k, old + n);
                assert_eq!(map.add_to(k, n), old);
            }
            Operation::Merge(k, v) => {
                let (k, v) = (u64::from(k), u64::from(v));
                let merged = match std_map.get(&k) {
                    Some(old) => old + v,
                    None => v,
                };
                std_map.insert(k, merged);
                assert_eq!(
                    map.merge(k, v, |old, new| Some(old + new)).copied(),
                    Some(merged)
                );
            }
            Operation::Clear => {
                map.clear();
                std_map.clear();
            }
            Operation::Retain(modulus) => {
                let m = u64::from(modulus.max(1));
                map.retain(|k, _| k % m != 0);
                std_map.retain(|k, _| k % m != 0);
            }
            Operation::Trim(target) => {
                assert!(map.trim(usize::from(target)));
            }
            Operation::Len => {
                assert_eq!(map.len(), std_map.len());
                assert_eq!(map.is_empty(), std_map.is_empty());
            }
        }
    }

    // Final sweep: identical contents, every key reachable.
    assert_eq!(map.len(), std_map.len());
    for (k, v) in &std_map {
        assert_eq!(map.get(k), Some(v));
    }
    let mut count = 0;
    for (k, v) in &map {
        assert_eq!(std_map.get(k), Some(v));
        count += 1;
    }
    assert_eq!(count, std_map.len());
});
