#![cfg(feature = "serde")]

use loquat::{HashMap, HashSet, LinkedHashMap, LinkedHashSet, ShardedHashMap, ShardedHashSet};

#[test]
fn map_round_trip() {
    let mut map: HashMap<String, u64> = HashMap::new();
    for k in 0..50u64 {
        map.insert(k.to_string(), k);
    }
    let json = serde_json::to_string(&map).unwrap();
    let back: HashMap<String, u64> = serde_json::from_str(&json).unwrap();
    assert_eq!(map, back);
}

#[test]
fn linked_map_serializes_in_order() {
    let mut map: LinkedHashMap<String, u64> = LinkedHashMap::new();
    map.insert("b".to_string(), 2);
    map.insert("a".to_string(), 1);
    map.insert("c".to_string(), 3);

    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"b":2,"a":1,"c":3}"#);

    let back: LinkedHashMap<String, u64> = serde_json::from_str(&json).unwrap();
    let keys: Vec<_> = back.keys().cloned().collect();
    assert_eq!(keys, ["b", "a", "c"]);
}

#[test]
fn sharded_map_round_trip() {
    let map: ShardedHashMap<String, u64> = ShardedHashMap::new();
    for k in 0..50u64 {
        map.insert(k.to_string(), k);
    }
    let json = serde_json::to_string(&map).unwrap();
    let back: ShardedHashMap<String, u64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 50);
    for k in 0..50u64 {
        assert_eq!(back.get(&k.to_string()), Some(k));
    }
}

#[test]
fn set_round_trip() {
    let set: HashSet<u64> = (0..50u64).collect();
    let json = serde_json::to_string(&set).unwrap();
    let back: HashSet<u64> = serde_json::from_str(&json).unwrap();
    assert_eq!(set, back);
}

#[test]
fn linked_set_serializes_in_order() {
    let set: LinkedHashSet<u64> = [5u64, 1, 9].into_iter().collect();
    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, "[5,1,9]");

    let back: LinkedHashSet<u64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.iter().copied().collect::<Vec<_>>(), [5, 1, 9]);
}

#[test]
fn sharded_set_round_trip() {
    let set: ShardedHashSet<u64> = (0..50u64).collect();
    let json = serde_json::to_string(&set).unwrap();
    let back: ShardedHashSet<u64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 50);
    for k in 0..50u64 {
        assert!(back.contains(&k));
    }
}
