#![allow(dead_code)]

use loquat::{HashMap, LinkedHashMap};

// Run the test on different configurations of a `HashMap`.
pub fn with_map<K, V>(mut test: impl FnMut(&dyn Fn() -> HashMap<K, V>)) {
    // Defaults.
    test(&(|| HashMap::builder().build()));

    // Minimal table with a low load factor, to stress growth.
    test(&(|| HashMap::builder().capacity(0).load_factor(0.5).build()));

    // Dense table, to stress long probe chains and compaction.
    test(&(|| HashMap::builder().capacity(2).load_factor(0.9).build()));
}

// Run the test on different configurations of a `LinkedHashMap`.
pub fn with_linked_map<K, V>(mut test: impl FnMut(&dyn Fn() -> LinkedHashMap<K, V>)) {
    test(&(|| LinkedHashMap::builder().build()));
    test(&(|| LinkedHashMap::builder().capacity(0).load_factor(0.5).build()));
    test(&(|| LinkedHashMap::builder().capacity(2).load_factor(0.9).build()));
}

// Returns the number of threads to use for stress testing.
pub fn threads() -> usize {
    num_cpus::get_physical().next_power_of_two().clamp(2, 16)
}
