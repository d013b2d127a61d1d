#![doc = include_str!("../README.md")]

mod equivalence;
mod raw;

pub mod linked;
pub mod map;
pub mod set;
pub mod sharded;

#[cfg(feature = "serde")]
mod serde_impls;

pub use equivalence::{Equivalence, Natural};
pub use linked::{LinkedHashMap, LinkedHashMapBuilder, LinkedHashSet, LinkedHashSetBuilder};
pub use map::{HashMap, HashMapBuilder};
pub use set::{HashSet, HashSetBuilder};
pub use sharded::{
    ShardedHashMap, ShardedHashMapBuilder, ShardedHashSet, ShardedHashSetBuilder,
};
