//! Lock-striped concurrent map and set.
//!
//! The table is split into independent shards, each a complete ordered table
//! behind its own reader-writer lock. A key's shard is selected by the *high*
//! bits of its mixed hash, so in-shard probe distribution (driven by the low
//! bits) is unaffected by sharding. Every per-key operation hashes once,
//! locks exactly one shard, and never holds two shard locks, so there is no
//! lock-ordering deadlock — and also no cross-shard atomicity: `len` and bulk
//! reads are best-effort snapshots under concurrent writers.

use crate::equivalence::{Equivalence, Natural};
use crate::map::{check_load_factor, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::raw::{mix, Chain, RawTable};

use std::fmt;
use std::marker::PhantomData;
use std::ops::{AddAssign, SubAssign};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Largest accepted shard count.
pub(crate) const MAX_SHARDS: usize = 1 << 15;

type Shard<K, V, E> = RawTable<K, V, E, Chain>;

/// A concurrent hash map using lock striping.
///
/// Within a shard, entries keep insertion order; iteration visits shards in
/// index order and follows each shard's order chain, so [`iter`] yields a
/// stable stitched sequence when the map is quiescent. Iterating while other
/// threads mutate the map is safe — each shard's invariants hold — but the
/// view is unspecified: a concurrent writer may appear in some shards and not
/// others.
///
/// Operations take `&self`; the map is shared by reference (or `Arc`) across
/// threads.
///
/// # Examples
///
/// ```
/// use loquat::ShardedHashMap;
/// use std::sync::Arc;
///
/// let map = Arc::new(ShardedHashMap::new());
/// let handles: Vec<_> = (0..4u64)
///     .map(|t| {
///         let map = map.clone();
///         std::thread::spawn(move || {
///             for i in 1..=100u64 {
///                 map.insert(t * 1000 + i, i);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(map.len(), 400);
/// ```
///
/// [`iter`]: ShardedHashMap::iter
pub struct ShardedHashMap<K, V, E = Natural> {
    shards: Box<[RwLock<Shard<K, V, E>>]>,
    shard_bits: u32,
    strategy: E,
    default_value: Option<V>,
}

/// A builder for a [`ShardedHashMap`].
///
/// # Examples
///
/// ```
/// use loquat::ShardedHashMap;
///
/// let map: ShardedHashMap<u64, u64> = ShardedHashMap::builder()
///     // Expected total entries, split across shards.
///     .capacity(10_000)
///     // Shard count; rounded up to a power of two.
///     .shards(8)
///     .build();
/// assert_eq!(map.shard_count(), 8);
/// ```
pub struct ShardedHashMapBuilder<K, V, E = Natural> {
    capacity: usize,
    load_factor: f64,
    shards: Option<usize>,
    strategy: E,
    default_value: Option<V>,
    _marker: PhantomData<K>,
}

impl<K, V> ShardedHashMapBuilder<K, V> {
    /// Sets the hasher used by the stock [`Natural`] strategy.
    pub fn hasher<S>(self, hasher: S) -> ShardedHashMapBuilder<K, V, Natural<S>> {
        ShardedHashMapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            shards: self.shards,
            strategy: Natural::with_hasher(hasher),
            default_value: self.default_value,
            _marker: PhantomData,
        }
    }
}

impl<K, V, E> ShardedHashMapBuilder<K, V, E> {
    /// Sets the total number of entries the map should hold before any shard
    /// grows.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the per-shard load factor.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Sets the shard count. Rounded up to a power of two; must be between 1
    /// and 32768 or `build` panics. Defaults to a multiple of the available
    /// parallelism.
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    /// Replaces the equivalence strategy.
    pub fn strategy<E2>(self, strategy: E2) -> ShardedHashMapBuilder<K, V, E2> {
        ShardedHashMapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            shards: self.shards,
            strategy,
            default_value: self.default_value,
            _marker: PhantomData,
        }
    }

    /// Sets the value the `*_or_default` operations report for absent keys.
    pub fn default_value(mut self, value: V) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Builds the map, panicking on an invalid configuration.
    pub fn build(self) -> ShardedHashMap<K, V, E>
    where
        E: Clone,
    {
        check_load_factor(self.load_factor);
        let requested = self.shards.unwrap_or_else(default_shards);
        assert!(requested >= 1, "shard count must be at least 1");
        let count = requested.next_power_of_two();
        assert!(
            count <= MAX_SHARDS,
            "shard count must not exceed {MAX_SHARDS}, got {requested}"
        );

        let per_shard = self.capacity.div_ceil(count);
        let shards: Box<[_]> = (0..count)
            .map(|_| {
                RwLock::new(RawTable::with_capacity(
                    per_shard,
                    self.load_factor,
                    self.strategy.clone(),
                ))
            })
            .collect();

        ShardedHashMap {
            shards,
            shard_bits: count.trailing_zeros(),
            strategy: self.strategy,
            default_value: self.default_value,
        }
    }
}

impl<K, V, E> fmt::Debug for ShardedHashMapBuilder<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedHashMapBuilder")
            .field("capacity", &self.capacity)
            .field("load_factor", &self.load_factor)
            .field("shards", &self.shards)
            .finish_non_exhaustive()
    }
}

fn default_shards() -> usize {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    (threads * 4).min(MAX_SHARDS)
}

impl<K, V> ShardedHashMap<K, V> {
    /// Creates an empty map with the default shard count and capacity.
    pub fn new() -> ShardedHashMap<K, V> {
        ShardedHashMap::builder().build()
    }

    /// Creates an empty map sized for `capacity` total entries.
    pub fn with_capacity(capacity: usize) -> ShardedHashMap<K, V> {
        ShardedHashMap::builder().capacity(capacity).build()
    }

    /// Returns a builder for more involved configuration.
    pub fn builder() -> ShardedHashMapBuilder<K, V> {
        ShardedHashMapBuilder {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            shards: None,
            strategy: Natural::default(),
            default_value: None,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Default for ShardedHashMap<K, V> {
    fn default() -> Self {
        ShardedHashMap::new()
    }
}

impl<K, V, E> ShardedHashMap<K, V, E> {
    /// Returns the shard count.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the number of entries: the sum of shard sizes, read without a
    /// global lock. Under concurrent mutation this is a best-effort snapshot,
    /// not an atomic count.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| read(shard).len()).sum()
    }

    /// Returns `true` if no shard holds entries. Best-effort, like
    /// [`ShardedHashMap::len`].
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| read(shard).is_empty())
    }

    /// Removes all entries, visiting shards in index order. Concurrent
    /// writers may repopulate already-cleared shards before the call returns.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            write(shard).clear();
        }
    }

    /// An iterator over cloned `(K, V)` pairs: shards in index order, each
    /// shard's entries in insertion order. One shard read lock is held at a
    /// time.
    pub fn iter(&self) -> Iter<'_, K, V, E> {
        Iter {
            shards: &self.shards,
            index: 0,
            guard: None,
            slot: None,
        }
    }

    /// [`ShardedHashMap::iter`] in the opposite direction: shards in reverse
    /// index order, entries newest-first.
    pub fn iter_rev(&self) -> IterRev<'_, K, V, E> {
        IterRev {
            index: self.shards.len(),
            shards: &self.shards,
            guard: None,
            slot: None,
        }
    }

    /// Visits every entry under the owning shard's read lock, shards in
    /// index order, entries in insertion order. Stops at the first error.
    pub(crate) fn for_each_entry<Er>(
        &self,
        mut f: impl FnMut(&K, &V) -> Result<(), Er>,
    ) -> Result<(), Er> {
        for shard in self.shards.iter() {
            let guard = read(shard);
            let mut cursor = guard.chain_first();
            while let Some(slot) = cursor {
                let (k, v) = guard.pair(slot);
                f(k, v)?;
                cursor = guard.chain_next(slot);
            }
        }
        Ok(())
    }

    #[inline]
    fn shard_for(&self, hash: u64) -> usize {
        if self.shard_bits == 0 {
            0
        } else {
            (mix(hash) >> (64 - self.shard_bits)) as usize
        }
    }

    fn default_return(&self) -> V
    where
        V: Clone + Default,
    {
        self.default_value.clone().unwrap_or_default()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().expect("shard lock poisoned")
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().expect("shard lock poisoned")
}

impl<K, V, E: Equivalence<K>> ShardedHashMap<K, V, E> {
    /// Returns a clone of the value for `key`, under the shard's read lock.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let hash = self.strategy.hash(key);
        let shard = read(&self.shards[self.shard_for(hash)]);
        shard
            .find_hashed(key, hash)
            .ok()
            .map(|slot| shard.value_ref(slot).clone())
    }

    /// Returns the value for `key`, or the configured default if absent.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        match self.get(key) {
            Some(value) => value,
            None => self.default_return(),
        }
    }

    /// Returns `true` if `key` has an entry.
    pub fn contains_key(&self, key: &K) -> bool {
        let hash = self.strategy.hash(key);
        read(&self.shards[self.shard_for(hash)])
            .find_hashed(key, hash)
            .is_ok()
    }

    /// Inserts a key-value pair, returning the previous value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        match shard.find_hashed(&key, hash) {
            Ok(slot) => Some(shard.replace_value(slot, value)),
            Err(slot) => {
                shard.insert_rehashed(slot, key, value);
                None
            }
        }
    }

    /// Inserts only if `key` is absent; returns a clone of the existing
    /// value otherwise.
    pub fn insert_if_absent(&self, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        match shard.find_hashed(&key, hash) {
            Ok(slot) => Some(shard.value_ref(slot).clone()),
            Err(slot) => {
                shard.insert_rehashed(slot, key, value);
                None
            }
        }
    }

    /// Replaces the value for `key` only if present.
    pub fn replace(&self, key: &K, value: V) -> Option<V> {
        let hash = self.strategy.hash(key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        match shard.find_hashed(key, hash) {
            Ok(slot) => Some(shard.replace_value(slot, value)),
            Err(_) => None,
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        let hash = self.strategy.hash(key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        match shard.find_hashed(key, hash) {
            Ok(slot) => {
                let value = shard.take_at(slot);
                shard.shrink_if_sparse();
                Some(value)
            }
            Err(_) => None,
        }
    }

    /// Removes `key`, returning its value or the configured default.
    pub fn remove_or_default(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        match self.remove(key) {
            Some(value) => value,
            None => self.default_return(),
        }
    }

    /// Adds `increment` to the value for `key` under the shard's write lock.
    /// Returns the previous value (or the default).
    pub fn add_to(&self, key: K, increment: V) -> V
    where
        V: AddAssign + Clone + Default,
    {
        let default = self.default_return();
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        shard.add_to(key, increment, default)
    }

    /// Subtracts `decrement` from the value for `key`, removing the entry if
    /// the result returns to the default value.
    pub fn sub_from(&self, key: K, decrement: V) -> V
    where
        V: SubAssign + Clone + Default + PartialEq,
    {
        let default = self.default_return();
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        shard.sub_from(key, decrement, default)
    }

    /// Read-modify-write in one shard lock acquisition; `None` from `f`
    /// removes the entry. Returns a clone of the stored result.
    pub fn compute<F>(&self, key: K, f: F) -> Option<V>
    where
        V: Clone,
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        shard.compute(key, f).cloned()
    }

    /// Returns the value for `key`, inserting `f(&key)` first if absent.
    pub fn compute_if_absent<F>(&self, key: K, f: F) -> V
    where
        V: Clone,
        F: FnOnce(&K) -> V,
    {
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        shard.compute_if_absent(key, f).clone()
    }

    /// Recomputes the value for `key` only if present; `None` removes the
    /// entry.
    pub fn compute_if_present<F>(&self, key: &K, f: F) -> Option<V>
    where
        V: Clone,
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let hash = self.strategy.hash(key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        shard.compute_if_present(key, f).cloned()
    }

    /// Inserts `value` or combines it with the present value via `f`, in one
    /// lock acquisition.
    pub fn merge<F>(&self, key: K, value: V, f: F) -> Option<V>
    where
        V: Clone,
        F: FnOnce(&V, V) -> Option<V>,
    {
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        shard.merge(key, value, f).cloned()
    }

    /// Like [`ShardedHashMap::merge`], treating the configured default value
    /// as absence.
    pub fn merge_or_remove<F>(&self, key: K, value: V, f: F) -> Option<V>
    where
        V: Clone + Default + PartialEq,
        F: FnOnce(&V, V) -> V,
    {
        let default = self.default_return();
        let hash = self.strategy.hash(&key);
        let mut shard = write(&self.shards[self.shard_for(hash)]);
        shard.merge_or_remove(key, value, &default, f).cloned()
    }

    /// Keeps only the entries for which `f` returns `true`, one shard write
    /// lock at a time.
    pub fn retain(&self, mut f: impl FnMut(&K, &mut V) -> bool)
    where
        K: Clone,
    {
        for shard in self.shards.iter() {
            write(shard).retain(&mut f);
        }
    }

    /// Shrinks each shard toward its share of `target` entries. Returns
    /// `false` if any shard's arrays could not be allocated.
    pub fn trim(&self, target: usize) -> bool {
        let per_shard = target.div_ceil(self.shards.len());
        let mut ok = true;
        for shard in self.shards.iter() {
            ok &= write(shard).trim(per_shard);
        }
        ok
    }

    /// Clears the map, then shrinks as [`ShardedHashMap::trim`] does.
    pub fn clear_and_trim(&self, target: usize) -> bool {
        let per_shard = target.div_ceil(self.shards.len());
        let mut ok = true;
        for shard in self.shards.iter() {
            ok &= write(shard).clear_and_trim(per_shard);
        }
        ok
    }
}

impl<K: Clone, V: Clone, E: Clone> Clone for ShardedHashMap<K, V, E> {
    /// Deep-clones the map, taking each shard's read lock in index order.
    /// The clone shares no state with the source.
    fn clone(&self) -> Self {
        let shards: Box<[_]> = self
            .shards
            .iter()
            .map(|shard| RwLock::new(read(shard).clone()))
            .collect();
        ShardedHashMap {
            shards,
            shard_bits: self.shard_bits,
            strategy: self.strategy.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, E> fmt::Debug for ShardedHashMap<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for shard in self.shards.iter() {
            let guard = read(shard);
            let mut cursor = guard.chain_first();
            while let Some(slot) = cursor {
                let (k, v) = guard.pair(slot);
                map.entry(k, v);
                cursor = guard.chain_next(slot);
            }
        }
        map.finish()
    }
}

impl<K, V, E: Equivalence<K>> Extend<(K, V)> for ShardedHashMap<K, V, E> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ShardedHashMap<K, V>
where
    Natural: Equivalence<K>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ShardedHashMap::new();
        map.extend(iter);
        map
    }
}

/// An iterator stitching the shards' order chains into one sequence.
pub struct Iter<'a, K, V, E = Natural> {
    shards: &'a [RwLock<Shard<K, V, E>>],
    index: usize,
    guard: Option<RwLockReadGuard<'a, Shard<K, V, E>>>,
    slot: Option<usize>,
}

impl<K: Clone, V: Clone, E> Iterator for Iter<'_, K, V, E> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.slot {
                let guard = self.guard.as_ref().expect("position without shard guard");
                let (k, v) = guard.pair(slot);
                let item = (k.clone(), v.clone());
                let next = guard.chain_next(slot);
                self.slot = next;
                if next.is_none() {
                    // Chain exhausted: release this shard before the next
                    // call locks the following one.
                    self.guard = None;
                    self.index += 1;
                }
                return Some(item);
            }
            if self.index >= self.shards.len() {
                return None;
            }
            let guard = read(&self.shards[self.index]);
            match guard.chain_first() {
                Some(slot) => {
                    self.slot = Some(slot);
                    self.guard = Some(guard);
                }
                None => self.index += 1,
            }
        }
    }
}

/// [`Iter`] walking shards and chains in reverse.
pub struct IterRev<'a, K, V, E = Natural> {
    shards: &'a [RwLock<Shard<K, V, E>>],
    index: usize,
    guard: Option<RwLockReadGuard<'a, Shard<K, V, E>>>,
    slot: Option<usize>,
}

impl<K: Clone, V: Clone, E> Iterator for IterRev<'_, K, V, E> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.slot {
                let guard = self.guard.as_ref().expect("position without shard guard");
                let (k, v) = guard.pair(slot);
                let item = (k.clone(), v.clone());
                let prev = guard.chain_prev(slot);
                self.slot = prev;
                if prev.is_none() {
                    self.guard = None;
                }
                return Some(item);
            }
            if self.index == 0 {
                return None;
            }
            self.index -= 1;
            let guard = read(&self.shards[self.index]);
            if let Some(slot) = guard.chain_last() {
                self.slot = Some(slot);
                self.guard = Some(guard);
            }
        }
    }
}

/// A concurrent hash set using lock striping.
///
/// # Examples
///
/// ```
/// use loquat::ShardedHashSet;
///
/// let set = ShardedHashSet::new();
/// assert!(set.insert(7));
/// assert!(!set.insert(7));
/// assert!(set.contains(&7));
/// ```
pub struct ShardedHashSet<K, E = Natural> {
    map: ShardedHashMap<K, (), E>,
}

/// A builder for a [`ShardedHashSet`].
pub struct ShardedHashSetBuilder<K, E = Natural> {
    inner: ShardedHashMapBuilder<K, (), E>,
}

impl<K> ShardedHashSetBuilder<K> {
    pub fn hasher<S>(self, hasher: S) -> ShardedHashSetBuilder<K, Natural<S>> {
        ShardedHashSetBuilder {
            inner: self.inner.hasher(hasher),
        }
    }
}

impl<K, E> ShardedHashSetBuilder<K, E> {
    pub fn capacity(self, capacity: usize) -> Self {
        ShardedHashSetBuilder {
            inner: self.inner.capacity(capacity),
        }
    }

    pub fn load_factor(self, load_factor: f64) -> Self {
        ShardedHashSetBuilder {
            inner: self.inner.load_factor(load_factor),
        }
    }

    pub fn shards(self, shards: usize) -> Self {
        ShardedHashSetBuilder {
            inner: self.inner.shards(shards),
        }
    }

    pub fn strategy<E2>(self, strategy: E2) -> ShardedHashSetBuilder<K, E2> {
        ShardedHashSetBuilder {
            inner: self.inner.strategy(strategy),
        }
    }

    pub fn build(self) -> ShardedHashSet<K, E>
    where
        E: Clone,
    {
        ShardedHashSet {
            map: self.inner.build(),
        }
    }
}

impl<K> ShardedHashSet<K> {
    pub fn new() -> ShardedHashSet<K> {
        ShardedHashSet {
            map: ShardedHashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> ShardedHashSet<K> {
        ShardedHashSet {
            map: ShardedHashMap::with_capacity(capacity),
        }
    }

    pub fn builder() -> ShardedHashSetBuilder<K> {
        ShardedHashSetBuilder {
            inner: ShardedHashMap::builder(),
        }
    }
}

impl<K> Default for ShardedHashSet<K> {
    fn default() -> Self {
        ShardedHashSet::new()
    }
}

impl<K, E> ShardedHashSet<K, E> {
    pub fn shard_count(&self) -> usize {
        self.map.shard_count()
    }

    /// Best-effort element count, as [`ShardedHashMap::len`].
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    /// An iterator over cloned elements: shards in index order, each shard's
    /// elements in insertion order.
    pub fn iter(&self) -> SetIter<'_, K, E> {
        SetIter {
            inner: self.map.iter(),
        }
    }

    /// Visits every element under the owning shard's read lock.
    pub(crate) fn for_each_element<Er>(
        &self,
        mut f: impl FnMut(&K) -> Result<(), Er>,
    ) -> Result<(), Er> {
        self.map.for_each_entry(|k, _| f(k))
    }
}

impl<K, E: Equivalence<K>> ShardedHashSet<K, E> {
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Adds `key`, returning `true` if it was not already present.
    pub fn insert(&self, key: K) -> bool {
        let hash = self.map.strategy.hash(&key);
        let mut shard = write(&self.map.shards[self.map.shard_for(hash)]);
        match shard.find_hashed(&key, hash) {
            Ok(_) => false,
            Err(slot) => {
                shard.insert_rehashed(slot, key, ());
                true
            }
        }
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    pub fn retain(&self, mut f: impl FnMut(&K) -> bool)
    where
        K: Clone,
    {
        self.map.retain(|k, _| f(k));
    }

    pub fn trim(&self, target: usize) -> bool {
        self.map.trim(target)
    }

    pub fn clear_and_trim(&self, target: usize) -> bool {
        self.map.clear_and_trim(target)
    }
}

impl<K: Clone, E: Clone> Clone for ShardedHashSet<K, E> {
    fn clone(&self) -> Self {
        ShardedHashSet {
            map: self.map.clone(),
        }
    }
}

impl<K: fmt::Debug, E> fmt::Debug for ShardedHashSet<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for shard in self.map.shards.iter() {
            let guard = read(shard);
            let mut cursor = guard.chain_first();
            while let Some(slot) = cursor {
                set.entry(guard.key_ref(slot));
                cursor = guard.chain_next(slot);
            }
        }
        set.finish()
    }
}

impl<K, E: Equivalence<K>> Extend<K> for ShardedHashSet<K, E> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> FromIterator<K> for ShardedHashSet<K>
where
    Natural: Equivalence<K>,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = ShardedHashSet::new();
        set.extend(iter);
        set
    }
}

/// An iterator over a sharded set's elements.
pub struct SetIter<'a, K, E = Natural> {
    inner: Iter<'a, K, (), E>,
}

impl<K: Clone, E> Iterator for SetIter<'_, K, E> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }
}
