//! An unordered hash map with open addressing and backward-shift deletion.

use crate::equivalence::{Equivalence, Natural};
use crate::raw::{RawTable, SlotCursor, Unlinked};

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ops::{AddAssign, SubAssign};

pub(crate) const DEFAULT_CAPACITY: usize = 16;
pub(crate) const DEFAULT_LOAD_FACTOR: f64 = 0.75;

pub(crate) fn check_load_factor(load_factor: f64) {
    assert!(
        load_factor > 0.0 && load_factor < 1.0,
        "load factor must be strictly between 0 and 1, got {load_factor}"
    );
}

/// A hash map using open addressing with linear probing.
///
/// Deletion is tombstone-free: removing an entry compacts its probe chain in
/// place, so lookup cost never degrades from long-gone entries, and the table
/// shrinks once occupancy falls far enough below the load factor.
///
/// The map is generic over an [`Equivalence`] strategy supplying hashing and
/// equality; the default [`Natural`] strategy uses the key's `Hash`/`Eq`
/// through `RandomState` and requires `K: Default` (the default value is the
/// key held in the table's reserved slot).
///
/// # Examples
///
/// ```
/// use loquat::HashMap;
///
/// let mut map = HashMap::new();
/// map.insert("apple", 3);
/// map.insert("pear", 5);
///
/// assert_eq!(map.get(&"apple"), Some(&3));
/// assert_eq!(map.remove(&"pear"), Some(5));
/// assert_eq!(map.len(), 1);
/// ```
pub struct HashMap<K, V, E = Natural> {
    raw: RawTable<K, V, E, Unlinked>,
    default_value: Option<V>,
}

/// A builder for a [`HashMap`].
///
/// # Examples
///
/// ```
/// use loquat::HashMap;
/// use std::collections::hash_map::RandomState;
///
/// let map: HashMap<u32, u32> = HashMap::builder()
///     // Expected number of entries.
///     .capacity(128)
///     // Occupancy fraction that triggers growth.
///     .load_factor(0.9)
///     // Hasher for the stock strategy.
///     .hasher(RandomState::new())
///     // Value reported by the `*_or_default` operations.
///     .default_value(0)
///     .build();
/// ```
pub struct HashMapBuilder<K, V, E = Natural> {
    capacity: usize,
    load_factor: f64,
    strategy: E,
    default_value: Option<V>,
    _marker: PhantomData<K>,
}

impl<K, V> HashMapBuilder<K, V> {
    /// Sets the hasher used by the stock [`Natural`] strategy.
    pub fn hasher<S>(self, hasher: S) -> HashMapBuilder<K, V, Natural<S>> {
        HashMapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            strategy: Natural::with_hasher(hasher),
            default_value: self.default_value,
            _marker: PhantomData,
        }
    }
}

impl<K, V, E> HashMapBuilder<K, V, E> {
    /// Sets the number of entries the map should hold before growing.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the load factor. Must be strictly between 0 and 1; `build`
    /// panics otherwise.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Replaces the equivalence strategy.
    pub fn strategy<E2>(self, strategy: E2) -> HashMapBuilder<K, V, E2> {
        HashMapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            strategy,
            default_value: self.default_value,
            _marker: PhantomData,
        }
    }

    /// Sets the value the `*_or_default` operations report for absent keys.
    /// Unset, it is `V::default()`.
    pub fn default_value(mut self, value: V) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Builds the map, panicking on an invalid configuration.
    pub fn build(self) -> HashMap<K, V, E> {
        check_load_factor(self.load_factor);
        HashMap {
            raw: RawTable::with_capacity(self.capacity, self.load_factor, self.strategy),
            default_value: self.default_value,
        }
    }
}

impl<K, V, E> fmt::Debug for HashMapBuilder<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashMapBuilder")
            .field("capacity", &self.capacity)
            .field("load_factor", &self.load_factor)
            .finish_non_exhaustive()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map with the default capacity and load factor.
    pub fn new() -> HashMap<K, V> {
        HashMap::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map sized to hold at least `capacity` entries before
    /// growing.
    pub fn with_capacity(capacity: usize) -> HashMap<K, V> {
        HashMap::builder().capacity(capacity).build()
    }

    /// Returns a builder for more involved configuration.
    pub fn builder() -> HashMapBuilder<K, V> {
        HashMapBuilder {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            strategy: Natural::default(),
            default_value: None,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        HashMap::new()
    }
}

impl<K, V, E> HashMap<K, V, E> {
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of entries the map holds before the next growth
    /// rehash.
    pub fn capacity(&self) -> usize {
        self.raw.max_entries()
    }

    /// Returns the configured load factor.
    pub fn load_factor(&self) -> f64 {
        self.raw.load_factor()
    }

    /// Returns the configured default value, if one was set.
    pub fn default_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    /// Sets the value the `*_or_default` operations report for absent keys.
    pub fn set_default_value(&mut self, value: V) {
        self.default_value = Some(value);
    }

    /// Removes all entries, keeping the current capacity.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// An iterator over `(&K, &V)` pairs.
    ///
    /// Visiting order is unspecified, but every live entry is visited exactly
    /// once per pass.
    pub fn iter(&self) -> Iter<'_, K, V, E> {
        Iter {
            cursor: self.raw.cursor(),
            table: &self.raw,
        }
    }

    /// An iterator over `(&K, &mut V)` pairs.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let cursor = self.raw.cursor();
        let (keys, values, _, _) = self.raw.traversal_parts_mut();
        IterMut {
            keys,
            values,
            cursor,
            _marker: PhantomData,
        }
    }

    /// An iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V, E> {
        Keys { inner: self.iter() }
    }

    /// An iterator over the values.
    pub fn values(&self) -> Values<'_, K, V, E> {
        Values { inner: self.iter() }
    }

    /// An iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    pub(crate) fn default_return(&self) -> V
    where
        V: Clone + Default,
    {
        self.default_value.clone().unwrap_or_default()
    }
}

impl<K, V, E: Equivalence<K>> HashMap<K, V, E> {
    /// Returns a reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(7, "seven");
    /// assert_eq!(map.get(&7), Some(&"seven"));
    /// assert_eq!(map.get(&8), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    /// Returns the value for `key`, or the configured default value if the
    /// key is absent.
    ///
    /// Note that a present entry whose value *equals* the default is
    /// indistinguishable from an absent key through this call alone; use
    /// [`HashMap::get`] or a non-default default value when that matters.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        match self.raw.get(key) {
            Some(value) => value.clone(),
            None => self.default_return(),
        }
    }

    /// Returns `true` if `key` has an entry.
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.contains(key)
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(1, "a"), None);
    /// assert_eq!(map.insert(1, "b"), Some("a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Inserts only if `key` is absent. Returns the existing value otherwise,
    /// leaving the map unchanged.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        self.raw.insert_if_absent(key, value)
    }

    /// Replaces the value for `key` only if it is already present.
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        self.raw.replace(key, value)
    }

    /// Removes `key`, returning its value.
    ///
    /// Removal compacts the probe chain in place and may shrink the table.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove(key)
    }

    /// Removes `key`, returning its value or the configured default if it
    /// was absent.
    pub fn remove_or_default(&mut self, key: &K) -> V
    where
        V: Clone + Default,
    {
        match self.raw.remove(key) {
            Some(value) => value,
            None => self.default_return(),
        }
    }

    /// Adds `increment` to the value for `key`, inserting
    /// `default + increment` if absent. Returns the previous value (or the
    /// default).
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::HashMap;
    ///
    /// let mut counts: loquat::HashMap<&str, u64> = HashMap::new();
    /// counts.add_to("a", 2);
    /// counts.add_to("a", 3);
    /// assert_eq!(counts.get(&"a"), Some(&5));
    /// ```
    pub fn add_to(&mut self, key: K, increment: V) -> V
    where
        V: AddAssign + Clone + Default,
    {
        let default = self.default_return();
        self.raw.add_to(key, increment, default)
    }

    /// Subtracts `decrement` from the value for `key`, removing the entry if
    /// the result returns to the default value. Returns the previous value
    /// (or the default).
    pub fn sub_from(&mut self, key: K, decrement: V) -> V
    where
        V: SubAssign + Clone + Default + PartialEq,
    {
        let default = self.default_return();
        self.raw.sub_from(key, decrement, default)
    }

    /// Computes a new value for `key` from the current one (or `None` if
    /// absent) in a single probe pass. Returning `None` removes the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, 10);
    /// map.compute(1, |_, v| v.map(|v| v + 1));
    /// map.compute(2, |_, v| { assert!(v.is_none()); Some(5) });
    /// assert_eq!(map.get(&1), Some(&11));
    /// assert_eq!(map.get(&2), Some(&5));
    /// ```
    pub fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        self.raw.compute(key, f)
    }

    /// Returns the value for `key`, inserting `f(&key)` first if absent.
    pub fn compute_if_absent<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        self.raw.compute_if_absent(key, f)
    }

    /// Recomputes the value for `key` only if present; `None` removes the
    /// entry.
    pub fn compute_if_present<F>(&mut self, key: &K, f: F) -> Option<&V>
    where
        F: FnOnce(&K, &V) -> Option<V>,
    {
        self.raw.compute_if_present(key, f)
    }

    /// Inserts `value` for an absent key, or combines it with the present
    /// value via `f`; `None` from `f` removes the entry.
    pub fn merge<F>(&mut self, key: K, value: V, f: F) -> Option<&V>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        self.raw.merge(key, value, f)
    }

    /// Like [`HashMap::merge`], but treats the configured default value as
    /// absence: a combined result equal to it removes the entry.
    pub fn merge_or_remove<F>(&mut self, key: K, value: V, f: F) -> Option<&V>
    where
        V: Clone + Default + PartialEq,
        F: FnOnce(&V, V) -> V,
    {
        let default = self.default_return();
        self.raw.merge_or_remove(key, value, &default, f)
    }

    /// Recomputes the value for `key` from the current value (or the default
    /// when absent), removing the entry when the result equals the default.
    pub fn compute_or_remove<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        V: Clone + Default + PartialEq,
        F: FnOnce(&K, &V) -> V,
    {
        let default = self.default_return();
        self.raw.compute_or_remove(key, default, f)
    }

    /// Keeps only the entries for which `f` returns `true`.
    ///
    /// Every live entry is tested exactly once, even as removals compact the
    /// table under the scan. Capacity is not reduced; call
    /// [`HashMap::trim`] afterwards to release memory.
    pub fn retain(&mut self, f: impl FnMut(&K, &mut V) -> bool)
    where
        K: Clone,
    {
        self.raw.retain(f);
    }

    /// Shrinks the table to the smallest capacity holding `target` entries.
    ///
    /// Returns `false` only if the new arrays could not be allocated; a
    /// request that cannot reduce memory is a successful no-op.
    pub fn trim(&mut self, target: usize) -> bool {
        self.raw.trim(target)
    }

    /// Removes all entries, then shrinks as [`HashMap::trim`] does.
    pub fn clear_and_trim(&mut self, target: usize) -> bool {
        self.raw.clear_and_trim(target)
    }
}

impl<K: Clone, V: Clone, E: Clone> Clone for HashMap<K, V, E> {
    /// Deep-clones the map; the clone shares no state with the source.
    fn clone(&self) -> Self {
        HashMap {
            raw: self.raw.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, E> fmt::Debug for HashMap<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V: PartialEq, E: Equivalence<K>> PartialEq for HashMap<K, V, E> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V: Eq, E: Equivalence<K>> Eq for HashMap<K, V, E> {}

impl<K, V, E: Equivalence<K>> Extend<(K, V)> for HashMap<K, V, E> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    Natural: Equivalence<K>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, E> IntoIterator for &'a HashMap<K, V, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, E> IntoIterator for &'a mut HashMap<K, V, E> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, E> IntoIterator for HashMap<K, V, E> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, E>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            cursor: self.raw.cursor(),
            table: self.raw,
        }
    }
}

/// An iterator over a map's entries.
pub struct Iter<'a, K, V, E = Natural> {
    table: &'a RawTable<K, V, E, Unlinked>,
    cursor: SlotCursor,
}

impl<'a, K, V, E> Iterator for Iter<'a, K, V, E> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor.next(self.table)?;
        Some(self.table.pair(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining(), Some(self.cursor.remaining()))
    }
}

impl<K, V, E> ExactSizeIterator for Iter<'_, K, V, E> {}
impl<K, V, E> FusedIterator for Iter<'_, K, V, E> {}

impl<K, V, E> Clone for Iter<'_, K, V, E> {
    fn clone(&self) -> Self {
        Iter {
            table: self.table,
            cursor: self.cursor.clone(),
        }
    }
}

/// A mutable iterator over a map's entries.
pub struct IterMut<'a, K, V> {
    keys: &'a [Option<K>],
    values: *mut MaybeUninit<V>,
    cursor: SlotCursor,
    _marker: PhantomData<&'a mut V>,
}

// Safety: yields each slot's value reference at most once, and keys are only
// read shared.
unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor.next_in(self.keys)?;
        let keys: &'a [Option<K>] = self.keys;
        let key = keys[slot].as_ref().expect("cursor yielded an empty slot");
        // Safety: the slot is occupied, so the value is initialized, and the
        // cursor never yields a slot twice.
        let value = unsafe { &mut *self.values.add(slot).cast::<V>() };
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining(), Some(self.cursor.remaining()))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// A consuming iterator over a map's entries.
pub struct IntoIter<K, V, E = Natural> {
    table: RawTable<K, V, E, Unlinked>,
    cursor: SlotCursor,
}

impl<K, V, E> Iterator for IntoIter<K, V, E> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor.next(&self.table)?;
        Some(self.table.drain_slot(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining(), Some(self.cursor.remaining()))
    }
}

impl<K, V, E> ExactSizeIterator for IntoIter<K, V, E> {}
impl<K, V, E> FusedIterator for IntoIter<K, V, E> {}

/// An iterator over a map's keys.
pub struct Keys<'a, K, V, E = Natural> {
    inner: Iter<'a, K, V, E>,
}

impl<'a, K, V, E> Iterator for Keys<'a, K, V, E> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, E> ExactSizeIterator for Keys<'_, K, V, E> {}
impl<K, V, E> FusedIterator for Keys<'_, K, V, E> {}

/// An iterator over a map's values.
pub struct Values<'a, K, V, E = Natural> {
    inner: Iter<'a, K, V, E>,
}

impl<'a, K, V, E> Iterator for Values<'a, K, V, E> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, E> ExactSizeIterator for Values<'_, K, V, E> {}
impl<K, V, E> FusedIterator for Values<'_, K, V, E> {}

/// An iterator over mutable references to a map's values.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}
