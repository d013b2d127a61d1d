//! An unordered hash set, backed by the map kernel with `()` values.

use crate::equivalence::{Equivalence, Natural};
use crate::map::{self, HashMap, HashMapBuilder};

use std::fmt;
use std::iter::FusedIterator;

/// A hash set using open addressing with linear probing and tombstone-free
/// deletion.
///
/// The set is a thin wrapper over [`HashMap`] with `()` values, so it shares
/// all of the map's behavior: probe-chain compaction on removal, growth and
/// shrinking by load factor, and pluggable [`Equivalence`] strategies.
///
/// # Examples
///
/// ```
/// use loquat::HashSet;
///
/// let mut set = HashSet::new();
/// assert!(set.insert("apple"));
/// assert!(!set.insert("apple"));
/// assert!(set.contains(&"apple"));
/// assert!(set.remove(&"apple"));
/// assert!(set.is_empty());
/// ```
pub struct HashSet<K, E = Natural> {
    map: HashMap<K, (), E>,
}

/// A builder for a [`HashSet`].
pub struct HashSetBuilder<K, E = Natural> {
    inner: HashMapBuilder<K, (), E>,
}

impl<K> HashSetBuilder<K> {
    /// Sets the hasher used by the stock [`Natural`] strategy.
    pub fn hasher<S>(self, hasher: S) -> HashSetBuilder<K, Natural<S>> {
        HashSetBuilder {
            inner: self.inner.hasher(hasher),
        }
    }
}

impl<K, E> HashSetBuilder<K, E> {
    /// Sets the number of elements the set should hold before growing.
    pub fn capacity(self, capacity: usize) -> Self {
        HashSetBuilder {
            inner: self.inner.capacity(capacity),
        }
    }

    /// Sets the load factor. Must be strictly between 0 and 1; `build`
    /// panics otherwise.
    pub fn load_factor(self, load_factor: f64) -> Self {
        HashSetBuilder {
            inner: self.inner.load_factor(load_factor),
        }
    }

    /// Replaces the equivalence strategy.
    pub fn strategy<E2>(self, strategy: E2) -> HashSetBuilder<K, E2> {
        HashSetBuilder {
            inner: self.inner.strategy(strategy),
        }
    }

    /// Builds the set, panicking on an invalid configuration.
    pub fn build(self) -> HashSet<K, E> {
        HashSet {
            map: self.inner.build(),
        }
    }
}

impl<K> HashSet<K> {
    /// Creates an empty set with the default capacity and load factor.
    pub fn new() -> HashSet<K> {
        HashSet {
            map: HashMap::new(),
        }
    }

    /// Creates an empty set sized to hold at least `capacity` elements
    /// before growing.
    pub fn with_capacity(capacity: usize) -> HashSet<K> {
        HashSet {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Returns a builder for more involved configuration.
    pub fn builder() -> HashSetBuilder<K> {
        HashSetBuilder {
            inner: HashMap::builder(),
        }
    }
}

impl<K> Default for HashSet<K> {
    fn default() -> Self {
        HashSet::new()
    }
}

impl<K, E> HashSet<K, E> {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of elements the set holds before the next growth
    /// rehash.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Removes all elements, keeping the current capacity.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// An iterator over the elements. Order is unspecified; every element is
    /// visited exactly once per pass.
    pub fn iter(&self) -> Iter<'_, K, E> {
        Iter {
            inner: self.map.keys(),
        }
    }
}

impl<K, E: Equivalence<K>> HashSet<K, E> {
    /// Returns `true` if the set contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Adds `key`, returning `true` if it was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.map.insert(key, ()).is_none()
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Keeps only the elements for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K) -> bool)
    where
        K: Clone,
    {
        self.map.retain(|k, _| f(k));
    }

    /// Shrinks the table to the smallest capacity holding `target` elements.
    /// Returns `false` only on allocation failure.
    pub fn trim(&mut self, target: usize) -> bool {
        self.map.trim(target)
    }

    /// Removes all elements, then shrinks as [`HashSet::trim`] does.
    pub fn clear_and_trim(&mut self, target: usize) -> bool {
        self.map.clear_and_trim(target)
    }
}

impl<K: Clone, E: Clone> Clone for HashSet<K, E> {
    fn clone(&self) -> Self {
        HashSet {
            map: self.map.clone(),
        }
    }
}

impl<K: fmt::Debug, E> fmt::Debug for HashSet<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, E: Equivalence<K>> PartialEq for HashSet<K, E> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K, E: Equivalence<K>> Eq for HashSet<K, E> {}

impl<K, E: Equivalence<K>> Extend<K> for HashSet<K, E> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> FromIterator<K> for HashSet<K>
where
    Natural: Equivalence<K>,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = HashSet::new();
        set.extend(iter);
        set
    }
}

impl<'a, K, E> IntoIterator for &'a HashSet<K, E> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, E> IntoIterator for HashSet<K, E> {
    type Item = K;
    type IntoIter = IntoIter<K, E>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

/// An iterator over a set's elements.
pub struct Iter<'a, K, E = Natural> {
    inner: map::Keys<'a, K, (), E>,
}

impl<'a, K, E> Iterator for Iter<'a, K, E> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, E> ExactSizeIterator for Iter<'_, K, E> {}
impl<K, E> FusedIterator for Iter<'_, K, E> {}

/// A consuming iterator over a set's elements.
pub struct IntoIter<K, E = Natural> {
    inner: map::IntoIter<K, (), E>,
}

impl<K, E> Iterator for IntoIter<K, E> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, E> ExactSizeIterator for IntoIter<K, E> {}
impl<K, E> FusedIterator for IntoIter<K, E> {}
