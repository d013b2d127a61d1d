//! Pluggable key-identity strategies.

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// The hashing and equality capability a table consults instead of the key
/// type's defaults.
///
/// Substituting a strategy changes which keys collide and merge without
/// touching any table mechanics: two keys the strategy deems `equivalent`
/// occupy one entry, whatever their `Eq` implementations say.
///
/// # Contract
///
/// - `equivalent` must be an equivalence relation, and `hash` must be
///   consistent with it: equivalent keys hash identically.
/// - `is_reserved` must agree with `equivalent`: if `is_reserved(a)` and
///   `equivalent(a, b)`, then `is_reserved(b)`. Reserved keys are stored in a
///   dedicated table slot outside the probed region.
///
/// Violating either rule cannot cause memory unsafety, but lookups may miss
/// live entries.
///
/// # Examples
///
/// ```
/// use loquat::{Equivalence, HashMap};
/// use std::collections::hash_map::RandomState;
/// use std::hash::BuildHasher;
///
/// #[derive(Clone, Default)]
/// struct CaseInsensitive(RandomState);
///
/// impl Equivalence<String> for CaseInsensitive {
///     fn hash(&self, key: &String) -> u64 {
///         self.0.hash_one(key.to_ascii_lowercase())
///     }
///
///     fn equivalent(&self, a: &String, b: &String) -> bool {
///         a.eq_ignore_ascii_case(b)
///     }
/// }
///
/// let mut map = HashMap::builder().strategy(CaseInsensitive::default()).build();
/// map.insert("Apple".to_string(), 1);
/// map.insert("APPLE".to_string(), 2);
/// assert_eq!(map.len(), 1);
/// ```
pub trait Equivalence<K> {
    /// Hashes a key. Equivalent keys must produce the same hash.
    fn hash(&self, key: &K) -> u64;

    /// Whether two keys denote the same entry.
    fn equivalent(&self, a: &K, b: &K) -> bool;

    /// Whether this key is stored in the table's reserved slot. The default
    /// reserves nothing.
    fn is_reserved(&self, _key: &K) -> bool {
        false
    }
}

/// The stock strategy: the key's own `Hash` and `Eq`, hashed through a
/// [`BuildHasher`] (`RandomState` by default, so tables are DoS-resistant
/// unless a hasher is chosen explicitly).
///
/// `K::default()` is the reserved key — the designated value held in the
/// table's reserved slot rather than the probed region.
#[derive(Clone, Default)]
pub struct Natural<S = RandomState> {
    build_hasher: S,
}

impl<S> Natural<S> {
    /// Wraps a hasher into the stock strategy.
    pub fn with_hasher(build_hasher: S) -> Natural<S> {
        Natural { build_hasher }
    }
}

impl<K, S> Equivalence<K> for Natural<S>
where
    K: Hash + Eq + Default,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.build_hasher.hash_one(key)
    }

    #[inline]
    fn equivalent(&self, a: &K, b: &K) -> bool {
        a == b
    }

    #[inline]
    fn is_reserved(&self, key: &K) -> bool {
        *key == K::default()
    }
}

impl<S> fmt::Debug for Natural<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Natural").finish_non_exhaustive()
    }
}
