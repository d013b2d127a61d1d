//! The table kernel shared by every map and set variant.
//!
//! One flat key array plus a parallel value array, linear probing, and
//! tombstone-free deletion: removing an entry compacts the probe chain in
//! place by shifting later entries backward, so lookups never scan dead
//! slots. The kernel is generic over an [`Equivalence`] strategy (hashing and
//! equality) and a [`Linkage`] policy (insertion-order bookkeeping), both
//! resolved at compile time.
//!
//! Slot `capacity` — one past the probed region — is the *reserved slot*: the
//! strategy may designate one key class (for the stock strategy,
//! `K::default()`) that is stored there and never enters the probed region.
//!
//! Layout invariant: `values[i]` is initialized exactly when
//! `keys[i].is_some()`.

mod order;
mod probe;

pub(crate) use order::{Chain, Linkage, Unlinked};
pub(crate) use probe::{array_size, max_fill, mix};

use crate::equivalence::Equivalence;

use std::mem::{self, MaybeUninit};

pub(crate) struct RawTable<K, V, E, L> {
    keys: Box<[Option<K>]>,
    values: Box<[MaybeUninit<V>]>,
    links: L,
    strategy: E,
    len: usize,
    capacity: usize,
    mask: usize,
    max_fill: usize,
    min_capacity: usize,
    load_factor: f64,
}

fn alloc_keys<K>(slots: usize) -> Box<[Option<K>]> {
    let mut keys = Vec::with_capacity(slots);
    keys.resize_with(slots, || None);
    keys.into_boxed_slice()
}

fn alloc_values<V>(slots: usize) -> Box<[MaybeUninit<V>]> {
    let mut values = Vec::with_capacity(slots);
    values.resize_with(slots, MaybeUninit::uninit);
    values.into_boxed_slice()
}

fn try_alloc_keys<K>(slots: usize) -> Option<Box<[Option<K>]>> {
    let mut keys = Vec::new();
    keys.try_reserve_exact(slots).ok()?;
    keys.resize_with(slots, || None);
    Some(keys.into_boxed_slice())
}

fn try_alloc_values<V>(slots: usize) -> Option<Box<[MaybeUninit<V>]>> {
    let mut values = Vec::new();
    values.try_reserve_exact(slots).ok()?;
    values.resize_with(slots, MaybeUninit::uninit);
    Some(values.into_boxed_slice())
}

impl<K, V, E, L: Linkage> RawTable<K, V, E, L> {
    /// Creates a table sized for `expected` entries. The caller has already
    /// validated the load factor.
    pub(crate) fn with_capacity(expected: usize, load_factor: f64, strategy: E) -> Self {
        debug_assert!(load_factor > 0.0 && load_factor < 1.0);
        let capacity = array_size(expected, load_factor);
        RawTable {
            keys: alloc_keys(capacity + 1),
            values: alloc_values(capacity + 1),
            links: L::new(capacity + 1),
            strategy,
            len: 0,
            capacity,
            mask: capacity - 1,
            max_fill: max_fill(capacity, load_factor),
            min_capacity: capacity,
            load_factor,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries held before the next growth rehash.
    #[inline]
    pub(crate) fn max_entries(&self) -> usize {
        self.max_fill
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn load_factor(&self) -> f64 {
        self.load_factor
    }

    #[inline]
    pub(crate) fn key_ref(&self, slot: usize) -> &K {
        self.keys[slot].as_ref().expect("slot is empty")
    }

    #[inline]
    pub(crate) fn value_ref(&self, slot: usize) -> &V {
        debug_assert!(self.keys[slot].is_some());
        unsafe { self.values[slot].assume_init_ref() }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, slot: usize) -> &mut V {
        debug_assert!(self.keys[slot].is_some());
        unsafe { self.values[slot].assume_init_mut() }
    }

    #[inline]
    pub(crate) fn pair(&self, slot: usize) -> (&K, &V) {
        let key = self.keys[slot].as_ref().expect("slot is empty");
        (key, unsafe { self.values[slot].assume_init_ref() })
    }

    #[inline]
    pub(crate) fn pair_mut(&mut self, slot: usize) -> (&K, &mut V) {
        let key = self.keys[slot].as_ref().expect("slot is empty");
        (key, unsafe { self.values[slot].assume_init_mut() })
    }

    #[inline]
    pub(crate) fn replace_value(&mut self, slot: usize, value: V) -> V {
        mem::replace(self.value_mut(slot), value)
    }

    #[inline]
    pub(crate) fn chain_first(&self) -> Option<usize> {
        self.links.first()
    }

    #[inline]
    pub(crate) fn chain_last(&self) -> Option<usize> {
        self.links.last()
    }

    #[inline]
    pub(crate) fn chain_next(&self, slot: usize) -> Option<usize> {
        self.links.next(slot)
    }

    #[inline]
    pub(crate) fn chain_prev(&self, slot: usize) -> Option<usize> {
        self.links.prev(slot)
    }

    #[inline]
    pub(crate) fn linkage(&self) -> &L {
        &self.links
    }

    #[inline]
    pub(crate) fn relink_to_front(&mut self, slot: usize) {
        self.links.move_to_front(slot);
    }

    #[inline]
    pub(crate) fn relink_to_back(&mut self, slot: usize) {
        self.links.move_to_back(slot);
    }

    pub(crate) fn cursor(&self) -> SlotCursor {
        SlotCursor {
            pos: self.capacity,
            sentinel: true,
            remaining: self.len,
        }
    }
}

impl<K, V, E: Equivalence<K>, L: Linkage> RawTable<K, V, E, L> {
    /// One probe pass serving both lookup and insertion-point discovery:
    /// `Ok(slot)` if the key is present, `Err(slot)` with the slot an
    /// insertion would use otherwise.
    pub(crate) fn find(&self, key: &K) -> Result<usize, usize> {
        self.find_hashed(key, self.strategy.hash(key))
    }

    /// `find` with the strategy hash already computed (the sharded tables
    /// hash once for routing and reuse it here).
    pub(crate) fn find_hashed(&self, key: &K, hash: u64) -> Result<usize, usize> {
        if self.strategy.is_reserved(key) {
            return if self.keys[self.capacity].is_some() {
                Ok(self.capacity)
            } else {
                Err(self.capacity)
            };
        }
        let mut pos = mix(hash) as usize & self.mask;
        loop {
            match &self.keys[pos] {
                None => return Err(pos),
                Some(occupant) => {
                    if self.strategy.equivalent(occupant, key) {
                        return Ok(pos);
                    }
                }
            }
            pos = (pos + 1) & self.mask;
        }
    }

    /// Fills `slot` (from a failed `find`), growing first if this insertion
    /// would push occupancy past the fill bound. Returns the slot actually
    /// written, which differs from `slot` after a growth rehash.
    pub(crate) fn insert_rehashed(&mut self, mut slot: usize, key: K, value: V) -> usize {
        if self.len + 1 > self.max_fill {
            self.rehash(array_size(self.len + 2, self.load_factor));
            slot = match self.find(&key) {
                Err(free) => free,
                Ok(_) => unreachable!("key appeared during rehash"),
            };
        }
        debug_assert!(self.keys[slot].is_none());
        self.keys[slot] = Some(key);
        self.values[slot] = MaybeUninit::new(value);
        self.links.added(slot);
        self.len += 1;
        slot
    }

    /// Removes the entry in `slot` and compacts the probe chain. Does not
    /// shrink; callers decide (traversals must not relocate the table
    /// mid-scan).
    pub(crate) fn take_entry_at(&mut self, slot: usize) -> (K, V) {
        self.take_entry_with(slot, |_| {})
    }

    /// `take_entry_at`, reporting each entry whose compaction move wraps past
    /// the end of the array. Scanning traversals buffer those keys and
    /// re-resolve them once the scan completes.
    pub(crate) fn take_entry_with(
        &mut self,
        slot: usize,
        on_displaced: impl FnMut(&K),
    ) -> (K, V) {
        let key = self.keys[slot].take().expect("slot is empty");
        let value = unsafe { self.values[slot].assume_init_read() };
        self.links.removed(slot);
        self.len -= 1;
        if slot != self.capacity {
            self.shift_keys(slot, on_displaced);
        }
        (key, value)
    }

    #[inline]
    pub(crate) fn take_at(&mut self, slot: usize) -> V {
        self.take_entry_at(slot).1
    }

    /// Backward-shift compaction: starting from the vacated `pos`, walk the
    /// probe chain and move each entry back into the vacancy unless its ideal
    /// slot lies inside the vacated circular interval (moving it would break
    /// its own probe sequence). Terminates at the first empty slot.
    fn shift_keys(&mut self, mut pos: usize, mut on_displaced: impl FnMut(&K)) {
        let mask = self.mask;
        loop {
            let last = pos;
            pos = (pos + 1) & mask;
            loop {
                let Some(curr) = &self.keys[pos] else {
                    return;
                };
                let slot = mix(self.strategy.hash(curr)) as usize & mask;
                let movable = if last <= pos {
                    last >= slot || slot > pos
                } else {
                    last >= slot && slot > pos
                };
                if movable {
                    break;
                }
                pos = (pos + 1) & mask;
            }
            if pos < last {
                // The move crosses the array boundary.
                on_displaced(self.keys[pos].as_ref().expect("checked above"));
            }
            self.keys[last] = self.keys[pos].take();
            let value = unsafe { self.values[pos].assume_init_read() };
            self.values[last] = MaybeUninit::new(value);
            self.links.moved(pos, last);
        }
    }

    /// Shrinks to half capacity once occupancy drops far below the fill
    /// bound. The quarter threshold keeps growth and shrinkage from
    /// oscillating around a single boundary.
    pub(crate) fn shrink_if_sparse(&mut self) {
        if self.capacity > self.min_capacity && self.len < self.max_fill / 4 {
            self.rehash(self.capacity / 2);
        }
    }

    fn rehash(&mut self, new_capacity: usize) {
        let keys = alloc_keys(new_capacity + 1);
        let values = alloc_values(new_capacity + 1);
        let links = L::new(new_capacity + 1);
        self.rehash_into(new_capacity, keys, values, links);
    }

    fn try_rehash(&mut self, new_capacity: usize) -> bool {
        let Some(keys) = try_alloc_keys(new_capacity + 1) else {
            return false;
        };
        let Some(values) = try_alloc_values(new_capacity + 1) else {
            return false;
        };
        let Some(links) = L::try_new(new_capacity + 1) else {
            return false;
        };
        self.rehash_into(new_capacity, keys, values, links);
        true
    }

    /// Re-probes every live entry into the new arrays. The linked variants
    /// re-walk the old chain so insertion order survives; the plain variants
    /// scan the array, counting down live entries and reporting a structure
    /// change rather than walking off the start if the count cannot be met.
    fn rehash_into(
        &mut self,
        new_capacity: usize,
        mut new_keys: Box<[Option<K>]>,
        mut new_values: Box<[MaybeUninit<V>]>,
        mut new_links: L,
    ) {
        let new_mask = new_capacity - 1;
        if L::LINKED {
            let mut cursor = self.links.first();
            while let Some(i) = cursor {
                cursor = self.links.next(i);
                let key = self.keys[i].take().expect("order chain visited an empty slot");
                let value = unsafe { self.values[i].assume_init_read() };
                let pos = if i == self.capacity {
                    new_capacity
                } else {
                    let mut pos = mix(self.strategy.hash(&key)) as usize & new_mask;
                    while new_keys[pos].is_some() {
                        pos = (pos + 1) & new_mask;
                    }
                    pos
                };
                new_keys[pos] = Some(key);
                new_values[pos] = MaybeUninit::new(value);
                new_links.added(pos);
            }
        } else {
            let live = self.len - usize::from(self.keys[self.capacity].is_some());
            let mut i = self.capacity;
            for _ in 0..live {
                loop {
                    if i == 0 {
                        panic!("hash table modified during rehash");
                    }
                    i -= 1;
                    if self.keys[i].is_some() {
                        break;
                    }
                }
                let key = self.keys[i].take().expect("checked above");
                let value = unsafe { self.values[i].assume_init_read() };
                let mut pos = mix(self.strategy.hash(&key)) as usize & new_mask;
                while new_keys[pos].is_some() {
                    pos = (pos + 1) & new_mask;
                }
                new_keys[pos] = Some(key);
                new_values[pos] = MaybeUninit::new(value);
            }
            if let Some(key) = self.keys[self.capacity].take() {
                let value = unsafe { self.values[self.capacity].assume_init_read() };
                new_keys[new_capacity] = Some(key);
                new_values[new_capacity] = MaybeUninit::new(value);
            }
        }
        self.keys = new_keys;
        self.values = new_values;
        self.links = new_links;
        self.capacity = new_capacity;
        self.mask = new_mask;
        self.max_fill = max_fill(new_capacity, self.load_factor);
    }

    // High-level operations shared by every surface type.

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.find(key).ok().map(|slot| self.value_ref(slot))
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            Ok(slot) => Some(self.value_mut(slot)),
            Err(_) => None,
        }
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.find(key).is_ok()
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.find(&key) {
            Ok(slot) => Some(self.replace_value(slot, value)),
            Err(slot) => {
                self.insert_rehashed(slot, key, value);
                None
            }
        }
    }

    pub(crate) fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.find(&key) {
            Ok(slot) => Some(self.value_ref(slot)),
            Err(slot) => {
                self.insert_rehashed(slot, key, value);
                None
            }
        }
    }

    pub(crate) fn replace(&mut self, key: &K, value: V) -> Option<V> {
        match self.find(key) {
            Ok(slot) => Some(self.replace_value(slot, value)),
            Err(_) => None,
        }
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        match self.find(key) {
            Ok(slot) => {
                let value = self.take_at(slot);
                self.shrink_if_sparse();
                Some(value)
            }
            Err(_) => None,
        }
    }

    pub(crate) fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        match self.find(&key) {
            Ok(slot) => {
                let new = {
                    let (k, v) = self.pair(slot);
                    f(k, Some(v))
                };
                match new {
                    Some(value) => {
                        self.replace_value(slot, value);
                        Some(self.value_ref(slot))
                    }
                    None => {
                        self.take_at(slot);
                        self.shrink_if_sparse();
                        None
                    }
                }
            }
            Err(slot) => match f(&key, None) {
                Some(value) => {
                    let slot = self.insert_rehashed(slot, key, value);
                    Some(self.value_ref(slot))
                }
                None => None,
            },
        }
    }

    pub(crate) fn compute_if_absent<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        match self.find(&key) {
            Ok(slot) => self.value_mut(slot),
            Err(slot) => {
                let value = f(&key);
                let slot = self.insert_rehashed(slot, key, value);
                self.value_mut(slot)
            }
        }
    }

    pub(crate) fn compute_if_present<F>(&mut self, key: &K, f: F) -> Option<&V>
    where
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let slot = self.find(key).ok()?;
        let new = {
            let (k, v) = self.pair(slot);
            f(k, v)
        };
        match new {
            Some(value) => {
                self.replace_value(slot, value);
                Some(self.value_ref(slot))
            }
            None => {
                self.take_at(slot);
                self.shrink_if_sparse();
                None
            }
        }
    }

    pub(crate) fn merge<F>(&mut self, key: K, value: V, f: F) -> Option<&V>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        match self.find(&key) {
            Ok(slot) => match f(self.value_ref(slot), value) {
                Some(merged) => {
                    self.replace_value(slot, merged);
                    Some(self.value_ref(slot))
                }
                None => {
                    self.take_at(slot);
                    self.shrink_if_sparse();
                    None
                }
            },
            Err(slot) => {
                let slot = self.insert_rehashed(slot, key, value);
                Some(self.value_ref(slot))
            }
        }
    }

    /// `merge`, treating `default` as absence: a merged result equal to it
    /// deletes the entry instead of storing it.
    pub(crate) fn merge_or_remove<F>(
        &mut self,
        key: K,
        value: V,
        default: &V,
        f: F,
    ) -> Option<&V>
    where
        V: PartialEq,
        F: FnOnce(&V, V) -> V,
    {
        match self.find(&key) {
            Ok(slot) => {
                let merged = f(self.value_ref(slot), value);
                if merged == *default {
                    self.take_at(slot);
                    self.shrink_if_sparse();
                    None
                } else {
                    self.replace_value(slot, merged);
                    Some(self.value_ref(slot))
                }
            }
            Err(slot) => {
                if value == *default {
                    None
                } else {
                    let slot = self.insert_rehashed(slot, key, value);
                    Some(self.value_ref(slot))
                }
            }
        }
    }

    /// Read-modify-write over the current value (or `default` when absent),
    /// treating `default` as absence for the result.
    pub(crate) fn compute_or_remove<F>(&mut self, key: K, default: V, f: F) -> Option<&V>
    where
        V: PartialEq,
        F: FnOnce(&K, &V) -> V,
    {
        match self.find(&key) {
            Ok(slot) => {
                let new = {
                    let (k, v) = self.pair(slot);
                    f(k, v)
                };
                if new == default {
                    self.take_at(slot);
                    self.shrink_if_sparse();
                    None
                } else {
                    self.replace_value(slot, new);
                    Some(self.value_ref(slot))
                }
            }
            Err(slot) => {
                let new = f(&key, &default);
                if new == default {
                    None
                } else {
                    let slot = self.insert_rehashed(slot, key, new);
                    Some(self.value_ref(slot))
                }
            }
        }
    }

    pub(crate) fn add_to(&mut self, key: K, increment: V, default: V) -> V
    where
        V: std::ops::AddAssign + Clone,
    {
        match self.find(&key) {
            Ok(slot) => {
                let old = self.value_ref(slot).clone();
                *self.value_mut(slot) += increment;
                old
            }
            Err(slot) => {
                let mut value = default.clone();
                value += increment;
                self.insert_rehashed(slot, key, value);
                default
            }
        }
    }

    pub(crate) fn sub_from(&mut self, key: K, decrement: V, default: V) -> V
    where
        V: std::ops::SubAssign + Clone + PartialEq,
    {
        match self.find(&key) {
            Ok(slot) => {
                let old = self.value_ref(slot).clone();
                *self.value_mut(slot) -= decrement;
                if *self.value_ref(slot) == default {
                    self.take_at(slot);
                    self.shrink_if_sparse();
                }
                old
            }
            Err(slot) => {
                let mut value = default.clone();
                value -= decrement;
                if value != default {
                    self.insert_rehashed(slot, key, value);
                }
                default
            }
        }
    }

    /// Keeps only the entries `f` approves, visiting the reserved slot and
    /// then the array in descending order. Entries relocated across the scan
    /// frontier by compaction are buffered by key and re-resolved through
    /// `find` once the scan completes, so every live entry is tested exactly
    /// once. Never shrinks; follow with [`RawTable::trim`] if desired.
    pub(crate) fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool)
    where
        K: Clone,
    {
        if self.keys[self.capacity].is_some() {
            let keep = {
                let (k, v) = self.pair_mut(self.capacity);
                f(k, v)
            };
            if !keep {
                self.take_entry_at(self.capacity);
            }
        }

        let mut displaced: Vec<K> = Vec::new();
        let mut pos = self.capacity;
        while pos > 0 {
            pos -= 1;
            if self.keys[pos].is_none() {
                continue;
            }
            let keep = {
                let (k, v) = self.pair_mut(pos);
                f(k, v)
            };
            if !keep {
                self.take_entry_with(pos, |key| displaced.push(key.clone()));
            }
        }

        // Buffered keys moved into the already-scanned region; their slots
        // are unknown, so resolve by key. Removals here go through the plain
        // path: there is no frontier left to track.
        while let Some(key) = displaced.pop() {
            let slot = match self.find(&key) {
                Ok(slot) => slot,
                Err(_) => panic!("entry vanished during compaction"),
            };
            let keep = {
                let (k, v) = self.pair_mut(slot);
                f(k, v)
            };
            if !keep {
                self.take_entry_at(slot);
            }
        }
    }

    /// Rehashes into the smallest capacity holding `target` entries, if that
    /// reduces the table. Returns `false` only when the new arrays cannot be
    /// allocated; an unsatisfiable request is a successful no-op.
    pub(crate) fn trim(&mut self, target: usize) -> bool {
        let new_capacity = array_size(target, self.load_factor);
        if new_capacity >= self.capacity || self.len > max_fill(new_capacity, self.load_factor) {
            return true;
        }
        self.try_rehash(new_capacity)
    }

    pub(crate) fn clear_and_trim(&mut self, target: usize) -> bool {
        self.clear();
        self.trim(target)
    }
}

impl<K, V, E, L: Linkage> RawTable<K, V, E, L> {
    pub(crate) fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        for i in 0..=self.capacity {
            if self.keys[i].take().is_some() {
                unsafe { self.values[i].assume_init_drop() };
            }
        }
        self.len = 0;
        self.links.cleared();
    }

    /// Removes an entry without compaction or linkage upkeep. Only for
    /// consuming iteration, where the whole table is being drained.
    pub(crate) fn drain_slot(&mut self, slot: usize) -> (K, V) {
        let key = self.keys[slot].take().expect("slot is empty");
        let value = unsafe { self.values[slot].assume_init_read() };
        (key, value)
    }

    /// Splits the table into the parts a mutable traversal needs: shared keys
    /// and links, and a raw pointer into the value array for disjoint
    /// per-slot mutable borrows.
    pub(crate) fn traversal_parts_mut(
        &mut self,
    ) -> (&[Option<K>], *mut MaybeUninit<V>, &L, usize) {
        let RawTable {
            ref keys,
            ref mut values,
            ref links,
            len,
            ..
        } = *self;
        (keys, values.as_mut_ptr(), links, len)
    }
}

impl<K, V, E, L> Drop for RawTable<K, V, E, L> {
    fn drop(&mut self) {
        if mem::needs_drop::<V>() {
            for i in 0..=self.capacity {
                if self.keys[i].is_some() {
                    unsafe { self.values[i].assume_init_drop() };
                }
            }
        }
    }
}

impl<K: Clone, V: Clone, E: Clone, L: Linkage + Clone> Clone for RawTable<K, V, E, L> {
    fn clone(&self) -> Self {
        let mut values = alloc_values(self.capacity + 1);
        for i in 0..=self.capacity {
            if self.keys[i].is_some() {
                values[i] = MaybeUninit::new(unsafe { self.values[i].assume_init_ref() }.clone());
            }
        }
        RawTable {
            keys: self.keys.clone(),
            values,
            links: self.links.clone(),
            strategy: self.strategy.clone(),
            len: self.len,
            capacity: self.capacity,
            mask: self.mask,
            max_fill: self.max_fill,
            min_capacity: self.min_capacity,
            load_factor: self.load_factor,
        }
    }
}

/// Cursor over occupied slots in the unordered traversal order: the reserved
/// slot first, then the array in descending order.
#[derive(Clone)]
pub(crate) struct SlotCursor {
    pos: usize,
    sentinel: bool,
    remaining: usize,
}

impl SlotCursor {
    pub(crate) fn next_in<K>(&mut self, keys: &[Option<K>]) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let capacity = keys.len() - 1;
        if self.sentinel {
            self.sentinel = false;
            if keys[capacity].is_some() {
                self.remaining -= 1;
                return Some(capacity);
            }
        }
        while self.pos > 0 {
            self.pos -= 1;
            if keys[self.pos].is_some() {
                self.remaining -= 1;
                return Some(self.pos);
            }
        }
        None
    }

    pub(crate) fn next<K, V, E, L: Linkage>(
        &mut self,
        table: &RawTable<K, V, E, L>,
    ) -> Option<usize> {
        self.next_in(&table.keys)
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }
}

/// Cursor over a chain, from both ends.
#[derive(Clone)]
pub(crate) struct ChainCursor {
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl ChainCursor {
    pub(crate) fn new<K, V, E>(table: &RawTable<K, V, E, Chain>) -> Self {
        ChainCursor {
            front: table.chain_first(),
            back: table.chain_last(),
            remaining: table.len(),
        }
    }

    pub(crate) fn next_in(&mut self, links: &Chain) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front?;
        self.remaining -= 1;
        self.front = links.next(slot);
        Some(slot)
    }

    pub(crate) fn next_back_in(&mut self, links: &Chain) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back?;
        self.remaining -= 1;
        self.back = links.prev(slot);
        Some(slot)
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }
}
