use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use crate::equivalence::{Equivalence, Natural};
use crate::{HashMap, HashSet, LinkedHashMap, LinkedHashSet, ShardedHashMap, ShardedHashSet};

impl<K, V, E> Serialize for HashMap<K, V, E>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<K, V, E> Serialize for LinkedHashMap<K, V, E>
where
    K: Serialize,
    V: Serialize,
{
    /// Serializes in insertion order.
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<K, V, E> Serialize for ShardedHashMap<K, V, E>
where
    K: Serialize,
    V: Serialize,
{
    /// Serializes shard by shard under read locks, without cloning entries.
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        self.for_each_entry(|k, v| map.serialize_entry(k, v))?;
        map.end()
    }
}

impl<K, E> Serialize for HashSet<K, E>
where
    K: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<K, E> Serialize for LinkedHashSet<K, E>
where
    K: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<K, E> Serialize for ShardedHashSet<K, E>
where
    K: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        self.for_each_element(|k| seq.serialize_element(k))?;
        seq.end()
    }
}

struct MapVisitor<M> {
    _marker: PhantomData<M>,
}

impl<'de, K, V> Deserialize<'de> for HashMap<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::<HashMap<K, V>> {
            _marker: PhantomData,
        })
    }
}

impl<'de, K, V> Visitor<'de> for MapVisitor<HashMap<K, V>>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    type Value = HashMap<K, V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = HashMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for LinkedHashMap<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::<LinkedHashMap<K, V>> {
            _marker: PhantomData,
        })
    }
}

impl<'de, K, V> Visitor<'de> for MapVisitor<LinkedHashMap<K, V>>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    type Value = LinkedHashMap<K, V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    /// Entries are inserted in serialized order, which the map preserves.
    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = LinkedHashMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for ShardedHashMap<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::<ShardedHashMap<K, V>> {
            _marker: PhantomData,
        })
    }
}

impl<'de, K, V> Visitor<'de> for MapVisitor<ShardedHashMap<K, V>>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    type Value = ShardedHashMap<K, V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let map = ShardedHashMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

struct SeqVisitor<S> {
    _marker: PhantomData<S>,
}

impl<'de, K> Deserialize<'de> for HashSet<K>
where
    K: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor::<HashSet<K>> {
            _marker: PhantomData,
        })
    }
}

impl<'de, K> Visitor<'de> for SeqVisitor<HashSet<K>>
where
    K: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    type Value = HashSet<K>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = HashSet::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_element()? {
            set.insert(key);
        }
        Ok(set)
    }
}

impl<'de, K> Deserialize<'de> for LinkedHashSet<K>
where
    K: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor::<LinkedHashSet<K>> {
            _marker: PhantomData,
        })
    }
}

impl<'de, K> Visitor<'de> for SeqVisitor<LinkedHashSet<K>>
where
    K: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    type Value = LinkedHashSet<K>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = LinkedHashSet::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_element()? {
            set.insert(key);
        }
        Ok(set)
    }
}

impl<'de, K> Deserialize<'de> for ShardedHashSet<K>
where
    K: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor::<ShardedHashSet<K>> {
            _marker: PhantomData,
        })
    }
}

impl<'de, K> Visitor<'de> for SeqVisitor<ShardedHashSet<K>>
where
    K: Deserialize<'de>,
    Natural: Equivalence<K>,
{
    type Value = ShardedHashSet<K>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let set = ShardedHashSet::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_element()? {
            set.insert(key);
        }
        Ok(set)
    }
}
