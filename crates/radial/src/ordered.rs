//! Insertion-ordered map used wherever the document's key order carries
//! meaning (sector order is angular order, preset order is wheel order).

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Borrow<str>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.borrow() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    /// Replaces the value in place when the key exists, otherwise appends.
    /// Returns the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.position(key.borrow()) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Inserts a new key at `index` (clamped to the end). An existing key is
    /// replaced in place and keeps its position.
    pub fn insert_at(&mut self, index: usize, key: K, value: V) -> Option<V> {
        match self.position(key.borrow()) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                let index = index.min(self.entries.len());
                self.entries.insert(index, (key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Swaps the positions of two keys. Returns false when either is missing.
    pub fn swap_keys(&mut self, a: &str, b: &str) -> bool {
        match (self.position(a), self.position(b)) {
            (Some(i), Some(j)) => {
                self.entries.swap(i, j);
                true
            }
            _ => false,
        }
    }

    /// Renames `old` to `new` keeping the entry's value and position.
    /// Fails when `old` is missing or `new` is taken by another entry.
    pub fn rename(&mut self, old: &str, new: K) -> bool {
        let Some(idx) = self.position(old) else {
            return false;
        };
        if let Some(other) = self.position(new.borrow())
            && other != idx
        {
            return false;
        }
        self.entries[idx].0 = new;
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.get_index(0)
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Borrow<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> Serialize for OrderedMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: Deserialize<'de> + Borrow<str>,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        // duplicate keys: last value wins, first position is kept
        while let Some((k, v)) = access.next_entry::<K, V>()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + Borrow<str>,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderedMap<String, i32> {
        [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_keeps_insertion_order_through_json() {
        let json = r#"{"zeta": 1, "alpha": 2, "mid": 3}"#;
        let map: OrderedMap<String, i32> = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn test_rename_preserves_position_and_value() {
        let mut map = sample();
        assert!(map.rename("b", "beta".to_string()));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "beta", "c"]);
        assert_eq!(map.get("beta"), Some(&2));
    }

    #[test]
    fn test_rename_rejects_taken_label() {
        let mut map = sample();
        assert!(!map.rename("a", "c".to_string()));
        assert!(map.rename("a", "a".to_string()));
        assert!(!map.rename("missing", "x".to_string()));
    }

    #[test]
    fn test_swap_and_remove() {
        let mut map = sample();
        assert!(map.swap_keys("a", "c"));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["c", "b", "a"]);
        assert_eq!(map.remove("b"), Some(2));
        assert!(!map.swap_keys("b", "a"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = sample();
        assert_eq!(map.insert("a".to_string(), 10), Some(1));
        assert_eq!(map.first(), Some((&"a".to_string(), &10)));
        map.insert_at(0, "z".to_string(), 0);
        assert_eq!(map.position("z"), Some(0));
    }
}
