//! Separate-chaining hash table engine
//!
//! # Hashing
//!
//! Keys implement [`TableKey`], which yields a non-negative hash magnitude; the
//! bucket is `magnitude % capacity`.
//! - strings: polynomial hash over UTF-16 code units, `h = h * 31 + unit`
//!   (written `(h << 5) - h + unit`) with 32-bit wraparound, then `|h|`
//! - integers: `|key|`
//! - anything else: the hash of its string form
//!
//! # Chains and growth
//!
//! A new key is prepended to its bucket, so chains read most-recent-first.
//! Setting an existing key overwrites it in place. When an insert pushes the
//! load factor (`size / capacity`) above 0.75 the bucket array doubles and every
//! entry is rehashed, bucket by bucket, front to back.

use super::{ElementRole, Structure, StructureKind, VisualElement};
use crate::config::{DEFAULT_HASH_CAPACITY, MAX_LOAD_FACTOR};
use crate::error::SnapshotError;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// Hashing contract for table keys
pub trait TableKey: Clone + PartialEq + Display {
    /// Non-negative hash magnitude, reduced modulo the capacity by the table
    fn key_hash(&self) -> u64;
}

/// 32-bit polynomial string hash over UTF-16 code units
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |h, unit| {
        (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

impl TableKey for String {
    fn key_hash(&self) -> u64 {
        u64::from(string_hash(self).unsigned_abs())
    }
}

macro_rules! signed_key {
    ($($t:ty),*) => {$(
        impl TableKey for $t {
            fn key_hash(&self) -> u64 {
                self.unsigned_abs() as u64
            }
        }
    )*};
}

macro_rules! unsigned_key {
    ($($t:ty),*) => {$(
        impl TableKey for $t {
            fn key_hash(&self) -> u64 {
                *self as u64
            }
        }
    )*};
}

macro_rules! string_form_key {
    ($($t:ty),*) => {$(
        impl TableKey for $t {
            fn key_hash(&self) -> u64 {
                u64::from(string_hash(&self.to_string()).unsigned_abs())
            }
        }
    )*};
}

signed_key!(i8, i16, i32, i64, isize);
unsigned_key!(u8, u16, u32, u64, usize);
string_form_key!(bool, char);

/// One `{key, value}` pair of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashEntry<K, V> {
    pub key: K,
    pub value: V,
}

/// Canonical hash table state: `{capacity, size, entries}` in bucket order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashSnapshot<K, V> {
    pub capacity: usize,
    pub size: usize,
    pub entries: Vec<HashEntry<K, V>>,
}

/// Hash table with per-bucket chains
#[derive(Debug, Clone)]
pub struct ChainedHashTable<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    size: usize,
}

impl<K: TableKey, V> Default for ChainedHashTable<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_CAPACITY)
    }
}

impl<K: TableKey, V> ChainedHashTable<K, V> {
    /// Table with `capacity` buckets (at least one)
    pub fn new(capacity: usize) -> Self {
        ChainedHashTable {
            buckets: Self::empty_buckets(capacity.max(1)),
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Bucket index of `key` at the current capacity
    pub fn bucket_of(&self, key: &K) -> usize {
        (key.key_hash() % self.capacity() as u64) as usize
    }

    /// Insert or overwrite; returns the previous value for an existing key
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_of(&key);
        if let Some(slot) = self.buckets[index].iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }

        self.buckets[index].insert(0, (key, value));
        self.size += 1;

        if self.load_factor() > MAX_LOAD_FACTOR {
            self.resize();
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove `key`; returns false when it was absent
    pub fn delete(&mut self, key: &K) -> bool {
        let index = self.bucket_of(key);
        let chain = &mut self.buckets[index];
        match chain.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                chain.remove(pos);
                self.size -= 1;
                true
            }
            None => false,
        }
    }

    pub fn has(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// All entries, bucket by bucket, each chain front to back
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|(k, v)| (k, v)))
    }

    pub fn keys(&self) -> Vec<&K> {
        self.entries().map(|(k, _)| k).collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.entries().map(|(_, v)| v).collect()
    }

    /// Chain of one bucket, most recent first; empty for an invalid index
    pub fn bucket_entries(&self, bucket: usize) -> &[(K, V)] {
        self.buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> &[Vec<(K, V)>] {
        &self.buckets
    }

    pub fn clear(&mut self) {
        let capacity = self.capacity();
        self.buckets = Self::empty_buckets(capacity);
        self.size = 0;
    }

    fn resize(&mut self) {
        let old_capacity = self.capacity();
        let old = std::mem::replace(&mut self.buckets, Self::empty_buckets(old_capacity * 2));
        debug!(
            "hash table load factor {:.2} exceeded {}, growing {} -> {} buckets",
            self.size as f64 / old_capacity as f64,
            MAX_LOAD_FACTOR,
            old_capacity,
            old_capacity * 2
        );
        for (key, value) in old.into_iter().flatten() {
            let index = self.bucket_of(&key);
            self.buckets[index].insert(0, (key, value));
        }
    }

    fn empty_buckets(capacity: usize) -> Vec<Vec<(K, V)>> {
        (0..capacity).map(|_| Vec::new()).collect()
    }
}

impl<K, V> Structure for ChainedHashTable<K, V>
where
    K: TableKey + Serialize + DeserializeOwned,
    V: Clone + PartialEq + Display + Serialize + DeserializeOwned,
{
    type Snapshot = HashSnapshot<K, V>;

    fn kind(&self) -> StructureKind {
        StructureKind::HashTable
    }

    fn snapshot(&self) -> Self::Snapshot {
        HashSnapshot {
            capacity: self.capacity(),
            size: self.size,
            entries: self
                .entries()
                .map(|(k, v)| HashEntry {
                    key: k.clone(),
                    value: v.clone(),
                })
                .collect(),
        }
    }

    fn restore(snapshot: Self::Snapshot) -> Result<Self, SnapshotError> {
        if snapshot.capacity == 0 {
            return Err(SnapshotError::ZeroCapacity);
        }
        let mut table = ChainedHashTable::new(snapshot.capacity);
        // Prepending in reverse reproduces each chain's front-to-back order
        for entry in snapshot.entries.into_iter().rev() {
            table.set(entry.key, entry.value);
        }
        Ok(table)
    }

    fn to_visual(&self) -> Vec<VisualElement> {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(bucket, chain)| {
                chain.iter().map(move |(k, v)| {
                    VisualElement::new(
                        hash_element_id(k),
                        format!("{}: {}", k, v),
                        ElementRole::Entry { bucket },
                    )
                })
            })
            .collect()
    }
}

/// Key as it appears in element ids: strings keep their text, anything else
/// is prefixed with its JSON type so `1` and `"1"` stay distinct
pub fn key_label<K: Serialize>(key: &K) -> String {
    match serde_json::to_value(key).unwrap_or(Value::Null) {
        Value::String(s) => s,
        Value::Number(n) => format!("number:{}", n),
        Value::Bool(b) => format!("bool:{}", b),
        Value::Null => "null:null".to_string(),
        other @ Value::Array(_) => format!("array:{}", other),
        other @ Value::Object(_) => format!("object:{}", other),
    }
}

/// Id of the entry holding `key`
pub fn hash_element_id<K: Serialize>(key: &K) -> String {
    format!("hash-{}", key_label(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_label_keeps_json_types_apart() {
        assert_eq!(key_label(&"apple"), "apple");
        assert_eq!(key_label(&42), "number:42");
        assert_eq!(key_label(&"1"), "1");
        assert_ne!(key_label(&1), key_label(&"1"));
        assert_eq!(key_label(&true), "bool:true");
        assert_eq!(hash_element_id(&7u32), "hash-number:7");
    }

    #[test]
    fn test_string_hash_matches_reference_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        // Wraps instead of overflowing
        let long = "the quick brown fox jumps over the lazy dog";
        let expected = long
            .bytes()
            .fold(0i64, |h, b| ((h * 31 + i64::from(b)) as i32) as i64);
        assert_eq!(i64::from(string_hash(long)), expected);
    }

    #[test]
    fn test_negative_numbers_use_magnitude() {
        let table: ChainedHashTable<i32, i32> = ChainedHashTable::new(16);
        assert_eq!(table.bucket_of(&-3), 3);
        assert_eq!(table.bucket_of(&35), 3);
    }

    #[test]
    fn test_new_keys_go_to_front_of_chain() {
        let mut table = ChainedHashTable::new(4);
        table.set(1, "a");
        table.set(5, "b");
        assert_eq!(table.bucket_entries(1), &[(5, "b"), (1, "a")]);
        table.set(1, "c");
        assert_eq!(table.bucket_entries(1), &[(5, "b"), (1, "c")]);
    }
}
