// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use indexmap::IndexMap;
use std::hash::Hash;

/// Values grouped by key. Iteration follows bucket creation order, i.e. the
/// order in which each key was first pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets<K, V>
where
    K: Hash + Eq,
{
    buckets: IndexMap<K, Vec<V>>,
}

impl<K, V> Default for Buckets<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Buckets<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            buckets: IndexMap::new(),
        }
    }

    /// Get the bucket for `key`, appending a new empty one after all
    /// existing buckets on first sight
    pub fn bucket_or_create(&mut self, key: K) -> &mut Vec<V> {
        self.buckets.entry(key).or_default()
    }

    pub fn push(&mut self, key: K, value: V) {
        self.bucket_or_create(key).push(value);
    }

    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of values across all buckets
    pub fn value_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.buckets.iter().map(|(key, values)| (key, values.as_slice()))
    }
}

impl<K, V> IntoIterator for Buckets<K, V>
where
    K: Hash + Eq,
{
    type Item = (K, Vec<V>);
    type IntoIter = indexmap::map::IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Buckets<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut buckets = Buckets::new();
        for (key, value) in iter {
            buckets.push(key, value);
        }
        buckets
    }
}

/// Group mapped pairs by key in the order they are delivered
pub fn shuffle<K, V>(mapped: impl IntoIterator<Item = (K, V)>) -> Buckets<K, V>
where
    K: Hash + Eq,
{
    mapped.into_iter().collect()
}
