//! Occurrence counting per distinct key, with a merge helper for partial accumulators.

use crate::topk::{top_k, TopK};
use ahash::AHashMap;
use std::hash::Hash;

/// Key -> number of contributions seen for it. Unseen keys count zero.
#[derive(Clone, Debug)]
pub struct CountAccumulator<K = String> {
    counts: AHashMap<K, u64>,
    total: u64,
}

impl<K: Eq + Hash> Default for CountAccumulator<K> {
    fn default() -> Self {
        Self { counts: AHashMap::new(), total: 0 }
    }
}

impl<K: Eq + Hash> CountAccumulator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every key of an already-flattened key sequence.
    /// Works the same on a materialized `Vec` or on a lazily produced iterator.
    pub fn count<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut acc = Self::new();
        acc.extend(keys);
        acc
    }

    #[inline]
    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn get(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of contributions.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    pub fn merge(&mut self, other: Self) {
        for (k, v) in other.counts {
            *self.counts.entry(k).or_insert(0) += v;
        }
        self.total += other.total;
    }

    pub fn merged(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

impl<K: Eq + Hash + Ord + Clone> CountAccumulator<K> {
    pub fn top_k(&self, k: usize) -> TopK<K> {
        top_k(self, k)
    }
}

impl<K: Eq + Hash> Extend<K> for CountAccumulator<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for k in keys {
            self.add(k);
        }
    }
}

impl<K: Eq + Hash> FromIterator<K> for CountAccumulator<K> {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Self::count(keys)
    }
}
