//! Top-K selection with a fixed total order: count descending, then key ascending.

use crate::counting::CountAccumulator;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Ordered `(key, count)` pairs, best first, at most K long, keys unique.
pub type TopK<K = String> = Vec<(K, u64)>;

/// Ranking used by every query: higher count first, ties broken by the smaller key.
pub fn rank_order<K: Ord>(a: &(K, u64), b: &(K, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// The `k` best entries of `acc`, sorted by `rank_order`.
///
/// Keeps a heap of at most `k` entries whose root is the weakest kept entry,
/// so selection memory is bounded by `k` rather than by the number of keys.
/// `k == 0` yields an empty result; fewer than `k` keys yields all of them, for any `k`.
pub fn top_k<K: Eq + Hash + Ord + Clone>(acc: &CountAccumulator<K>, k: usize) -> TopK<K> {
    if k == 0 {
        return Vec::new();
    }
    let kept = k.min(acc.len());
    let mut heap: BinaryHeap<Reverse<(u64, Reverse<&K>)>> = BinaryHeap::with_capacity(kept + 1);
    for (key, count) in acc.iter() {
        heap.push(Reverse((count, Reverse(key))));
        if heap.len() > k {
            heap.pop();
        }
    }
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse((count, Reverse(key)))| (key.clone(), count))
        .collect()
}

/// True when `entries` is strictly ordered by `rank_order` (which also implies unique keys
/// among equal counts).
pub fn is_ranked<K: Ord>(entries: &[(K, u64)]) -> bool {
    entries.windows(2).all(|w| rank_order(&w[0], &w[1]) == Ordering::Less)
}
