//! Multi-way Merge
//!
//! Each rotation group hands over its activities and events already sorted.
//! Because a group's outputs all share one offset, a group list stays sorted
//! after alignment, so the global order is a k-way merge of the group lists
//! (O(N log G) for N entities across G groups).

use crate::timeline::EntityKey;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Merges individually sorted lists into one list sorted by `key`.
///
/// Equal keys keep list order first, then position, so the result is
/// reproducible for the same inputs.
pub fn merge_sorted<T>(lists: &[&[Arc<T>]], key: impl Fn(&T) -> EntityKey) -> Vec<Arc<T>> {
    let total = lists.iter().map(|l| l.len()).sum();
    let mut merged = Vec::with_capacity(total);

    // One cursor per list; the heap holds each list's current head.
    let mut heap: BinaryHeap<Reverse<(EntityKey, usize, usize)>> =
        BinaryHeap::with_capacity(lists.len());
    for (list, items) in lists.iter().enumerate() {
        if let Some(first) = items.first() {
            heap.push(Reverse((key(first), list, 0)));
        }
    }

    while let Some(Reverse((_, list, pos))) = heap.pop() {
        let items = lists[list];
        merged.push(items[pos].clone());

        if let Some(next) = items.get(pos + 1) {
            heap.push(Reverse((key(next), list, pos + 1)));
        }
    }

    merged
}
