//! Snapshot deduplication
//!
//! The revision listing arrives newest first, and the same snapshot
//! identifier usually spans many consecutive revisions. Keeping the last
//! record seen per identifier therefore keeps its earliest capture.

use std::collections::HashMap;
use std::hash::Hash;

use crate::SnapshotRecord;

/// Collapse `items` to one entry per key in a single forward pass.
///
/// Output order follows the first occurrence of each key; the value stored
/// at that position is the last item encountered with the key.
pub fn dedup_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut unique: Vec<T> = Vec::new();

    for item in items {
        let k = key(&item);
        if let Some(&index) = positions.get(&k) {
            unique[index] = item;
        } else {
            positions.insert(k, unique.len());
            unique.push(item);
        }
    }

    unique
}

/// One record per distinct `snapshot_id`, each carrying its earliest capture
/// when `records` is ordered newest first.
pub fn dedup_snapshots(records: Vec<SnapshotRecord>) -> Vec<SnapshotRecord> {
    dedup_by_key(records, |record| record.snapshot_id.clone())
}
