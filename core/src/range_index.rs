//! Previous-snapshot range index.
//!
//! One `RangeEntry` per previous cohort row, bucketed by cohort key.
//! Order inside a bucket carries no meaning: lookups scan the whole bucket.
//! The index is read-only once built.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    cohort::CohortRow,
    types::{Holder, Seq, Volume},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEntry {
    pub start: Seq,
    pub end: Seq,
    pub holder: Holder,
}

#[derive(Debug, Clone, Default)]
pub struct RangeIndex {
    buckets: HashMap<String, Vec<RangeEntry>>,
    entries: usize,
}

impl RangeIndex {
    pub fn build(rows: &[CohortRow]) -> Self {
        let mut index = Self::default();
        for row in rows {
            index.insert(
                row.key.clone(),
                RangeEntry {
                    start: row.start_seq,
                    end: row.end_seq,
                    holder: row.holder.clone(),
                },
            );
        }
        log::debug!(
            "range index built: {} entries across {} keys",
            index.entries,
            index.buckets.len()
        );
        index
    }

    pub fn insert(&mut self, key: String, entry: RangeEntry) {
        self.buckets.entry(key).or_default().push(entry);
        self.entries += 1;
    }

    /// Entries under `key`; empty when the key was never seen.
    pub fn candidates(&self, key: &str) -> &[RangeEntry] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries
    }
}

/// Closed-interval intersection test. Symmetric in its two ranges.
pub fn ranges_overlap(a_start: Seq, a_end: Seq, b_start: Seq, b_end: Seq) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Size of the intersection of two closed ranges. Only meaningful when
/// `ranges_overlap` holds, in which case it is at least 1.
pub fn overlap_volume(a_start: Seq, a_end: Seq, b_start: Seq, b_end: Seq) -> Volume {
    let lo = a_start.max(b_start);
    let hi = a_end.min(b_end);
    hi as Volume - lo as Volume + 1
}
