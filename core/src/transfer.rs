//! Transfer detection: who sold what to whom between two snapshots.
//!
//! For each latest cohort row, every previous range under the same key is
//! checked. An overlap with a different holder is a transfer of the
//! overlapping certificates from the previous holder to the latest one.
//!
//! A latest row can overlap several previous ranges (a block re-issued to
//! several holders). Each overlapping pair is its own transfer: there is
//! no dedup and no capping against the latest row's size.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    cohort::CohortRow,
    range_index::{overlap_volume, ranges_overlap, RangeIndex},
    types::{Holder, Volume},
};

/// One overlapping pair with differing holders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: Holder,
    pub to: Holder,
    pub volume: Volume,
}

/// Transfers summed per (seller, buyer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSummaryRow {
    pub seller: Holder,
    pub buyer: Holder,
    pub total_mwh: Volume,
}

pub fn detect_transfers(latest: &[CohortRow], index: &RangeIndex) -> Vec<TransferRecord> {
    let mut transfers = Vec::new();

    for row in latest {
        for prev in index.candidates(&row.key) {
            if !ranges_overlap(prev.start, prev.end, row.start_seq, row.end_seq) {
                continue;
            }
            if prev.holder == row.holder {
                continue;
            }

            let volume = overlap_volume(prev.start, prev.end, row.start_seq, row.end_seq);
            debug_assert!(
                volume >= 1,
                "overlapping ranges produced volume {volume} (key {})",
                row.key
            );

            transfers.push(TransferRecord {
                from: prev.holder.clone(),
                to: row.holder.clone(),
                volume,
            });
        }
    }

    log::debug!(
        "transfer detection: {} latest rows, {} transfers",
        latest.len(),
        transfers.len()
    );
    transfers
}

/// Sum volumes per (from, to). Sorted by descending volume, then seller,
/// then buyer.
pub fn summarize_transfers(transfers: &[TransferRecord]) -> Vec<TransferSummaryRow> {
    let mut totals: HashMap<(&str, &str), Volume> = HashMap::new();
    for t in transfers {
        *totals.entry((t.from.as_str(), t.to.as_str())).or_insert(0) += t.volume;
    }

    let mut summary: Vec<TransferSummaryRow> = totals
        .into_iter()
        .map(|((seller, buyer), total_mwh)| TransferSummaryRow {
            seller: seller.to_string(),
            buyer: buyer.to_string(),
            total_mwh,
        })
        .collect();

    summary.sort_by(|a, b| {
        b.total_mwh
            .cmp(&a.total_mwh)
            .then_with(|| a.seller.cmp(&b.seller))
            .then_with(|| a.buyer.cmp(&b.buyer))
    });
    summary
}
