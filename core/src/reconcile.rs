//! The reconciliation run, the engine's only entry point.
//!
//! EXECUTION ORDER (fixed):
//!   1. Schema check on both tables (fatal on a missing column)
//!   2. Cohort build, previous snapshot
//!   3. Cohort build, latest snapshot
//!   4. Range index over previous cohorts
//!   5. Transfer detection, latest cohorts against the index
//!   6. Transfer summary per (seller, buyer)
//!   7. Ownership over active latest rows (independent of 2-6)
//!
//! RULES:
//!   - No file I/O and no formatting. Callers load tables and render output.
//!   - Row-level failures are counted, never raised.
//!   - Each run is independent; nothing is kept between runs.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{
    cohort::{build_cohorts, SkippedRow},
    config::RegistryConfig,
    error::RegoResult,
    ownership::{compute_ownership, OwnershipSummary},
    range_index::RangeIndex,
    table::RegistryTable,
    transfer::{detect_transfers, summarize_transfers, TransferSummaryRow},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub previous_rows: usize,
    pub latest_rows: usize,
    pub previous_cohort_rows: usize,
    pub latest_cohort_rows: usize,
    pub previous_skipped: Vec<SkippedRow>,
    pub latest_skipped: Vec<SkippedRow>,
    /// Active latest rows dropped by ownership for a bad identifier.
    pub ownership_skipped: usize,
    /// Latest rows whose issue date could not be read.
    pub unparseable_dates: usize,
    pub index_keys: usize,
    pub index_entries: usize,
    /// Overlapping pairs found, before summing per (seller, buyer).
    pub transfer_count: usize,
}

impl RunDiagnostics {
    /// Rows dropped for an unparseable identifier, across both snapshots.
    /// Ownership re-decodes a subset of the latest rows, so its skips are
    /// already included here.
    pub fn skipped_count(&self) -> usize {
        self.previous_skipped.len() + self.latest_skipped.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub transfers: Vec<TransferSummaryRow>,
    pub ownership: OwnershipSummary,
    pub diagnostics: RunDiagnostics,
}

pub struct Reconciler {
    config: RegistryConfig,
}

impl Reconciler {
    pub fn new(config: RegistryConfig) -> RegoResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn run(
        &self,
        previous: &RegistryTable,
        latest: &RegistryTable,
    ) -> RegoResult<ReconciliationReport> {
        let started = Instant::now();
        let columns = &self.config.columns;

        previous.require_columns(columns.cohort_columns())?;
        latest.require_schema(columns)?;

        let previous_batch = build_cohorts(previous, columns)?;
        let latest_batch = build_cohorts(latest, columns)?;
        log::info!(
            "Previous: {} rows | Latest: {} rows",
            previous_batch.rows.len(),
            latest_batch.rows.len()
        );

        let index = RangeIndex::build(&previous_batch.rows);
        let raw_transfers = detect_transfers(&latest_batch.rows, &index);
        let transfers = summarize_transfers(&raw_transfers);
        log::info!(
            "{} transactions found ({} seller/buyer pairs)",
            raw_transfers.len(),
            transfers.len()
        );

        let ownership = compute_ownership(latest, columns, &self.config.ownership)?;
        log::info!(
            "Ownership: {} companies hold {} MWh",
            ownership.total_companies,
            ownership.total_mwh
        );

        let diagnostics = RunDiagnostics {
            previous_rows: previous.len(),
            latest_rows: latest.len(),
            previous_cohort_rows: previous_batch.rows.len(),
            latest_cohort_rows: latest_batch.rows.len(),
            previous_skipped: previous_batch.skipped,
            latest_skipped: latest_batch.skipped,
            ownership_skipped: ownership.skipped_rows,
            unparseable_dates: ownership.unparseable_dates,
            index_keys: index.key_count(),
            index_entries: index.entry_count(),
            transfer_count: raw_transfers.len(),
        };

        log::info!(
            "Analysis completed in {:.1}s",
            started.elapsed().as_secs_f64()
        );

        Ok(ReconciliationReport {
            transfers,
            ownership,
            diagnostics,
        })
    }
}

/// Run with `config` in one call.
pub fn reconcile(
    previous: &RegistryTable,
    latest: &RegistryTable,
    config: &RegistryConfig,
) -> RegoResult<ReconciliationReport> {
    Reconciler::new(config.clone())?.run(previous, latest)
}
