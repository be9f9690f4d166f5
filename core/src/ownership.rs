//! Current ownership: MWh held per company in the latest snapshot.
//!
//! Only active rows count: issued on or after the cutoff date and not in
//! the excluded status. A row whose issue date cannot be read is treated
//! as failing the cutoff; it is counted separately from identifier skips.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    cohort::{build_cohorts, CohortBatch},
    config::{ColumnMap, OwnershipFilter},
    error::RegoResult,
    issue_date::parse_issue_date,
    table::RegistryTable,
    types::{Holder, Volume},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub company: Holder,
    pub total_mwh: Volume,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipSummary {
    /// Sorted by descending volume, then company.
    pub records: Vec<OwnershipRecord>,
    pub total_companies: usize,
    pub total_mwh: Volume,
    /// Rows passing the date and status filter.
    pub active_rows: usize,
    /// Rows dropped because the issue date was unreadable.
    pub unparseable_dates: usize,
    /// Active rows dropped because an identifier failed to parse.
    pub skipped_rows: usize,
}

impl OwnershipSummary {
    pub fn holding(&self, company: &str) -> Option<Volume> {
        self.records
            .iter()
            .find(|r| r.company == company)
            .map(|r| r.total_mwh)
    }
}

/// Rows of `latest` that count as currently held.
pub fn active_rows(
    latest: &RegistryTable,
    columns: &ColumnMap,
    filter: &OwnershipFilter,
) -> RegoResult<(RegistryTable, usize)> {
    let date_idx = latest.column(&columns.issue_date)?;
    let status_idx = latest.column(&columns.status)?;

    let mut unparseable = 0usize;
    let active = latest.filter_rows(format!("{} (active)", latest.name), |record| {
        let issued_in_window = match parse_issue_date(&record[date_idx]) {
            Ok(date) => date >= filter.cutoff_date,
            Err(_) => {
                unparseable += 1;
                false
            }
        };
        issued_in_window && record[status_idx] != filter.excluded_status
    });

    if unparseable > 0 {
        log::warn!(
            "{unparseable} rows in {} table have an unreadable issue date",
            latest.name
        );
    }
    Ok((active, unparseable))
}

/// Filter `latest` to active rows, decode them, and sum volume per holder.
pub fn compute_ownership(
    latest: &RegistryTable,
    columns: &ColumnMap,
    filter: &OwnershipFilter,
) -> RegoResult<OwnershipSummary> {
    let (active, unparseable_dates) = active_rows(latest, columns, filter)?;
    let batch = build_cohorts(&active, columns)?;
    Ok(aggregate_holdings(&batch, active.len(), unparseable_dates))
}

fn aggregate_holdings(
    batch: &CohortBatch,
    active_rows: usize,
    unparseable_dates: usize,
) -> OwnershipSummary {
    let mut totals: HashMap<&str, Volume> = HashMap::new();
    let mut inverted = 0usize;
    for row in &batch.rows {
        if row.is_inverted() {
            inverted += 1;
        }
        *totals.entry(row.holder.as_str()).or_insert(0) += row.volume();
    }
    if inverted > 0 {
        log::warn!("{inverted} active rows have an end sequence before their start");
    }

    let mut records: Vec<OwnershipRecord> = totals
        .into_iter()
        .map(|(company, total_mwh)| OwnershipRecord {
            company: company.to_string(),
            total_mwh,
        })
        .collect();
    records.sort_by(|a, b| {
        b.total_mwh
            .cmp(&a.total_mwh)
            .then_with(|| a.company.cmp(&b.company))
    });

    OwnershipSummary {
        total_companies: records.len(),
        total_mwh: records.iter().map(|r| r.total_mwh).sum(),
        records,
        active_rows,
        unparseable_dates,
        skipped_rows: batch.skipped_count(),
    }
}
