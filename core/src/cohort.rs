//! Cohort builder: turns raw registry rows into comparable ranges.
//!
//! A cohort is every row sharing (station, period, certType). Only rows
//! in the same cohort have comparable sequence numbers.
//!
//! Both the start and end identifiers must parse for a row to be kept.
//! Rows that fail are counted and listed, never fatal.

use serde::{Deserialize, Serialize};

use crate::{
    cert_id::CertificateId,
    config::ColumnMap,
    error::{CertIdError, RegoResult},
    table::RegistryTable,
    types::{CohortKey, Holder, Seq, Volume},
};

/// A registry row with its identifiers decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortRow {
    /// Position in the source table.
    pub row: usize,
    /// The source row, untouched.
    pub record: Vec<String>,
    pub holder: Holder,
    pub station: String,
    pub period: String,
    pub cert_type: String,
    pub start_seq: Seq,
    pub end_seq: Seq,
    pub key: CohortKey,
}

impl CohortRow {
    /// `end_seq - start_seq + 1`. Not clamped: an inverted range is
    /// non-positive.
    pub fn volume(&self) -> Volume {
        self.end_seq as Volume - self.start_seq as Volume + 1
    }

    pub fn is_inverted(&self) -> bool {
        self.end_seq < self.start_seq
    }
}

/// Which identifier column failed on a skipped row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdColumn {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub column: IdColumn,
    pub raw: String,
    pub reason: String,
}

/// Output of one cohort build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortBatch {
    pub headers: Vec<String>,
    pub rows: Vec<CohortRow>,
    pub skipped: Vec<SkippedRow>,
}

impl CohortBatch {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Value of any original column on a kept row.
    pub fn field<'a>(&self, row: &'a CohortRow, column: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        row.record.get(idx).map(String::as_str)
    }
}

/// Parse the start and end identifiers of every row and derive its key.
///
/// Fails only when `table` lacks one of the start / end / holder columns.
pub fn build_cohorts(table: &RegistryTable, columns: &ColumnMap) -> RegoResult<CohortBatch> {
    let start_idx = table.column(&columns.start_cert)?;
    let end_idx = table.column(&columns.end_cert)?;
    let holder_idx = table.column(&columns.holder)?;

    let mut rows = Vec::with_capacity(table.len());
    let mut skipped = Vec::new();

    for (row, record) in table.rows().iter().enumerate() {
        let start_raw = &record[start_idx];
        let end_raw = &record[end_idx];

        let parsed = CertificateId::parse(start_raw)
            .map_err(|e| skip(row, IdColumn::Start, start_raw, e))
            .and_then(|start| {
                CertificateId::parse(end_raw)
                    .map(|end| (start, end))
                    .map_err(|e| skip(row, IdColumn::End, end_raw, e))
            });

        match parsed {
            Ok((start, end)) => {
                // Station, period and type come from the start identifier.
                let key = start.cohort_key();
                rows.push(CohortRow {
                    row,
                    record: record.clone(),
                    holder: record[holder_idx].clone(),
                    station: start.station,
                    period: start.period,
                    cert_type: start.cert_type,
                    start_seq: start.sequence,
                    end_seq: end.sequence,
                    key,
                });
            }
            Err(s) => skipped.push(s),
        }
    }

    if !skipped.is_empty() {
        log::warn!(
            "Skipping {} rows that couldn't be parsed ({} table)",
            skipped.len(),
            table.name
        );
    }
    log::debug!(
        "{} table: {} cohort rows built, {} skipped",
        table.name,
        rows.len(),
        skipped.len()
    );

    Ok(CohortBatch {
        headers: table.headers().to_vec(),
        rows,
        skipped,
    })
}

fn skip(row: usize, column: IdColumn, raw: &str, err: CertIdError) -> SkippedRow {
    SkippedRow {
        row,
        column,
        raw: raw.to_string(),
        reason: err.to_string(),
    }
}
