//! CSV loading and export for the runner.

use std::{fs::File, io::Read, io::Write, path::Path};

use anyhow::{Context, Result};
use rego_core::{ownership::OwnershipRecord, table::RegistryTable, transfer::TransferSummaryRow};

use crate::report::group_thousands;

pub const TRANSFER_SUMMARY_FILE: &str = "transaction_summary.csv";
pub const OWNERSHIP_FILE: &str = "current_ownership.csv";

pub fn load_table(name: &str, path: &str) -> Result<RegistryTable> {
    let file = File::open(path).with_context(|| format!("Cannot open {name} report {path}"))?;
    read_table(name, file).with_context(|| format!("Cannot read {name} report {path}"))
}

/// Short rows are padded with empty cells; long rows are rejected.
pub fn read_table<R: Read>(name: &str, reader: R) -> Result<RegistryTable> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut values: Vec<String> = record.iter().map(str::to_string).collect();
        if values.len() < headers.len() {
            values.resize(headers.len(), String::new());
        }
        rows.push(values);
    }

    Ok(RegistryTable::new(name, headers, rows)?)
}

pub fn write_transfer_summary<W: Write>(writer: W, rows: &[TransferSummaryRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Seller", "Buyer", "Total MWh"])?;
    for row in rows {
        let total = group_thousands(row.total_mwh);
        wtr.write_record([row.seller.as_str(), row.buyer.as_str(), total.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_ownership<W: Write>(writer: W, records: &[OwnershipRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Company", "Total MWh"])?;
    for record in records {
        let total = group_thousands(record.total_mwh);
        wtr.write_record([record.company.as_str(), total.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write both result tables into `out_dir`.
pub fn export(
    out_dir: &str,
    transfers: &[TransferSummaryRow],
    ownership: &[OwnershipRecord],
) -> Result<()> {
    let dir = Path::new(out_dir);
    std::fs::create_dir_all(dir).with_context(|| format!("Cannot create {out_dir}"))?;

    let path = dir.join(TRANSFER_SUMMARY_FILE);
    write_transfer_summary(File::create(&path)?, transfers)?;
    log::info!("wrote {}", path.display());

    let path = dir.join(OWNERSHIP_FILE);
    write_ownership(File::create(&path)?, ownership)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
