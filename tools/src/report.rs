//! Console rendering of a reconciliation report.

use rego_core::{config::RegistryConfig, reconcile::ReconciliationReport};

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn print_summary(report: &ReconciliationReport, config: &RegistryConfig, run_id: &str) {
    let diag = &report.diagnostics;

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {run_id}");
    println!(
        "  previous rows:   {} ({} parsed)",
        group_thousands(diag.previous_rows as i64),
        group_thousands(diag.previous_cohort_rows as i64)
    );
    println!(
        "  latest rows:     {} ({} parsed)",
        group_thousands(diag.latest_rows as i64),
        group_thousands(diag.latest_cohort_rows as i64)
    );
    println!("  cohort keys:     {}", group_thousands(diag.index_keys as i64));
    if diag.skipped_count() > 0 {
        println!(
            "  WARNING: skipped {} rows that couldn't be parsed",
            group_thousands(diag.skipped_count() as i64)
        );
    }
    if diag.unparseable_dates > 0 {
        println!(
            "  note: {} latest rows have an unreadable issue date",
            group_thousands(diag.unparseable_dates as i64)
        );
    }

    println!();
    println!(
        "=== TRANSACTION SUMMARY ({} transactions found) ===",
        group_thousands(diag.transfer_count as i64)
    );
    if report.transfers.is_empty() {
        println!("  No ownership changes detected between reports");
    } else {
        for row in &report.transfers {
            println!(
                "  {:<32} -> {:<32} {:>14} MWh",
                row.seller,
                row.buyer,
                group_thousands(row.total_mwh)
            );
        }
    }

    let own = &report.ownership;
    println!();
    println!("=== CURRENT OWNERSHIP BY COMPANY ===");
    println!(
        "  Non-{} certificates issued since {}",
        config.ownership.excluded_status.to_lowercase(),
        config.ownership.cutoff_date.format("%B %Y")
    );
    println!("  Total Companies: {}", group_thousands(own.total_companies as i64));
    println!("  Total MWh Held:  {}", group_thousands(own.total_mwh));
    if own.unparseable_dates > 0 {
        println!(
            "  ({} rows ignored: unreadable issue date)",
            group_thousands(own.unparseable_dates as i64)
        );
    }
    for record in &own.records {
        println!(
            "  {:<32} {:>14} MWh",
            record.company,
            group_thousands(record.total_mwh)
        );
    }
}
