//! End-to-end reconciliation runs.
//!
//! Tests verify the run boundary:
//! 1. Both result tables come out of one call
//! 2. A missing column aborts the run with a schema error
//! 3. Identifier failures are skipped, counted once, and never fatal
//! 4. Original columns survive the cohort build

use rego_core::{
    cohort::{build_cohorts, IdColumn},
    config::{ColumnMap, RegistryConfig},
    error::RegoError,
    reconcile::{reconcile, Reconciler},
    table::RegistryTable,
    transfer::TransferSummaryRow,
};

const STATION: &str = "G00007RPSGB";
const PERIOD: &str = "010525310525";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cert(seq: u64) -> String {
    format!("{STATION}{seq:010}{PERIOD}GEN")
}

fn headers() -> Vec<String> {
    [
        "Generating station",
        "Start certificate number",
        "End certificate number",
        "Current holder",
        "Issue date",
        "Status",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn row(start: u64, end: u64, holder: &str, issued: &str, status: &str) -> Vec<String> {
    vec![
        "Whitelee Wind Farm".into(),
        cert(start),
        cert(end),
        holder.into(),
        issued.into(),
        status.into(),
    ]
}

fn bad_row(holder: &str) -> Vec<String> {
    vec![
        "Unknown".into(),
        "PENDING".into(),
        cert(1),
        holder.into(),
        "01/05/2025".into(),
        "Issued".into(),
    ]
}

fn build(name: &str, rows: Vec<Vec<String>>) -> RegistryTable {
    RegistryTable::new(name, headers(), rows).expect("valid table")
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: both tables from one run
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn run_produces_transfers_and_ownership() {
    init_logging();

    let previous = build(
        "previous",
        vec![
            row(1, 1_000, "Northwind Energy Ltd", "01/05/2025", "Issued"),
            row(1_001, 2_000, "Greenfield Power Plc", "01/05/2025", "Issued"),
        ],
    );
    let latest = build(
        "latest",
        vec![
            row(1, 600, "Northwind Energy Ltd", "01/05/2025", "Issued"),
            row(601, 1_000, "Highland Supply Co", "01/05/2025", "Issued"),
            row(1_001, 2_000, "Highland Supply Co", "01/05/2025", "Expired"),
        ],
    );

    let report = reconcile(&previous, &latest, &RegistryConfig::default()).unwrap();

    assert_eq!(
        report.transfers,
        vec![
            TransferSummaryRow {
                seller: "Greenfield Power Plc".into(),
                buyer: "Highland Supply Co".into(),
                total_mwh: 1_000,
            },
            TransferSummaryRow {
                seller: "Northwind Energy Ltd".into(),
                buyer: "Highland Supply Co".into(),
                total_mwh: 400,
            },
        ]
    );
    assert_eq!(report.diagnostics.transfer_count, 2);

    // The expired block still transferred, but does not count as held.
    assert_eq!(report.ownership.holding("Northwind Energy Ltd"), Some(600));
    assert_eq!(report.ownership.holding("Highland Supply Co"), Some(400));
    assert_eq!(report.ownership.total_mwh, 1_000);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: schema errors are fatal
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_holder_column_aborts_the_run() {
    let previous = RegistryTable::new(
        "previous",
        vec![
            "Start certificate number".into(),
            "End certificate number".into(),
        ],
        vec![vec![cert(1), cert(10)]],
    )
    .unwrap();
    let latest = build("latest", vec![row(1, 10, "A", "01/05/2025", "Issued")]);

    let err = reconcile(&previous, &latest, &RegistryConfig::default()).unwrap_err();
    match err {
        RegoError::MissingColumn { table, column } => {
            assert_eq!(table, "previous");
            assert_eq!(column, "Current holder");
        }
        other => panic!("expected MissingColumn, got {other}"),
    }
}

#[test]
fn latest_needs_date_and_status_even_with_no_rows() {
    let previous = build("previous", vec![]);
    let latest = RegistryTable::new(
        "latest",
        vec![
            "Start certificate number".into(),
            "End certificate number".into(),
            "Current holder".into(),
        ],
        vec![],
    )
    .unwrap();

    let err = reconcile(&previous, &latest, &RegistryConfig::default()).unwrap_err();
    assert!(
        matches!(err, RegoError::MissingColumn { ref column, .. } if column == "Issue date"),
        "got {err}"
    );
}

#[test]
fn previous_does_not_need_date_or_status() {
    let previous = RegistryTable::new(
        "previous",
        vec![
            "Start certificate number".into(),
            "End certificate number".into(),
            "Current holder".into(),
        ],
        vec![vec![cert(1), cert(10), "A".into()]],
    )
    .unwrap();
    let latest = build("latest", vec![row(1, 10, "B", "01/05/2025", "Issued")]);

    let report = reconcile(&previous, &latest, &RegistryConfig::default()).unwrap();
    assert_eq!(report.diagnostics.transfer_count, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: identifier failures are skipped and counted once
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unparseable_rows_are_counted_once_and_excluded_everywhere() {
    init_logging();

    let previous = build(
        "previous",
        vec![row(1, 100, "A", "01/05/2025", "Issued"), bad_row("A")],
    );
    let latest = build(
        "latest",
        vec![
            row(1, 100, "B", "01/05/2025", "Issued"),
            bad_row("B"),
            bad_row("C"),
        ],
    );

    let report = reconcile(&previous, &latest, &RegistryConfig::default()).unwrap();

    let diag = &report.diagnostics;
    assert_eq!(diag.previous_skipped.len(), 1);
    assert_eq!(diag.latest_skipped.len(), 2);
    assert_eq!(diag.skipped_count(), 3);
    assert!(diag
        .latest_skipped
        .iter()
        .all(|s| s.column == IdColumn::Start && s.raw == "PENDING"));

    assert_eq!(report.transfers.len(), 1);
    assert_eq!(report.transfers[0].total_mwh, 100);
    assert_eq!(report.ownership.holding("C"), None);
    assert_eq!(report.ownership.holding("B"), Some(100));

    // Both bad latest rows are active, so ownership skips them too.
    assert_eq!(diag.ownership_skipped, 2);
    assert_eq!(diag.unparseable_dates, 0);
}

#[test]
fn unreadable_issue_dates_reach_the_diagnostics() {
    let previous = build("previous", vec![row(1, 10, "A", "01/05/2025", "Issued")]);
    let latest = build(
        "latest",
        vec![
            row(1, 10, "B", "sometime", "Issued"),
            row(11, 20, "B", "01/05/2025", "Issued"),
        ],
    );

    let report = reconcile(&previous, &latest, &RegistryConfig::default()).unwrap();
    assert_eq!(report.diagnostics.unparseable_dates, 1);
    assert_eq!(report.diagnostics.ownership_skipped, 0);
    assert_eq!(report.ownership.holding("B"), Some(10));
}

#[test]
fn all_rows_bad_still_produces_empty_tables() {
    let previous = build("previous", vec![bad_row("A")]);
    let latest = build("latest", vec![bad_row("B")]);

    let report = reconcile(&previous, &latest, &RegistryConfig::default()).unwrap();
    assert!(report.transfers.is_empty());
    assert!(report.ownership.records.is_empty());
    assert_eq!(report.diagnostics.skipped_count(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: original columns survive
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn cohort_rows_keep_original_columns() {
    let table = build("latest", vec![row(5, 9, "A", "01/05/2025", "Issued")]);
    let batch = build_cohorts(&table, &ColumnMap::default()).unwrap();

    let kept = &batch.rows[0];
    assert_eq!(batch.field(kept, "Generating station"), Some("Whitelee Wind Farm"));
    assert_eq!(batch.field(kept, "Status"), Some("Issued"));
    assert_eq!(batch.field(kept, "No such column"), None);
    assert_eq!((kept.start_seq, kept.end_seq), (5, 9));
    assert_eq!(kept.volume(), 5);
    assert_eq!(kept.key, format!("{STATION}_{PERIOD}_GEN"));
}

#[test]
fn custom_column_names_are_honoured() {
    let mut config = RegistryConfig::default();
    config.columns.holder = "Owner".into();

    let mut hdrs = headers();
    hdrs[3] = "Owner".into();
    let previous = RegistryTable::new(
        "previous",
        hdrs.clone(),
        vec![row(1, 10, "A", "01/05/2025", "Issued")],
    )
    .unwrap();
    let latest =
        RegistryTable::new("latest", hdrs, vec![row(1, 10, "B", "01/05/2025", "Issued")]).unwrap();

    let report = Reconciler::new(config)
        .unwrap()
        .run(&previous, &latest)
        .unwrap();
    assert_eq!(report.transfers[0].seller, "A");
    assert_eq!(report.transfers[0].buyer, "B");
}
