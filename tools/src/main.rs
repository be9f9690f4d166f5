//! rego-runner: reconciles two registry exports from the command line.
//!
//! Usage:
//!   rego-runner --previous old.csv --latest new.csv --out-dir results
//!   rego-runner --previous old.csv --latest new.csv --config rego.json --json
//!   rego-runner --demo --seed 12345

mod csv_io;
mod report;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rego_core::{
    config::RegistryConfig,
    reconcile::{ReconciliationReport, Reconciler},
    synthetic::{self, SyntheticConfig},
    table::RegistryTable,
};
use std::env;

#[derive(serde::Serialize)]
struct RunOutput<'a> {
    run_id: &'a str,
    config: &'a RegistryConfig,
    report: &'a ReconciliationReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let demo = has_flag(&args, "--demo");
    let json = has_flag(&args, "--json");
    let seed = parse_arg(&args, "--seed", 42u64);

    let mut config = match arg_value(&args, "--config") {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    if let Some(raw) = arg_value(&args, "--cutoff") {
        config.ownership.cutoff_date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--cutoff expects YYYY-MM-DD, got {raw}"))?;
    }
    if let Some(status) = arg_value(&args, "--excluded-status") {
        config.ownership.excluded_status = status.to_string();
    }

    let (previous, latest) = if demo {
        load_demo(seed)?
    } else {
        let (Some(prev_path), Some(latest_path)) =
            (arg_value(&args, "--previous"), arg_value(&args, "--latest"))
        else {
            bail!("usage: rego-runner --previous <csv> --latest <csv> [--out-dir <dir>] [--config <json>] [--json]");
        };
        (
            csv_io::load_table("previous", prev_path)?,
            csv_io::load_table("latest", latest_path)?,
        )
    };

    let run_id = uuid::Uuid::new_v4().to_string();
    log::info!("run {run_id}: reconciling {} -> {} rows", previous.len(), latest.len());

    let report = Reconciler::new(config.clone())?.run(&previous, &latest)?;

    if json {
        let output = RunOutput {
            run_id: &run_id,
            config: &config,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        report::print_summary(&report, &config, &run_id);
    }

    if let Some(out_dir) = arg_value(&args, "--out-dir") {
        csv_io::export(out_dir, &report.transfers, &report.ownership.records)?;
    }

    Ok(())
}

fn load_demo(seed: u64) -> Result<(RegistryTable, RegistryTable)> {
    let registry = synthetic::generate(seed, &SyntheticConfig::default())?;
    log::info!(
        "demo registry seed={seed}: {} planted transfers, {} malformed rows",
        registry.expected_transfers.len(),
        registry.malformed_rows
    );
    Ok((registry.previous, registry.latest))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
