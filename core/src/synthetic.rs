//! Deterministic synthetic registry snapshots.
//!
//! Produces a previous/latest pair of exports with known ground truth:
//! every transfer the generator makes is recorded, so detection can be
//! checked end to end. Same seed = same tables, byte for byte.
//!
//! Identifiers follow the registry shape
//! `G<5 digits><scheme><10-digit sequence><DDMMYYDDMMYY period><type>`,
//! e.g. `G00003RPSGB0000104520010425300425GEN`.

use chrono::{Datelike, Months, NaiveDate};

use crate::{
    config::{
        END_CERT_COLUMN, HOLDER_COLUMN, ISSUE_DATE_COLUMN, START_CERT_COLUMN, STATUS_COLUMN,
    },
    error::{RegoError, RegoResult},
    rng::{RegistryRng, RngStream},
    table::RegistryTable,
    transfer::TransferRecord,
    types::{Seq, Volume},
};

const SCHEMES: &[&str] = &["RPSGB", "RPSSC", "RPSWA", "RPSNI"];
const CERT_TYPES: &[&str] = &["GEN", "REGO"];
const STATION_NAMES: &[&str] = &[
    "Whitelee Wind Farm",
    "Clyde Wind Farm",
    "Cruachan Hydro",
    "Shotwick Solar Park",
    "Lynemouth Biomass",
    "Dinorwig Hydro",
    "Walney Offshore",
    "Scout Moor Wind",
];
const COMPANY_PREFIXES: &[&str] = &[
    "Northwind", "Greenfield", "Brightwater", "Highland", "Ashby", "Meridian", "Stonebridge",
    "Riverside", "Evergreen", "Summit",
];
const COMPANY_SUFFIXES: &[&str] = &[
    "Energy Ltd",
    "Power Plc",
    "Renewables Ltd",
    "Supply Co",
    "Trading Ltd",
];
const LIVE_STATUSES: &[&str] = &["Issued", "Redeemed", "Transferred"];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub stations: usize,
    /// Consecutive monthly periods per station.
    pub periods: u32,
    pub max_blocks_per_period: u64,
    pub companies: usize,
    pub transfer_probability: f64,
    /// Share of transfers that move only the tail of a block.
    pub split_probability: f64,
    pub expired_probability: f64,
    /// Chance of appending an unparseable row to the latest snapshot.
    pub malformed_probability: f64,
    pub first_period: NaiveDate,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            stations: 6,
            periods: 12,
            max_blocks_per_period: 3,
            companies: 8,
            transfer_probability: 0.3,
            split_probability: 0.4,
            expired_probability: 0.1,
            malformed_probability: 0.02,
            first_period: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

pub struct SyntheticRegistry {
    pub previous: RegistryTable,
    pub latest: RegistryTable,
    /// Every transfer the generator made, one per moved block.
    pub expected_transfers: Vec<TransferRecord>,
    pub malformed_rows: usize,
}

pub fn headers() -> Vec<String> {
    [
        "Accreditation number",
        "Generating station",
        START_CERT_COLUMN,
        END_CERT_COLUMN,
        "MWh",
        HOLDER_COLUMN,
        ISSUE_DATE_COLUMN,
        STATUS_COLUMN,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

struct Station {
    accreditation: String,
    name: String,
    code: String,
    next_seq: Seq,
}

pub fn generate(seed: u64, config: &SyntheticConfig) -> RegoResult<SyntheticRegistry> {
    if config.companies < 2 {
        return Err(RegoError::InvalidConfig {
            reason: "transfers need at least two companies".into(),
        });
    }

    let mut station_rng = RegistryRng::new(seed, RngStream::Stations);
    let mut block_rng = RegistryRng::new(seed, RngStream::Blocks);
    let mut holder_rng = RegistryRng::new(seed, RngStream::Holders);
    let mut transfer_rng = RegistryRng::new(seed, RngStream::Transfers);
    let mut status_rng = RegistryRng::new(seed, RngStream::Status);

    let companies = company_names(config.companies);
    let mut stations: Vec<Station> = (0..config.stations)
        .map(|i| Station {
            accreditation: format!("R{:05}{}", i + 1, station_rng.pick(&["NQ", "SQ", "WQ"])),
            name: station_rng.pick(STATION_NAMES).to_string(),
            // Index-derived digits keep codes, and so cohort keys, unique.
            code: format!("G{:05}{}", i + 1, station_rng.pick(SCHEMES)),
            next_seq: station_rng.range_inclusive(1, 1_000_000),
        })
        .collect();

    let mut previous = Vec::new();
    let mut latest = Vec::new();
    let mut expected_transfers = Vec::new();
    let mut malformed_rows = 0;

    for month in 0..config.periods {
        let Some(period_start) = config.first_period.checked_add_months(Months::new(month)) else {
            continue;
        };
        let period = period_token(period_start);

        for station in stations.iter_mut() {
            let blocks = block_rng.range_inclusive(1, config.max_blocks_per_period.max(1));
            for _ in 0..blocks {
                let size = block_rng.range_inclusive(50, 5_000);
                let start = station.next_seq;
                let end = start + size - 1;
                station.next_seq = end + 1;

                let cert_type = *block_rng.pick(CERT_TYPES);
                let day = block_rng.range_inclusive(1, 28) as u32;
                let issued = period_start
                    .with_day(day)
                    .unwrap_or(period_start)
                    .format("%d/%m/%Y")
                    .to_string();

                let seller = holder_rng.pick(&companies).clone();
                let row = |from: Seq, to: Seq, holder: &str, status: &str| {
                    vec![
                        station.accreditation.clone(),
                        station.name.clone(),
                        cert_id(&station.code, from, &period, cert_type),
                        cert_id(&station.code, to, &period, cert_type),
                        (to - from + 1).to_string(),
                        holder.to_string(),
                        issued.clone(),
                        status.to_string(),
                    ]
                };

                previous.push(row(start, end, &seller, "Issued"));

                let status = if status_rng.chance(config.expired_probability) {
                    "Expired"
                } else {
                    *status_rng.pick(LIVE_STATUSES)
                };

                if !transfer_rng.chance(config.transfer_probability) {
                    latest.push(row(start, end, &seller, status));
                    continue;
                }

                let buyer = loop {
                    let candidate = holder_rng.pick(&companies);
                    if *candidate != seller {
                        break candidate.clone();
                    }
                };

                if size >= 2 && transfer_rng.chance(config.split_probability) {
                    let cut = start + transfer_rng.next_u64_below(size - 1);
                    latest.push(row(start, cut, &seller, status));
                    latest.push(row(cut + 1, end, &buyer, status));
                    expected_transfers.push(TransferRecord {
                        from: seller,
                        to: buyer,
                        volume: (end - cut) as Volume,
                    });
                } else {
                    latest.push(row(start, end, &buyer, status));
                    expected_transfers.push(TransferRecord {
                        from: seller,
                        to: buyer,
                        volume: size as Volume,
                    });
                }
            }
        }

        if status_rng.chance(config.malformed_probability) {
            latest.push(vec![
                String::new(),
                "Unknown".into(),
                "N/A".into(),
                "N/A".into(),
                "0".into(),
                companies[0].clone(),
                "01/01/2025".into(),
                "Issued".into(),
            ]);
            malformed_rows += 1;
        }
    }

    log::debug!(
        "synthetic registry seed={seed}: {} previous rows, {} latest rows, {} transfers",
        previous.len(),
        latest.len(),
        expected_transfers.len()
    );

    Ok(SyntheticRegistry {
        previous: RegistryTable::new("previous", headers(), previous)?,
        latest: RegistryTable::new("latest", headers(), latest)?,
        expected_transfers,
        malformed_rows,
    })
}

/// `DDMMYYDDMMYY`: first and last day of the month.
fn period_token(month_start: NaiveDate) -> String {
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(month_start);
    format!("{}{}", month_start.format("%d%m%y"), month_end.format("%d%m%y"))
}

fn cert_id(station: &str, seq: Seq, period: &str, cert_type: &str) -> String {
    format!("{station}{seq:010}{period}{cert_type}")
}

fn company_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let prefix = COMPANY_PREFIXES[i % COMPANY_PREFIXES.len()];
            let suffix = COMPANY_SUFFIXES[(i / COMPANY_PREFIXES.len()) % COMPANY_SUFFIXES.len()];
            format!("{prefix} {suffix}")
        })
        .collect()
}
