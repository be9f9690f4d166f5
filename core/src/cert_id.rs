//! Certificate identifier parser.
//!
//! A registry identifier packs four things into one string:
//!
//! ```text
//!   <station><sequence: 10 digits><period><certType>
//! ```
//!
//! There are no separators to rely on, so the sequence is located by
//! scanning for digit runs:
//!   - the first run of 8+ digits wins;
//!   - otherwise the longest run wins (leftmost on a tie).
//!
//! Everything before the run is the station. The sequence is the first
//! 10 characters of the run. The tail starting 10 characters after the
//! run start is split into period and type.
//!
//! RULE: parsing is a pure function of the input string. The grouping key
//! downstream depends on these splits being stable, not on them being
//! "correct", so the heuristics here must not be tightened.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::CertIdError,
    types::{CohortKey, Seq},
};

/// Identifiers shorter than this (after trimming) are rejected.
pub const MIN_ID_LEN: usize = 20;
/// A digit run at least this long is taken as the sequence immediately.
pub const PREFERRED_RUN_LEN: usize = 8;
/// Width of the sequence window, counted from the run start.
pub const SEQ_WINDOW: usize = 10;
/// Width of the period when the tail does not split cleanly.
pub const FALLBACK_PERIOD_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateId {
    pub station: String,
    pub sequence: Seq,
    pub period: String,
    pub cert_type: String,
    /// The trimmed input, kept for diagnostics.
    pub full_id: String,
}

impl CertificateId {
    pub fn parse(raw: &str) -> Result<Self, CertIdError> {
        let full_id = raw.trim();
        let chars: Vec<char> = full_id.chars().collect();

        if chars.len() < MIN_ID_LEN {
            return Err(CertIdError::TooShort { len: chars.len() });
        }

        let runs = digit_runs(&chars);
        let run = select_sequence_run(&runs).ok_or(CertIdError::NoDigits)?;

        let station: String = chars[..run.start].iter().collect();

        let window_end = run.end.min(run.start + SEQ_WINDOW);
        let sequence = chars[run.start..window_end]
            .iter()
            .filter_map(|c| c.to_digit(10))
            .fold(0u64, |acc, d| acc * 10 + u64::from(d));

        // The tail starts a fixed 10 characters past the run start,
        // whatever the run's actual length.
        let tail_start = (run.start + SEQ_WINDOW).min(chars.len());
        let (period, cert_type) = split_tail(&chars[tail_start..]);

        Ok(Self {
            station,
            sequence,
            period,
            cert_type,
            full_id: full_id.to_string(),
        })
    }

    /// `station_period_certType`.
    pub fn cohort_key(&self) -> CohortKey {
        format!("{}_{}_{}", self.station, self.period, self.cert_type)
    }
}

impl FromStr for CertificateId {
    type Err = CertIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A maximal run of ASCII digits, as char offsets `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DigitRun {
    pub start: usize,
    pub end: usize,
}

impl DigitRun {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// All maximal digit runs, left to right.
pub(crate) fn digit_runs(chars: &[char]) -> Vec<DigitRun> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;

    for (i, c) in chars.iter().enumerate() {
        match (c.is_ascii_digit(), open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                runs.push(DigitRun { start, end: i });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(DigitRun {
            start,
            end: chars.len(),
        });
    }
    runs
}

/// First run of `PREFERRED_RUN_LEN`+ digits, else the longest (leftmost on tie).
pub(crate) fn select_sequence_run(runs: &[DigitRun]) -> Option<DigitRun> {
    if let Some(run) = runs.iter().find(|r| r.len() >= PREFERRED_RUN_LEN) {
        return Some(*run);
    }
    // Ties keep the earlier run.
    runs.iter().fold(None, |best: Option<DigitRun>, run| match best {
        Some(b) if b.len() >= run.len() => Some(b),
        _ => Some(*run),
    })
}

/// `(digits)(A-Z letters)` spanning the whole tail splits into period and
/// type; anything else gives a 12-character period and the rest as type.
fn split_tail(tail: &[char]) -> (String, String) {
    let digits = tail.iter().take_while(|c| c.is_ascii_digit()).count();
    let letters = &tail[digits..];
    if digits > 0 && !letters.is_empty() && letters.iter().all(|c| c.is_ascii_uppercase()) {
        return (
            tail[..digits].iter().collect(),
            letters.iter().collect(),
        );
    }

    let split = tail.len().min(FALLBACK_PERIOD_LEN);
    (
        tail[..split].iter().collect(),
        tail[split..].iter().collect(),
    )
}
