//! Day-first issue date parsing.
//!
//! Registry exports write dates day-first (`01/05/2025` is 1 May). Some
//! exports append a time, and a few carry ISO dates. Anything else is
//! unparseable and the row simply fails the ownership filter.

use chrono::NaiveDate;

use crate::error::IssueDateError;

/// Tried in order. Day-first forms come before ISO, and the two-digit
/// year before `%Y` so `01/05/25` is 2025 rather than year 25.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

pub fn parse_issue_date(raw: &str) -> Result<NaiveDate, IssueDateError> {
    let trimmed = raw.trim();
    let date_part = strip_time(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .ok_or_else(|| IssueDateError::Unparseable {
            raw: raw.to_string(),
        })
}

/// Drop a trailing `HH:MM[:SS]` (space- or `T`-separated).
fn strip_time(s: &str) -> &str {
    let candidates = [s.rfind(' '), s.find('T')];
    for idx in candidates.into_iter().flatten() {
        let (date, time) = s.split_at(idx);
        let time = &time[1..];
        if looks_like_time(time) {
            return date.trim_end();
        }
    }
    s
}

fn looks_like_time(s: &str) -> bool {
    let mut parts = s.split(':');
    let hours = parts.next();
    let minutes = parts.next();
    match (hours, minutes) {
        (Some(h), Some(m)) => {
            !h.is_empty()
                && h.chars().all(|c| c.is_ascii_digit())
                && m.chars().take(2).all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}
