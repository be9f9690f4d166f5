use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RegoError, RegoResult};

// ── Column names ───────────────────────────────────────────────────

pub const START_CERT_COLUMN: &str = "Start certificate number";
pub const END_CERT_COLUMN: &str = "End certificate number";
pub const HOLDER_COLUMN: &str = "Current holder";
pub const ISSUE_DATE_COLUMN: &str = "Issue date";
pub const STATUS_COLUMN: &str = "Status";

/// Names of the registry export columns the engine reads.
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub start_cert: String,
    pub end_cert: String,
    pub holder: String,
    pub issue_date: String,
    pub status: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            start_cert: START_CERT_COLUMN.into(),
            end_cert: END_CERT_COLUMN.into(),
            holder: HOLDER_COLUMN.into(),
            issue_date: ISSUE_DATE_COLUMN.into(),
            status: STATUS_COLUMN.into(),
        }
    }
}

impl ColumnMap {
    /// Columns needed to build cohorts (both snapshots).
    pub fn cohort_columns(&self) -> [&str; 3] {
        [
            self.start_cert.as_str(),
            self.end_cert.as_str(),
            self.holder.as_str(),
        ]
    }

    /// Every column the engine reads.
    pub fn all(&self) -> [&str; 5] {
        [
            self.start_cert.as_str(),
            self.end_cert.as_str(),
            self.holder.as_str(),
            self.issue_date.as_str(),
            self.status.as_str(),
        ]
    }
}

// ── Ownership filter ───────────────────────────────────────────────

/// Which latest-snapshot rows count as currently held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnershipFilter {
    /// Rows issued before this date are ignored.
    pub cutoff_date: NaiveDate,
    /// Rows whose status equals this string are ignored.
    pub excluded_status: String,
}

impl Default for OwnershipFilter {
    fn default() -> Self {
        Self {
            // April 2025 onwards.
            cutoff_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap_or(NaiveDate::MIN),
            excluded_status: "Expired".into(),
        }
    }
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub columns: ColumnMap,
    pub ownership: OwnershipFilter,
}

impl RegistryConfig {
    /// Load from a JSON file. Absent fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> RegoResult<Self> {
        let config: RegistryConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty column names and two roles mapped to one column.
    pub fn validate(&self) -> RegoResult<()> {
        let names = self.columns.all();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(RegoError::InvalidConfig {
                    reason: format!("column name #{i} is empty"),
                });
            }
            if names[..i].contains(name) {
                return Err(RegoError::InvalidConfig {
                    reason: format!("column '{name}' is mapped more than once"),
                });
            }
        }
        Ok(())
    }
}
