use thiserror::Error;

/// Why a single certificate identifier could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertIdError {
    #[error("identifier too short: {len} characters (minimum 20)")]
    TooShort { len: usize },

    #[error("identifier contains no digit run")]
    NoDigits,
}

/// Why an issue date could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueDateError {
    #[error("unparseable issue date '{raw}'")]
    Unparseable { raw: String },
}

/// Whole-run failures. Any of these aborts the reconciliation.
#[derive(Error, Debug)]
pub enum RegoError {
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Table '{table}' row {row}: expected {expected} fields, got {actual}")]
    RaggedRow {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RegoResult<T> = Result<T, RegoError>;
