//! In-memory registry export: a header row plus string records.
//!
//! The engine never reads files. Callers load a snapshot however they
//! like and hand it over as a `RegistryTable`.

use serde::{Deserialize, Serialize};

use crate::{
    config::ColumnMap,
    error::{RegoError, RegoResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRegistryTable")]
pub struct RegistryTable {
    /// Label used in error messages ("previous", "latest", ...).
    pub name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Wire form of a table. Deserialization goes through `RegistryTable::new`
/// so a ragged row is rejected at the boundary.
#[derive(Deserialize)]
struct RawRegistryTable {
    #[serde(default)]
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TryFrom<RawRegistryTable> for RegistryTable {
    type Error = RegoError;

    fn try_from(raw: RawRegistryTable) -> RegoResult<Self> {
        Self::new(raw.name, raw.headers, raw.rows)
    }
}

impl RegistryTable {
    /// Every row must have exactly one value per header.
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> RegoResult<Self> {
        let name = name.into();
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != headers.len())
        {
            return Err(RegoError::RaggedRow {
                table: name,
                row,
                expected: headers.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column`, or `MissingColumn`.
    pub fn column(&self, column: &str) -> RegoResult<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| RegoError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Fail on the first of `columns` that is absent.
    pub fn require_columns<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> RegoResult<()> {
        for column in columns {
            self.column(column)?;
        }
        Ok(())
    }

    /// Check the full schema used by a reconciliation run.
    pub fn require_schema(&self, columns: &ColumnMap) -> RegoResult<()> {
        self.require_columns(columns.all())
    }

    /// A new table with the same headers holding only rows where `keep` is true.
    pub fn filter_rows<F>(&self, name: impl Into<String>, mut keep: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        Self {
            name: name.into(),
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|values| keep(values.as_slice()))
                .cloned()
                .collect(),
        }
    }
}
