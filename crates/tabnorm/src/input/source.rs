//! Row sets and source metadata.

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{NormalizeError, Result};

use super::value::Value;

/// Number of rows shown when previewing a row set.
pub const PREVIEW_ROWS: usize = 20;

/// Metadata about where a row set came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File or table name.
    pub name: String,
    /// Full path or remote location.
    pub location: String,
    /// SHA-256 hash of the file contents (files only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// File size in bytes (files only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Detected format (csv, tsv, json, remote).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the data was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Metadata for a file that has been parsed.
    pub fn file(
        path: &Path,
        hash: String,
        size_bytes: u64,
        format: impl Into<String>,
        rows: &RowSet,
    ) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            location: path.display().to_string(),
            hash: Some(hash),
            size_bytes: Some(size_bytes),
            format: format.into(),
            row_count: rows.row_count(),
            column_count: rows.column_count(),
            loaded_at: Utc::now(),
        }
    }

    /// Metadata for a table fetched from the remote service.
    pub fn remote(table: &str, location: impl Into<String>, rows: &RowSet) -> Self {
        Self {
            name: table.to_string(),
            location: location.into(),
            hash: None,
            size_bytes: None,
            format: "remote".to_string(),
            row_count: rows.row_count(),
            column_count: rows.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// An in-memory table: column names resolved once, rows stored positionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Row data, each row exactly `columns.len()` wide.
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Create a row set, padding short rows with nulls and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a row set from name→value records.
    ///
    /// The column universe is the union of all record keys in first-seen
    /// order; keys missing from a record become null.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = IndexMap<String, Value>>,
    {
        let records: Vec<IndexMap<String, Value>> = records.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.shift_remove(c).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Build a row set from a JSON array of objects.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| {
            NormalizeError::UnsupportedFormat("expected a JSON array of row objects".to_string())
        })?;

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let object = item.as_object().ok_or_else(|| NormalizeError::Parse {
                row: idx + 1,
                column: 0,
                message: "row is not a JSON object".to_string(),
            })?;
            let record: IndexMap<String, Value> = object
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v)))
                .collect();
            records.push(record);
        }

        Ok(Self::from_records(records))
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&Value::Null))
    }

    /// Get all values of a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Non-empty, string-coerced values of a column.
    pub fn non_empty_values(&self, index: usize) -> Vec<String> {
        self.column_values(index)
            .filter_map(|v| v.as_text().map(|s| s.into_owned()))
            .collect()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Drop rows in which every value is empty.
    pub fn without_empty_rows(mut self) -> Self {
        self.rows.retain(|row| row.iter().any(|v| !v.is_empty()));
        self
    }

    /// The first rows, for display.
    pub fn preview(&self) -> &[Vec<Value>] {
        &self.rows[..self.rows.len().min(PREVIEW_ROWS)]
    }

    /// Rows as ordered JSON objects.
    pub fn to_records(&self) -> Vec<IndexMap<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(c, v)| (c.clone(), v.to_json()))
                    .collect()
            })
            .collect()
    }
}
