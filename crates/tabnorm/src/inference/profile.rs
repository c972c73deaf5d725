//! Per-column profiles derived from a row set.

use std::collections::HashSet;

use serde::Serialize;

use crate::input::RowSet;
use crate::schema::SqlType;

use super::overrides::TypeOverrides;
use super::type_inference::TypeInferencer;

/// What a row set says about one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Non-empty, string-coerced values in row order.
    #[serde(skip)]
    pub values: Vec<String>,
    /// Number of rows in the row set.
    pub row_count: usize,
    /// Number of distinct non-empty values.
    pub distinct_count: usize,
    /// Resolved storage type.
    pub inferred_type: SqlType,
}

impl ColumnProfile {
    /// Profile the column at `index`.
    pub fn build(
        rows: &RowSet,
        index: usize,
        inferencer: &TypeInferencer,
        overrides: &TypeOverrides,
    ) -> Self {
        let name = rows.columns[index].clone();
        let values = rows.non_empty_values(index);
        let distinct_count = distinct_count(&values);
        let inferred_type = inferencer.resolve(&name, &values, overrides);

        Self {
            name,
            values,
            row_count: rows.row_count(),
            distinct_count,
            inferred_type,
        }
    }

    /// Every row holds a present value and no value repeats.
    pub fn is_unique(&self) -> bool {
        self.row_count > 0 && self.distinct_count == self.row_count
    }

    /// Between one and `threshold - 1` distinct values.
    pub fn is_low_cardinality(&self, threshold: usize) -> bool {
        self.distinct_count > 0 && self.distinct_count < threshold
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.row_count - self.values.len()
    }
}

/// Profile every column of a row set.
pub fn profile_columns(
    rows: &RowSet,
    inferencer: &TypeInferencer,
    overrides: &TypeOverrides,
) -> Vec<ColumnProfile> {
    (0..rows.column_count())
        .map(|index| ColumnProfile::build(rows, index, inferencer, overrides))
        .collect()
}

/// Count distinct values.
pub fn distinct_count<S: AsRef<str>>(values: &[S]) -> usize {
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<HashSet<&str>>()
        .len()
}
