//! Row-splitting pre-pass for delimited multi-valued cells.

use tracing::debug;

use crate::input::{RowSet, Value};
use crate::schema::naming::{same_name, unique_name};

/// Explode every row whose text cells contain `delimiter`.
///
/// A row becomes as many rows as its longest list; the i-th element of
/// each list goes to the i-th output row and shorter lists yield nulls.
/// Cells without the delimiter are copied to every output row. An origin
/// column holding the 1-based input row number is prepended, so rows
/// exploded from the same input share it.
///
/// Returns the new row set and the name actually used for the origin
/// column (suffixed when `origin_column` is already taken).
pub fn explode_rows(rows: &RowSet, delimiter: char, origin_column: &str) -> (RowSet, String) {
    let origin = unique_name(origin_column, |n| rows.columns.iter().any(|c| same_name(c, n)));

    let mut columns = Vec::with_capacity(rows.column_count() + 1);
    columns.push(origin.clone());
    columns.extend(rows.columns.iter().cloned());

    let mut out = Vec::with_capacity(rows.row_count());
    for (idx, row) in rows.rows.iter().enumerate() {
        let cells: Vec<Cell<'_>> = row.iter().map(|v| Cell::split(v, delimiter)).collect();
        let width = cells.iter().map(Cell::len).max().unwrap_or(1).max(1);

        for i in 0..width {
            let mut exploded = Vec::with_capacity(columns.len());
            exploded.push(Value::Number((idx + 1) as f64));
            exploded.extend(cells.iter().map(|cell| cell.at(i)));
            out.push(exploded);
        }
    }

    debug!(
        input_rows = rows.row_count(),
        output_rows = out.len(),
        %delimiter,
        "Exploded delimited cells"
    );

    (RowSet::new(columns, out), origin)
}

enum Cell<'a> {
    Single(&'a Value),
    List(Vec<String>),
}

impl<'a> Cell<'a> {
    fn split(value: &'a Value, delimiter: char) -> Self {
        match value {
            Value::Text(s) if s.contains(delimiter) => {
                Cell::List(s.split(delimiter).map(|part| part.trim().to_string()).collect())
            }
            other => Cell::Single(other),
        }
    }

    fn len(&self) -> usize {
        match self {
            Cell::Single(_) => 1,
            Cell::List(parts) => parts.len(),
        }
    }

    fn at(&self, index: usize) -> Value {
        match self {
            Cell::Single(value) => (*value).clone(),
            Cell::List(parts) => parts
                .get(index)
                .map(|p| Value::from(p.as_str()))
                .unwrap_or(Value::Null),
        }
    }
}
