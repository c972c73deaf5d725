//! Table data as CSV files inside a ZIP archive.

use std::io::{Cursor, Seek, Write};

use tracing::debug;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

use crate::decompose::Decomposition;
use crate::error::{NormalizeError, Result};
use crate::input::RowSet;

/// Write every table's rows as `<table>.csv` into a ZIP archive.
pub fn write_csv_bundle<W: Write + Seek>(decomposition: &Decomposition, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, rows) in &decomposition.data {
        zip.start_file(format!("{}.csv", name), options)?;
        let bytes = table_csv(rows)?;
        zip.write_all(&bytes).map_err(|e| {
            NormalizeError::Persistence(format!("failed to write {}.csv: {}", name, e))
        })?;
        debug!(table = %name, rows = rows.row_count(), "Added table to bundle");
    }

    Ok(zip.finish()?)
}

/// The ZIP archive as bytes.
pub fn csv_bundle(decomposition: &Decomposition) -> Result<Vec<u8>> {
    let cursor = write_csv_bundle(decomposition, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}

/// One table as CSV, header first, nulls as empty fields.
pub fn table_csv(rows: &RowSet) -> Result<Vec<u8>> {
    let mut csv = csv::Writer::from_writer(Vec::new());
    csv.write_record(&rows.columns)?;
    for row in &rows.rows {
        csv.write_record(row.iter().map(|v| v.to_string()))?;
    }
    csv.into_inner()
        .map_err(|e| NormalizeError::Persistence(format!("failed to flush CSV: {}", e)))
}
