//! Export artifacts: SQL files, schema reports, CSV bundles, diagram
//! graphs and upload payloads.

mod bundle;
mod graph;
mod report;
mod upload;

use std::fs;
use std::path::Path;

use crate::error::{NormalizeError, Result};

pub use bundle::{csv_bundle, table_csv, write_csv_bundle};
pub use graph::{CANVAS_SIZE, GraphBuilder, GraphEdge, GraphNode, Position, VisualGraph};
pub use report::{REPORT_HEADER, schema_report, write_schema_report};
pub use upload::{IfExists, UploadRequest};

/// File name used when saving a script without an explicit path.
pub const DEFAULT_SQL_FILE: &str = "tablas_normalizadas.sql";

/// Write text or bytes to a file, mapping failures to [`NormalizeError::Io`].
pub fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, contents).map_err(|e| NormalizeError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serialize a value as pretty JSON into a file.
pub fn write_json<T: serde::Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_reports_path() {
        let err = write_file("/nonexistent-dir/out.sql", "x").unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/out.sql"));
    }
}
