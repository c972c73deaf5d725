//! Tabular schema report.

use std::io::Write;

use crate::error::Result;
use crate::schema::SchemaGraph;

/// Header of the schema report.
pub const REPORT_HEADER: [&str; 4] = ["table", "primary_key", "columns", "foreign_keys"];

/// Write one CSV line per table: name, key, `;`-joined columns and FKs.
pub fn write_schema_report<W: Write>(graph: &SchemaGraph, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(REPORT_HEADER)?;

    for table in graph.tables.values() {
        let foreign_keys = table
            .foreign_keys
            .iter()
            .map(|fk| fk.describe())
            .collect::<Vec<_>>()
            .join("; ");
        csv.write_record([
            table.name.as_str(),
            table.primary_key.as_deref().unwrap_or(""),
            table.columns.join("; ").as_str(),
            foreign_keys.as_str(),
        ])?;
    }

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// The schema report as a string.
pub fn schema_report(graph: &SchemaGraph) -> Result<String> {
    let mut buffer = Vec::new();
    write_schema_report(graph, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
