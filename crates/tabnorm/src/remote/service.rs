//! The table service interface.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::export::UploadRequest;
use crate::input::RowSet;

/// Default number of rows requested per fetch.
pub const DEFAULT_FETCH_TOP: usize = 1000;

/// A table listed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTable {
    #[serde(rename = "TABLE_SCHEMA", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(rename = "TABLE_NAME")]
    pub name: String,
}

impl RemoteTable {
    /// `schema.table`, or just the table when no schema is reported.
    pub fn qualified_name(&self) -> String {
        match self.schema.as_deref().filter(|s| !s.is_empty()) {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

/// Source of rows and sink for normalized tables.
pub trait TableService {
    /// List the tables available for normalization.
    fn list_tables(&self) -> Result<Vec<RemoteTable>>;

    /// Fetch at most `top` rows of a table.
    fn fetch_table(&self, name: &str, top: usize) -> Result<RowSet>;

    /// Store normalized tables, returning the service's report.
    fn upload(&self, request: &UploadRequest) -> Result<serde_json::Value>;

    /// Where the service lives, for source metadata.
    fn location(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_table_json() {
        let tables: Vec<RemoteTable> = serde_json::from_str(
            r#"[{"TABLE_SCHEMA": "dbo", "TABLE_NAME": "Ventas"}, {"TABLE_NAME": "Log"}]"#,
        )
        .unwrap();
        assert_eq!(tables[0].qualified_name(), "dbo.Ventas");
        assert_eq!(tables[1].qualified_name(), "Log");
    }
}
