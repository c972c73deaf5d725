//! In-memory table service for tests and offline runs.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::error::{NormalizeError, Result};
use crate::export::UploadRequest;
use crate::input::RowSet;

use super::service::{RemoteTable, TableService};

/// Serves fixed tables and records uploads.
#[derive(Debug, Default)]
pub struct MockTableService {
    tables: IndexMap<String, RowSet>,
    uploads: RefCell<Vec<UploadRequest>>,
}

impl MockTableService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table under `dbo`.
    pub fn with_table(mut self, name: impl Into<String>, rows: RowSet) -> Self {
        self.tables.insert(name.into(), rows);
        self
    }

    /// Requests received by [`TableService::upload`].
    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.uploads.borrow().clone()
    }
}

impl TableService for MockTableService {
    fn list_tables(&self) -> Result<Vec<RemoteTable>> {
        Ok(self
            .tables
            .keys()
            .map(|name| RemoteTable {
                schema: Some("dbo".to_string()),
                name: name.clone(),
            })
            .collect())
    }

    fn fetch_table(&self, name: &str, top: usize) -> Result<RowSet> {
        let rows = self
            .tables
            .get(name)
            .ok_or_else(|| NormalizeError::Remote(format!("fetch table failed (404 Not Found): {}", name)))?;
        Ok(RowSet::new(
            rows.columns.clone(),
            rows.rows.iter().take(top).cloned().collect(),
        ))
    }

    fn upload(&self, request: &UploadRequest) -> Result<serde_json::Value> {
        self.uploads.borrow_mut().push(request.clone());
        Ok(serde_json::json!({
            "ok": true,
            "tables": request.tables.len(),
            "rows": request.row_count(),
        }))
    }

    fn location(&self) -> String {
        "mock://tables".to_string()
    }
}
