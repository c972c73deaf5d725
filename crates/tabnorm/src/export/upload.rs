//! Payload for the remote upload endpoint.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::decompose::Decomposition;

/// What the service does when a target table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    #[default]
    Drop,
    Fail,
}

impl std::str::FromStr for IfExists {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(IfExists::Drop),
            "fail" => Ok(IfExists::Fail),
            other => Err(format!("unknown ifExists policy '{}' (expected drop or fail)", other)),
        }
    }
}

/// `{ schema, ifExists, tables: { name: rows[] } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub schema: String,
    #[serde(rename = "ifExists")]
    pub if_exists: IfExists,
    pub tables: IndexMap<String, Vec<IndexMap<String, serde_json::Value>>>,
}

impl UploadRequest {
    /// Payload with every table of a decomposition and default options.
    pub fn from_decomposition(decomposition: &Decomposition) -> Self {
        let tables = decomposition
            .data
            .iter()
            .map(|(name, rows)| (name.clone(), rows.to_records()))
            .collect();
        Self {
            schema: "dbo".to_string(),
            if_exists: IfExists::Drop,
            tables,
        }
    }

    /// Set the target schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the existing-table policy.
    pub fn with_if_exists(mut self, if_exists: IfExists) -> Self {
        self.if_exists = if_exists;
        self
    }

    /// Total rows across all tables.
    pub fn row_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{RowSet, Value};

    fn decomposition() -> Decomposition {
        let mut data = IndexMap::new();
        data.insert(
            "T".to_string(),
            RowSet::new(vec!["a".into(), "b".into()], vec![vec![Value::Number(1.0), Value::Null]]),
        );
        Decomposition {
            data,
            ..Decomposition::default()
        }
    }

    #[test]
    fn test_payload_shape() {
        let request = UploadRequest::from_decomposition(&decomposition());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "schema": "dbo",
                "ifExists": "drop",
                "tables": {"T": [{"a": 1, "b": null}]}
            })
        );
        assert!(json["tables"]["T"][0]["a"].is_i64());
        assert_eq!(request.row_count(), 1);
    }

    #[test]
    fn test_options() {
        let request = UploadRequest::from_decomposition(&decomposition())
            .with_schema("staging")
            .with_if_exists("FAIL".parse().unwrap());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["schema"], "staging");
        assert_eq!(json["ifExists"], "fail");
        assert!("maybe".parse::<IfExists>().is_err());
    }
}
