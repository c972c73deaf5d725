//! Decomposition settings.

use serde::{Deserialize, Serialize};

use crate::inference::DEFAULT_LOW_CARDINALITY_THRESHOLD;

/// Thresholds and name templates used by the decomposition engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Columns with fewer distinct values than this are extracted.
    pub low_cardinality_threshold: usize,
    /// Name of the main table.
    pub main_table: String,
    /// Name of the main table's synthesized row key.
    pub main_key: String,
    /// Prefix of dependent table names (`Entidad_<column>`).
    pub entity_prefix: String,
    /// Prefix of dependent key names (`ID_<COLUMN>`).
    pub key_prefix: String,
    /// When set, text cells containing this character are split into rows.
    pub split_delimiter: Option<char>,
    /// Name of the origin-row column added by splitting.
    pub origin_column: String,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            low_cardinality_threshold: DEFAULT_LOW_CARDINALITY_THRESHOLD,
            main_table: "Tabla_Principal".to_string(),
            main_key: "ID_Main".to_string(),
            entity_prefix: "Entidad_".to_string(),
            key_prefix: "ID_".to_string(),
            split_delimiter: None,
            origin_column: "ID_Origen".to_string(),
        }
    }
}

impl DecompositionConfig {
    /// Dependent table name for an extracted column.
    pub fn entity_table_name(&self, column: &str) -> String {
        format!("{}{}", self.entity_prefix, column)
    }

    /// Dependent key name for an extracted column.
    pub fn entity_key_name(&self, column: &str) -> String {
        format!("{}{}", self.key_prefix, column.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let config = DecompositionConfig::default();
        assert_eq!(config.entity_table_name("country"), "Entidad_country");
        assert_eq!(config.entity_key_name("country"), "ID_COUNTRY");
        assert_eq!(config.low_cardinality_threshold, 20);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DecompositionConfig =
            serde_json::from_str(r#"{"low_cardinality_threshold": 5, "split_delimiter": ","}"#)
                .unwrap();
        assert_eq!(config.low_cardinality_threshold, 5);
        assert_eq!(config.split_delimiter, Some(','));
        assert_eq!(config.main_table, "Tabla_Principal");
    }
}
