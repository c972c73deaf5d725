//! Splits one flat row set into a main table and dependent entity tables.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{NormalizeError, Result};
use crate::inference::{KeyCandidateDetector, TypeInferencer, TypeOverrides};
use crate::input::{RowSet, Value};
use crate::schema::naming::{same_name, unique_name};
use crate::schema::{ForeignKey, SchemaGraph, SqlType, TableSchema, normalize_identifier};

use super::config::DecompositionConfig;
use super::explode::explode_rows;

/// A schema graph plus the row data of each of its tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Decomposition {
    /// Tables, main table first.
    pub graph: SchemaGraph,
    /// Rows of each table, keyed by table name, columns in schema order.
    #[serde(skip)]
    pub data: IndexMap<String, RowSet>,
    /// Source columns moved into dependent tables, in extraction order.
    pub extracted: Vec<String>,
    /// Primary-key candidates found among the source columns.
    pub key_candidates: Vec<String>,
}

impl Decomposition {
    /// True when no table was produced.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Rows of a table.
    pub fn table_data(&self, name: &str) -> Option<&RowSet> {
        self.data.get(name)
    }

    /// Non-empty values of `table.column`, or nothing if either is missing.
    pub fn column_values(&self, table: &str, column: &str) -> Vec<String> {
        self.data
            .get(table)
            .and_then(|rows| rows.column_index(column).map(|idx| rows.non_empty_values(idx)))
            .unwrap_or_default()
    }
}

/// Heuristic decomposition of flat rows into a main table plus entities.
#[derive(Debug, Clone, Default)]
pub struct DecompositionEngine {
    config: DecompositionConfig,
    inferencer: TypeInferencer,
}

impl DecompositionEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom settings.
    pub fn with_config(config: DecompositionConfig, inferencer: TypeInferencer) -> Self {
        Self { config, inferencer }
    }

    /// The active configuration.
    pub fn config(&self) -> &DecompositionConfig {
        &self.config
    }

    /// Decompose a row set.
    ///
    /// No rows (including header-only input) gives an empty decomposition.
    /// Rows without any column are rejected.
    pub fn decompose(&self, rows: &RowSet, overrides: &TypeOverrides) -> Result<Decomposition> {
        if rows.column_count() == 0 && !rows.is_empty() {
            return Err(NormalizeError::InvalidRowSet(format!(
                "{} rows but no columns",
                rows.row_count()
            )));
        }
        if rows.is_empty() {
            debug!("No rows to decompose");
            return Ok(Decomposition::default());
        }

        let mut working = with_normalized_columns(rows);
        let mut origin = None;
        if let Some(delimiter) = self.config.split_delimiter {
            let origin_name = normalize_identifier(&self.config.origin_column);
            let (exploded, name) = explode_rows(&working, delimiter, &origin_name);
            working = exploded;
            origin = Some(name);
        }

        let detector = KeyCandidateDetector::with_threshold(self.config.low_cardinality_threshold);
        let key_candidates = detector.primary_key_candidates(&working);
        let extracted: Vec<String> = detector
            .low_cardinality_columns(&working)
            .into_iter()
            .filter(|c| !key_candidates.contains(c))
            .filter(|c| origin.as_deref() != Some(c.as_str()))
            .collect();

        let mut graph = SchemaGraph::new();
        let mut data = IndexMap::new();

        let main_name = normalize_identifier(&self.config.main_table);
        let mut main = TableSchema::new(main_name.clone());
        let retained: Vec<usize> = (0..working.column_count())
            .filter(|&idx| !extracted.contains(&working.columns[idx]))
            .collect();

        let main_key = unique_name(&normalize_identifier(&self.config.main_key), |n| {
            working.columns.iter().any(|c| same_name(c, n))
        });
        main.add_column(main_key.clone(), key_type(&main_key, overrides));
        main.primary_key = Some(main_key);

        for &idx in &retained {
            let name = &working.columns[idx];
            let sql_type =
                self.inferencer.resolve(name, &working.non_empty_values(idx), overrides);
            debug!(column = %name, sql_type = %sql_type, "Inferred column type");
            main.add_column(name.clone(), sql_type);
        }

        let mut main_rows: Vec<Vec<Value>> = working
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut out = Vec::with_capacity(retained.len() + extracted.len() + 1);
                out.push(Value::Number((i + 1) as f64));
                out.extend(retained.iter().map(|&idx| row[idx].clone()));
                out
            })
            .collect();

        let mut entities: Vec<(TableSchema, RowSet)> = Vec::with_capacity(extracted.len());
        for column in &extracted {
            let Some(idx) = working.column_index(column) else {
                continue;
            };

            let table_name = normalize_identifier(&self.config.entity_table_name(column));
            let table_name = unique_name(&table_name, |n| {
                same_name(n, &main_name)
                    || entities.iter().any(|(t, _)| same_name(&t.name, n))
            });
            let key = normalize_identifier(&self.config.entity_key_name(column));
            let key = unique_name(&key, |n| {
                main.columns.iter().any(|c| same_name(c, n)) || same_name(n, column)
            });

            let (distinct, ids) = first_seen_ids(working.column_values(idx));
            for (row, id) in main_rows.iter_mut().zip(&ids) {
                row.push(id.map(|n| Value::Number(n as f64)).unwrap_or(Value::Null));
            }

            let key_sql_type = key_type(&key, overrides);
            main.add_column(key.clone(), key_sql_type);
            main.foreign_keys.push(ForeignKey::new(&key, &table_name, &key));

            let mut entity = TableSchema::new(table_name.clone());
            entity.add_column(key.clone(), key_sql_type);
            entity.primary_key = Some(key.clone());
            let values: Vec<String> = distinct
                .iter()
                .filter_map(|v| v.as_text().map(|s| s.into_owned()))
                .collect();
            let sql_type = self.inferencer.resolve(column, &values, overrides);
            entity.add_column(column.clone(), sql_type);

            let entity_rows = distinct
                .into_iter()
                .enumerate()
                .map(|(i, value)| vec![Value::Number((i + 1) as f64), value])
                .collect();

            debug!(
                column = %column,
                table = %table_name,
                key = %key,
                rows = values.len(),
                "Extracted entity table"
            );
            let entity_data = RowSet::new(entity.columns.clone(), entity_rows);
            entities.push((entity, entity_data));
        }

        data.insert(main_name, RowSet::new(main.columns.clone(), main_rows));
        graph.add_table(main);
        for (entity, entity_data) in entities {
            data.insert(entity.name.clone(), entity_data);
            graph.add_table(entity);
        }

        info!(
            rows = working.row_count(),
            tables = graph.len(),
            extracted = extracted.len(),
            "Decomposition complete"
        );

        Ok(Decomposition {
            graph,
            data,
            extracted,
            key_candidates,
        })
    }
}

/// Synthesized keys are INTEGER unless pinned.
fn key_type(key: &str, overrides: &TypeOverrides) -> SqlType {
    overrides.get(key).unwrap_or(SqlType::Integer)
}

/// Normalize column names and make them unique.
fn with_normalized_columns(rows: &RowSet) -> RowSet {
    let mut columns: Vec<String> = Vec::with_capacity(rows.column_count());
    for name in &rows.columns {
        let normalized = normalize_identifier(name);
        let unique = unique_name(&normalized, |n| columns.iter().any(|c| same_name(c, n)));
        columns.push(unique);
    }
    RowSet {
        columns,
        rows: rows.rows.clone(),
    }
}

/// Distinct non-empty values in first-seen order, and each row's 1-based id.
fn first_seen_ids<'a>(
    values: impl Iterator<Item = &'a Value>,
) -> (Vec<Value>, Vec<Option<usize>>) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut distinct = Vec::new();
    let mut ids = Vec::new();

    for value in values {
        let id = value.as_text().map(|text| {
            let next = index.len() + 1;
            *index.entry(text.into_owned()).or_insert_with(|| {
                distinct.push(value.clone());
                next
            })
        });
        ids.push(id);
    }

    (distinct, ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country_rows() -> RowSet {
        RowSet::new(
            vec!["id".into(), "country".into(), "amount".into()],
            vec![
                vec![Value::from(1i64), Value::from("US"), Value::from(10i64)],
                vec![Value::from(2i64), Value::from("US"), Value::from(20i64)],
                vec![Value::from(3i64), Value::from("MX"), Value::from(30i64)],
            ],
        )
    }

    #[test]
    fn test_country_scenario() {
        let result = DecompositionEngine::new()
            .decompose(&country_rows(), &TypeOverrides::default())
            .unwrap();

        assert_eq!(result.graph.table_names(), vec!["Tabla_Principal", "Entidad_country"]);
        let main = result.graph.table("Tabla_Principal").unwrap();
        assert_eq!(main.columns, vec!["ID_Main", "id", "amount", "ID_COUNTRY"]);
        assert_eq!(main.primary_key.as_deref(), Some("ID_Main"));
        assert_eq!(
            main.foreign_keys,
            vec![ForeignKey::new("ID_COUNTRY", "Entidad_country", "ID_COUNTRY")]
        );

        let entity = result.graph.table("Entidad_country").unwrap();
        assert_eq!(entity.columns, vec!["ID_COUNTRY", "country"]);
        assert_eq!(result.table_data("Entidad_country").unwrap().row_count(), 2);
        assert_eq!(result.extracted, vec!["country"]);
        assert!(result.graph.validate().is_ok());
    }

    #[test]
    fn test_main_rows_reference_entity_ids() {
        let result = DecompositionEngine::new()
            .decompose(&country_rows(), &TypeOverrides::default())
            .unwrap();
        let main = result.table_data("Tabla_Principal").unwrap();
        let fk = main.column_index("ID_COUNTRY").unwrap();

        let ids: Vec<_> = main.column_values(fk).cloned().collect();
        assert_eq!(ids, vec![Value::Number(1.0), Value::Number(1.0), Value::Number(2.0)]);

        let entity = result.table_data("Entidad_country").unwrap();
        assert_eq!(entity.get(1, 1), Some(&Value::from("MX")));
    }

    #[test]
    fn test_empty_values_get_null_foreign_key() {
        let rows = RowSet::new(
            vec!["n".into(), "tag".into()],
            vec![
                vec![Value::from("1"), Value::from("a")],
                vec![Value::from("2"), Value::Null],
                vec![Value::from("3"), Value::from("a")],
            ],
        );
        let result = DecompositionEngine::new()
            .decompose(&rows, &TypeOverrides::default())
            .unwrap();

        let main = result.table_data("Tabla_Principal").unwrap();
        let fk = main.column_index("ID_TAG").unwrap();
        assert_eq!(main.get(1, fk), Some(&Value::Null));
        assert_eq!(result.table_data("Entidad_tag").unwrap().row_count(), 1);
    }

    #[test]
    fn test_no_rows_gives_empty_graph() {
        let rows = RowSet::new(vec!["a".into()], vec![]);
        let result = DecompositionEngine::new()
            .decompose(&rows, &TypeOverrides::default())
            .unwrap();
        assert!(result.is_empty());
        assert!(result.graph.relations().is_empty());
    }

    #[test]
    fn test_rows_without_columns_are_rejected() {
        let rows = RowSet {
            columns: vec![],
            rows: vec![vec![]],
        };
        let err = DecompositionEngine::new()
            .decompose(&rows, &TypeOverrides::default())
            .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidRowSet(_)));
    }

    #[test]
    fn test_names_are_normalized_and_deduplicated() {
        let rows = RowSet::new(
            vec!["First Name".into(), "First  Name".into(), "ID_Main".into()],
            (0..25)
                .map(|i| {
                    vec![
                        Value::from(format!("a{}", i)),
                        Value::from(format!("b{}", i)),
                        Value::from(format!("c{}", i)),
                    ]
                })
                .collect(),
        );
        let result = DecompositionEngine::new()
            .decompose(&rows, &TypeOverrides::default())
            .unwrap();

        let main = result.graph.main_table().unwrap();
        assert_eq!(main.columns, vec!["ID_Main_2", "First_Name", "First_Name_2", "ID_Main"]);
        assert_eq!(main.primary_key.as_deref(), Some("ID_Main_2"));
        assert_eq!(result.graph.len(), 1);
    }

    #[test]
    fn test_names_differing_only_in_case_are_deduplicated() {
        let rows = RowSet::new(
            vec!["Country".into(), "country".into(), "n".into()],
            vec![
                vec![Value::from("US"), Value::from("us"), Value::from("1")],
                vec![Value::from("US"), Value::from("us"), Value::from("2")],
                vec![Value::from("MX"), Value::from("mx"), Value::from("3")],
            ],
        );
        let result = DecompositionEngine::new()
            .decompose(&rows, &TypeOverrides::default())
            .unwrap();

        assert_eq!(result.extracted, vec!["Country", "country_2"]);
        assert_eq!(
            result.graph.table_names(),
            vec!["Tabla_Principal", "Entidad_Country", "Entidad_country_2"]
        );
        let main = result.graph.main_table().unwrap();
        assert_eq!(main.columns, vec!["ID_Main", "n", "ID_COUNTRY", "ID_COUNTRY_2"]);
    }

    #[test]
    fn test_pinned_synthesized_key_types() {
        let mut pinned = IndexMap::new();
        pinned.insert("ID_COUNTRY".to_string(), SqlType::Text { length: 50 });
        let result = DecompositionEngine::new()
            .decompose(&country_rows(), &TypeOverrides::new(pinned))
            .unwrap();

        let main = result.graph.main_table().unwrap();
        let entity = result.graph.table("Entidad_country").unwrap();
        assert_eq!(main.column_type("ID_COUNTRY"), Some(SqlType::Text { length: 50 }));
        assert_eq!(entity.column_type("ID_COUNTRY"), Some(SqlType::Text { length: 50 }));
        assert_eq!(main.column_type("ID_Main"), Some(SqlType::Integer));
    }

    #[test]
    fn test_split_delimiter_adds_origin_column() {
        let config = DecompositionConfig {
            split_delimiter: Some(','),
            ..DecompositionConfig::default()
        };
        let rows = RowSet::new(
            vec!["order".into(), "items".into()],
            vec![
                vec![Value::from("A"), Value::from("pen,ink")],
                vec![Value::from("B"), Value::from("pen")],
            ],
        );
        let engine = DecompositionEngine::with_config(config, TypeInferencer::new());
        let result = engine.decompose(&rows, &TypeOverrides::default()).unwrap();

        let main = result.graph.main_table().unwrap();
        assert!(main.has_column("ID_Origen"));
        assert!(!result.extracted.contains(&"ID_Origen".to_string()));
        assert_eq!(result.table_data("Tabla_Principal").unwrap().row_count(), 3);
        assert_eq!(result.table_data("Entidad_items").unwrap().row_count(), 2);
    }

    #[test]
    fn test_overrides_drive_declared_types() {
        let mut pinned = IndexMap::new();
        pinned.insert("amount".to_string(), SqlType::Text { length: 100 });
        let result = DecompositionEngine::new()
            .decompose(&country_rows(), &TypeOverrides::new(pinned))
            .unwrap();
        let main = result.graph.main_table().unwrap();
        assert_eq!(main.column_type("amount"), Some(SqlType::Text { length: 100 }));
        assert_eq!(main.column_type("id"), Some(SqlType::Integer));
    }
}
