//! Main Normalizer struct and public API.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decompose::{
    Decomposition, DecompositionConfig, DecompositionEngine, Reconciliation, SchemaReconciler,
};
use crate::error::{NormalizeError, Result};
use crate::export::{GraphBuilder, UploadRequest, VisualGraph};
use crate::inference::{InferenceConfig, TypeInferencer, TypeOverrides};
use crate::input::{Parser, ParserConfig, RowSet, SourceMetadata};
use crate::remote::TableService;
use crate::schema::{SchemaGraph, SqlType};
use crate::sql::{SqlConfig, SqlGenerator};

/// Configuration for a normalization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Type inference configuration.
    pub inference: InferenceConfig,
    /// Thresholds and naming for decomposition.
    pub decomposition: DecompositionConfig,
    /// Operator-pinned column types, e.g. `{"fecha": "DATE"}`.
    pub pinned_types: IndexMap<String, SqlType>,
    /// SQL output settings.
    pub sql: SqlConfig,
}

impl NormalizerConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| NormalizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text)
            .map_err(|e| NormalizeError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Result of normalizing one row set.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationResult {
    /// Where the rows came from.
    pub source: SourceMetadata,
    /// Tables and their data.
    pub decomposition: Decomposition,
    /// ALTER COLUMN records and skipped foreign keys.
    pub reconciliation: Reconciliation,
    /// Effective types after reconciliation.
    #[serde(skip)]
    pub overrides: TypeOverrides,
    /// The generated script (DDL, plus DML when enabled).
    pub sql: String,
    /// Summary statistics.
    pub summary: NormalizationSummary,
}

impl NormalizationResult {
    /// The schema graph.
    pub fn schema(&self) -> &SchemaGraph {
        &self.decomposition.graph
    }

    /// Diagnostics for skipped foreign keys.
    pub fn diagnostics(&self) -> Vec<String> {
        self.reconciliation.diagnostics()
    }

    /// Visualization graph with a reproducible layout.
    pub fn visual_graph(&self, seed: Option<u64>) -> VisualGraph {
        let mut builder = match seed {
            Some(seed) => GraphBuilder::with_seed(seed),
            None => GraphBuilder::new(),
        };
        builder.build(&self.decomposition.graph)
    }

    /// Upload payload with every table's rows.
    pub fn upload_request(&self) -> UploadRequest {
        UploadRequest::from_decomposition(&self.decomposition)
    }
}

/// Summary of a normalization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationSummary {
    /// Rows in the input.
    pub input_rows: usize,
    /// Columns in the input.
    pub input_columns: usize,
    /// Tables produced.
    pub tables: usize,
    /// Dependent tables produced.
    pub entity_tables: usize,
    /// Foreign keys declared.
    pub foreign_keys: usize,
    /// Foreign keys skipped for type conflicts.
    pub skipped_foreign_keys: usize,
    /// ALTER COLUMN statements emitted.
    pub altered_columns: usize,
}

/// The main normalization engine.
pub struct Normalizer {
    config: NormalizerConfig,
    parser: Parser,
    engine: DecompositionEngine,
    reconciler: SchemaReconciler,
    generator: SqlGenerator,
}

impl Normalizer {
    /// Create a new Normalizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Create a Normalizer with custom configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        let inferencer = TypeInferencer::with_config(config.inference.clone());
        Self {
            parser: Parser::with_config(config.parser.clone()),
            engine: DecompositionEngine::with_config(config.decomposition.clone(), inferencer.clone()),
            reconciler: SchemaReconciler::with_inferencer(inferencer),
            generator: SqlGenerator::with_config(config.sql.clone()),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Parse a CSV/TSV/JSON file and normalize it.
    pub fn normalize_file(&self, path: impl AsRef<Path>) -> Result<NormalizationResult> {
        let (rows, source) = self.parser.parse_file(path)?;
        self.normalize(&rows, source)
    }

    /// Fetch a remote table and normalize it.
    pub fn normalize_remote(
        &self,
        service: &dyn TableService,
        table: &str,
        top: usize,
    ) -> Result<NormalizationResult> {
        let rows = service.fetch_table(table, top)?;
        let source = SourceMetadata::remote(table, service.location(), &rows);
        self.normalize(&rows, source)
    }

    /// Normalize an in-memory row set.
    ///
    /// Every call starts from a fresh override table seeded with the
    /// pinned types, so nothing recorded in one run affects the next.
    pub fn normalize(&self, rows: &RowSet, source: SourceMetadata) -> Result<NormalizationResult> {
        let mut overrides = TypeOverrides::new(self.config.pinned_types.clone());

        let mut decomposition = self.engine.decompose(rows, &overrides)?;
        let reconciliation = self.reconciler.reconcile(&mut decomposition, &mut overrides);
        decomposition.graph.validate()?;

        let sql = self
            .generator
            .generate_script(&decomposition, &reconciliation, &overrides);
        let summary = summarize(rows, &decomposition, &reconciliation);

        info!(
            source = %source.name,
            tables = summary.tables,
            foreign_keys = summary.foreign_keys,
            skipped = summary.skipped_foreign_keys,
            "Normalization complete"
        );

        Ok(NormalizationResult {
            source,
            decomposition,
            reconciliation,
            overrides,
            sql,
            summary,
        })
    }

    /// DDL only, regardless of the insert setting.
    pub fn ddl(&self, result: &NormalizationResult) -> String {
        self.generator
            .generate_ddl(&result.decomposition, &result.reconciliation)
    }

    /// INSERT statements only.
    pub fn inserts(&self, result: &NormalizationResult) -> String {
        self.generator
            .generate_inserts(&result.decomposition, &result.overrides)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(
    rows: &RowSet,
    decomposition: &Decomposition,
    reconciliation: &Reconciliation,
) -> NormalizationSummary {
    let tables = decomposition.graph.len();
    NormalizationSummary {
        input_rows: rows.row_count(),
        input_columns: rows.column_count(),
        tables,
        entity_tables: tables.saturating_sub(1),
        foreign_keys: decomposition.graph.relations().len(),
        skipped_foreign_keys: reconciliation.conflicts.len(),
        altered_columns: reconciliation.alters.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    fn rows() -> RowSet {
        RowSet::new(
            vec!["id".into(), "country".into(), "amount".into()],
            vec![
                vec![Value::from("1"), Value::from("US"), Value::from("10")],
                vec![Value::from("2"), Value::from("US"), Value::from("20")],
                vec![Value::from("3"), Value::from("MX"), Value::from("30")],
            ],
        )
    }

    fn source(rows: &RowSet) -> SourceMetadata {
        SourceMetadata::remote("test", "memory", rows)
    }

    #[test]
    fn test_normalize_summary() {
        let rows = rows();
        let result = Normalizer::new().normalize(&rows, source(&rows)).unwrap();
        assert_eq!(
            result.summary,
            NormalizationSummary {
                input_rows: 3,
                input_columns: 3,
                tables: 2,
                entity_tables: 1,
                foreign_keys: 1,
                skipped_foreign_keys: 0,
                altered_columns: 0,
            }
        );
        assert!(result.sql.contains("CREATE TABLE [Tabla_Principal]"));
        assert!(result.diagnostics().is_empty());
    }

    #[test]
    fn test_runs_do_not_share_overrides() {
        let normalizer = Normalizer::new();
        let rows = rows();
        let first = normalizer.normalize(&rows, source(&rows)).unwrap();
        let second = normalizer.normalize(&rows, source(&rows)).unwrap();
        assert_eq!(first.sql, second.sql);
        assert_eq!(first.schema(), second.schema());
    }

    #[test]
    fn test_config_from_json() {
        let config: NormalizerConfig = serde_json::from_str(
            r#"{"pinned_types": {"fecha": "DATE"}, "sql": {"schema": "dbo"}}"#,
        )
        .unwrap();
        assert_eq!(config.pinned_types.get("fecha"), Some(&SqlType::Date));
        assert_eq!(config.sql.schema.as_deref(), Some("dbo"));
        assert!(config.sql.include_inserts);
        assert_eq!(config.decomposition.low_cardinality_threshold, 20);
    }

    #[test]
    fn test_ddl_and_inserts_split() {
        let rows = rows();
        let normalizer = Normalizer::new();
        let result = normalizer.normalize(&rows, source(&rows)).unwrap();
        assert!(!normalizer.ddl(&result).contains("INSERT"));
        assert!(normalizer.inserts(&result).starts_with("INSERT INTO"));
    }

    #[test]
    fn test_normalize_remote() {
        let service = crate::remote::MockTableService::new().with_table("Ventas", rows());
        let result = Normalizer::new().normalize_remote(&service, "Ventas", 2).unwrap();
        assert_eq!(result.source.format, "remote");
        assert_eq!(result.summary.input_rows, 2);
    }
}
