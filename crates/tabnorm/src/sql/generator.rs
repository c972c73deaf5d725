//! Script assembly: DDL then DML.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decompose::{Decomposition, Reconciliation};
use crate::inference::TypeOverrides;
use crate::input::RowSet;
use crate::schema::{SqlType, TableSchema, qualified_name, quote_identifier};

use super::ddl::{add_foreign_key, alter_column, create_table};
use super::literal::format_literal;

/// Output settings for generated SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    /// Schema prefix for every table, e.g. `dbo`.
    pub schema: Option<String>,
    /// Whether [`SqlGenerator::generate_script`] appends INSERT statements.
    pub include_inserts: bool,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            schema: None,
            include_inserts: true,
        }
    }
}

/// Renders a reconciled decomposition as T-SQL.
#[derive(Debug, Clone, Default)]
pub struct SqlGenerator {
    config: SqlConfig,
}

impl SqlGenerator {
    /// Create a generator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with custom settings.
    pub fn with_config(config: SqlConfig) -> Self {
        Self { config }
    }

    fn schema(&self) -> Option<&str> {
        self.config.schema.as_deref()
    }

    /// CREATE TABLE for every table, then ALTER COLUMN, then FOREIGN KEY.
    ///
    /// Skipped foreign keys are left out; everything else is emitted.
    pub fn generate_ddl(
        &self,
        decomposition: &Decomposition,
        reconciliation: &Reconciliation,
    ) -> String {
        let mut sql = String::new();

        for table in decomposition.graph.tables.values() {
            sql.push_str(&create_table(table, self.schema()));
            sql.push('\n');
        }

        for alter in &reconciliation.alters {
            sql.push_str(&alter_column(alter, self.schema()));
        }

        for table in decomposition.graph.tables.values() {
            for fk in &table.foreign_keys {
                if reconciliation.is_skipped(&table.name, fk) {
                    debug!(table = %table.name, foreign_key = %fk.describe(), "Omitting skipped foreign key");
                    continue;
                }
                sql.push_str(&add_foreign_key(&table.name, fk, self.schema()));
            }
        }

        sql
    }

    /// One INSERT per row of every table, formatted by effective type.
    pub fn generate_inserts(&self, decomposition: &Decomposition, overrides: &TypeOverrides) -> String {
        let mut sql = String::new();
        for table in decomposition.graph.tables.values() {
            let Some(rows) = decomposition.table_data(&table.name) else {
                continue;
            };
            sql.push_str(&self.table_inserts(table, rows, overrides));
        }
        sql
    }

    /// DDL, followed by inserts when enabled.
    pub fn generate_script(
        &self,
        decomposition: &Decomposition,
        reconciliation: &Reconciliation,
        overrides: &TypeOverrides,
    ) -> String {
        let mut sql = self.generate_ddl(decomposition, reconciliation);
        if self.config.include_inserts {
            let inserts = self.generate_inserts(decomposition, overrides);
            if !inserts.is_empty() {
                sql.push('\n');
                sql.push_str(&inserts);
            }
        }
        sql
    }

    fn table_inserts(&self, table: &TableSchema, rows: &RowSet, overrides: &TypeOverrides) -> String {
        let types: Vec<SqlType> = rows
            .columns
            .iter()
            .map(|column| effective_type(table, column, overrides))
            .collect();
        let column_list = rows
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        let target = qualified_name(self.schema(), &table.name);

        let mut sql = String::new();
        for row in &rows.rows {
            let values = row
                .iter()
                .zip(&types)
                .map(|(value, sql_type)| format_literal(value, *sql_type))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(
                "INSERT INTO {} ({}) VALUES ({});\n",
                target, column_list, values
            ));
        }
        sql
    }
}

/// Override for the column if any, else its declared type.
pub fn effective_type(table: &TableSchema, column: &str, overrides: &TypeOverrides) -> SqlType {
    overrides
        .get(column)
        .or_else(|| table.column_type(column))
        .unwrap_or(SqlType::Text { length: 50 })
}
