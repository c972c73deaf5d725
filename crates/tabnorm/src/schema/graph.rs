//! The schema graph produced by one decomposition run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{NormalizeError, Result};

use super::table::TableSchema;

/// A foreign-key edge, derived from a table's foreign-key list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub source_table: String,
    pub column: String,
    pub target_table: String,
    pub target_column: String,
}

/// All tables of one decomposition, in generation order.
///
/// The first table inserted is the main table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaGraph {
    pub tables: IndexMap<String, TableSchema>,
}

impl SchemaGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table with the same name.
    pub fn add_table(&mut self, table: TableSchema) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Get a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Get a table by name, mutably.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut TableSchema> {
        self.tables.get_mut(name)
    }

    /// The main table (first in generation order).
    pub fn main_table(&self) -> Option<&TableSchema> {
        self.tables.values().next()
    }

    /// Table names in generation order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|k| k.as_str()).collect()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when the graph holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Foreign-key edges, recomputed from the tables on every call.
    pub fn relations(&self) -> Vec<Relation> {
        self.tables
            .values()
            .flat_map(|table| {
                table.foreign_keys.iter().map(move |fk| Relation {
                    source_table: table.name.clone(),
                    column: fk.column.clone(),
                    target_table: fk.referenced_table.clone(),
                    target_column: fk.referenced_column.clone(),
                })
            })
            .collect()
    }

    /// Check the key invariants of every table.
    pub fn validate(&self) -> Result<()> {
        for table in self.tables.values() {
            if let Some(pk) = &table.primary_key {
                if !table.has_column(pk) {
                    return Err(NormalizeError::InvalidSchema(format!(
                        "primary key '{}' is not a column of '{}'",
                        pk, table.name
                    )));
                }
            }
            for column in &table.columns {
                if !table.types.contains_key(column) {
                    return Err(NormalizeError::InvalidSchema(format!(
                        "column '{}' of '{}' has no type",
                        column, table.name
                    )));
                }
            }
            for fk in &table.foreign_keys {
                if !table.has_column(&fk.column) {
                    return Err(NormalizeError::InvalidSchema(format!(
                        "foreign key column '{}' is not a column of '{}'",
                        fk.column, table.name
                    )));
                }
                let target = self.table(&fk.referenced_table).ok_or_else(|| {
                    NormalizeError::InvalidSchema(format!(
                        "'{}' references unknown table '{}'",
                        table.name, fk.referenced_table
                    ))
                })?;
                if !target.has_column(&fk.referenced_column) {
                    return Err(NormalizeError::InvalidSchema(format!(
                        "'{}' references missing column '{}.{}'",
                        table.name, fk.referenced_table, fk.referenced_column
                    )));
                }
            }
        }
        Ok(())
    }
}
