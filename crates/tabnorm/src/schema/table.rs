//! Table-level schema definition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::SqlType;

/// A foreign key from one column of a table to a key of another table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referencing column in the owning table.
    pub column: String,
    /// Referenced table name.
    pub referenced_table: String,
    /// Referenced column (the referenced table's primary key).
    pub referenced_column: String,
}

impl ForeignKey {
    pub fn new(
        column: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        }
    }

    /// Constraint name used in the generated DDL.
    pub fn constraint_name(&self, table: &str) -> String {
        format!("FK_{}_{}", table, self.referenced_table)
    }

    /// Human-readable description, e.g. `ID_PAIS -> Entidad_Pais(ID_PAIS)`.
    pub fn describe(&self) -> String {
        format!(
            "{} -> {}({})",
            self.column, self.referenced_table, self.referenced_column
        )
    }
}

/// Schema for one table of the decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name (already normalized).
    pub name: String,
    /// Column names in DDL order.
    pub columns: Vec<String>,
    /// Single-column primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Outgoing foreign keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
    /// Declared type of every column.
    pub types: IndexMap<String, SqlType>,
}

impl TableSchema {
    /// Create a new empty table schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            types: IndexMap::new(),
        }
    }

    /// Append a column with its declared type.
    pub fn add_column(&mut self, name: impl Into<String>, sql_type: SqlType) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name.clone());
        }
        self.types.insert(name, sql_type);
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Declared type of a column.
    pub fn column_type(&self, name: &str) -> Option<SqlType> {
        self.types.get(name).copied()
    }

    /// Whether `name` is this table's primary key.
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_key.as_deref() == Some(name)
    }

    /// The foreign key declared on `column`, if any.
    pub fn foreign_key_for(&self, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.column == column)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
