//! DDL statement builders.
//!
//! All identifiers pass through [`quote_identifier`], so names with spaces
//! or closing brackets are normalized and escaped the same way in every
//! statement that mentions them.

use crate::decompose::AlterColumn;
use crate::schema::{ForeignKey, SqlType, TableSchema, qualified_name, quote_identifier};

/// `CREATE TABLE` for one table, using its declared column types.
pub fn create_table(table: &TableSchema, schema: Option<&str>) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let sql_type = table
                .column_type(column)
                .unwrap_or(SqlType::Text { length: 50 });
            let nullability = if table.is_primary_key(column) {
                "NOT NULL"
            } else {
                "NULL"
            };
            format!("  {} {} {}", quote_identifier(column), sql_type, nullability)
        })
        .collect();

    if let Some(pk) = &table.primary_key {
        lines.push(format!(
            "  CONSTRAINT {} PRIMARY KEY ({})",
            quote_identifier(&format!("PK_{}", table.name)),
            quote_identifier(pk)
        ));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);\n",
        qualified_name(schema, &table.name),
        lines.join(",\n")
    )
}

/// `ALTER TABLE ... ALTER COLUMN` for a reconciled column.
pub fn alter_column(alter: &AlterColumn, schema: Option<&str>) -> String {
    format!(
        "ALTER TABLE {} ALTER COLUMN {} {} NULL;\n",
        qualified_name(schema, &alter.table),
        quote_identifier(&alter.column),
        alter.to
    )
}

/// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY`.
pub fn add_foreign_key(table: &str, foreign_key: &ForeignKey, schema: Option<&str>) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({});\n",
        qualified_name(schema, table),
        quote_identifier(&foreign_key.constraint_name(table)),
        quote_identifier(&foreign_key.column),
        qualified_name(schema, &foreign_key.referenced_table),
        quote_identifier(&foreign_key.referenced_column)
    )
}
