//! Foreign-key type unification.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::inference::{TypeInferencer, TypeOverrides};
use crate::schema::{ForeignKey, SqlType};

use super::engine::Decomposition;

/// A column whose type must change after CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterColumn {
    pub table: String,
    pub column: String,
    pub from: SqlType,
    pub to: SqlType,
}

/// A foreign key whose column and referenced key could not be unified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeConflict {
    pub table: String,
    pub foreign_key: ForeignKey,
    pub column_type: SqlType,
    pub referenced_type: SqlType,
}

impl fmt::Display for TypeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} ({}) cannot reference {}.{} ({}); foreign key skipped",
            self.table,
            self.foreign_key.column,
            self.column_type,
            self.foreign_key.referenced_table,
            self.foreign_key.referenced_column,
            self.referenced_type
        )
    }
}

/// Outcome of reconciling one decomposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    /// ALTER COLUMN statements to emit before the foreign keys.
    pub alters: Vec<AlterColumn>,
    /// Foreign keys left out of the DDL.
    pub conflicts: Vec<TypeConflict>,
}

impl Reconciliation {
    /// Whether the foreign key on `table` was skipped.
    pub fn is_skipped(&self, table: &str, foreign_key: &ForeignKey) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.table == table && &c.foreign_key == foreign_key)
    }

    /// Human-readable diagnostics, one per skipped foreign key.
    pub fn diagnostics(&self) -> Vec<String> {
        self.conflicts.iter().map(|c| c.to_string()).collect()
    }
}

/// Unifies each foreign-key column type with the key it references.
#[derive(Debug, Clone, Default)]
pub struct SchemaReconciler {
    inferencer: TypeInferencer,
}

impl SchemaReconciler {
    /// Create a reconciler with default inference settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler sharing an inferencer's settings.
    pub fn with_inferencer(inferencer: TypeInferencer) -> Self {
        Self { inferencer }
    }

    /// Reconcile every foreign key of a decomposition.
    ///
    /// Referenced keys get their declared type updated in place. Type
    /// changes on referencing columns are recorded in `overrides` and
    /// returned as [`AlterColumn`]s; the CREATE TABLE types stay as they
    /// were declared.
    pub fn reconcile(
        &self,
        decomposition: &mut Decomposition,
        overrides: &mut TypeOverrides,
    ) -> Reconciliation {
        let mut result = Reconciliation::default();

        let edges: Vec<(String, ForeignKey)> = decomposition
            .graph
            .tables
            .values()
            .flat_map(|t| t.foreign_keys.iter().map(move |fk| (t.name.clone(), fk.clone())))
            .collect();

        for (table, fk) in edges {
            let c_values = decomposition.column_values(&table, &fk.column);
            let p_values = decomposition.column_values(&fk.referenced_table, &fk.referenced_column);

            let c_declared = declared_type(decomposition, &table, &fk.column);
            let p_declared = declared_type(decomposition, &fk.referenced_table, &fk.referenced_column);

            let c_type = overrides
                .get(&fk.column)
                .unwrap_or_else(|| widen(self.inferencer.infer(&c_values), c_declared));

            let union: Vec<&str> = p_values
                .iter()
                .chain(c_values.iter())
                .map(String::as_str)
                .collect();
            let p_type = overrides
                .get(&fk.referenced_column)
                .unwrap_or_else(|| widen(self.inferencer.infer(&union), p_declared));

            if let Some(target) = decomposition.graph.table_mut(&fk.referenced_table) {
                if target.has_column(&fk.referenced_column) {
                    target.add_column(fk.referenced_column.clone(), p_type);
                }
            }

            let mut final_type = c_type;
            if c_type != p_type && !overrides.is_pinned(&fk.column) {
                let unified = self.inferencer.infer(&union);
                final_type = if unified.is_within(&p_type) { p_type } else { unified };
            }

            // CREATE TABLE used the declared type; anything else needs an ALTER
            if let Some(from) = c_declared.filter(|declared| *declared != final_type) {
                debug!(
                    table = %table,
                    column = %fk.column,
                    from = %from,
                    to = %final_type,
                    "Unifying foreign key type"
                );
                overrides.record(fk.column.clone(), final_type);
                result.alters.push(AlterColumn {
                    table: table.clone(),
                    column: fk.column.clone(),
                    from,
                    to: final_type,
                });
            }

            if final_type != p_type {
                let conflict = TypeConflict {
                    table: table.clone(),
                    foreign_key: fk.clone(),
                    column_type: final_type,
                    referenced_type: p_type,
                };
                warn!("{}", conflict);
                result.conflicts.push(conflict);
            }
        }

        result
    }
}

fn declared_type(decomposition: &Decomposition, table: &str, column: &str) -> Option<SqlType> {
    decomposition
        .graph
        .table(table)
        .and_then(|t| t.column_type(column))
}

/// Keep the declared type when the inferred one fits inside it.
fn widen(inferred: SqlType, declared: Option<SqlType>) -> SqlType {
    match declared {
        Some(declared) if inferred.is_within(&declared) => declared,
        _ => inferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::DecompositionEngine;
    use crate::input::{RowSet, Value};
    use crate::schema::{SchemaGraph, TableSchema};
    use indexmap::IndexMap;

    /// Orders reference customers by a code that is numeric in the order
    /// rows but alphanumeric in the customer table.
    fn mixed_key_decomposition() -> Decomposition {
        let mut orders = TableSchema::new("Pedido");
        orders.add_column("ID_Pedido", SqlType::Integer);
        orders.add_column("cliente", SqlType::Integer);
        orders.primary_key = Some("ID_Pedido".into());
        orders
            .foreign_keys
            .push(ForeignKey::new("cliente", "Cliente", "codigo"));

        let mut customers = TableSchema::new("Cliente");
        customers.add_column("codigo", SqlType::Text { length: 50 });
        customers.primary_key = Some("codigo".into());

        let mut graph = SchemaGraph::new();
        graph.add_table(orders);
        graph.add_table(customers);

        let mut data = IndexMap::new();
        data.insert(
            "Pedido".to_string(),
            RowSet::new(
                vec!["ID_Pedido".into(), "cliente".into()],
                vec![
                    vec![Value::from("1"), Value::from("10")],
                    vec![Value::from("2"), Value::from("20")],
                ],
            ),
        );
        data.insert(
            "Cliente".to_string(),
            RowSet::new(
                vec!["codigo".into()],
                vec![vec![Value::from("10")], vec![Value::from("20")], vec![Value::from("C-30")]],
            ),
        );

        Decomposition {
            graph,
            data,
            ..Decomposition::default()
        }
    }

    #[test]
    fn test_integer_vs_text_unifies_to_text() {
        let mut decomposition = mixed_key_decomposition();
        let mut overrides = TypeOverrides::default();
        let result = SchemaReconciler::new().reconcile(&mut decomposition, &mut overrides);

        assert_eq!(
            result.alters,
            vec![AlterColumn {
                table: "Pedido".into(),
                column: "cliente".into(),
                from: SqlType::Integer,
                to: SqlType::Text { length: 50 },
            }]
        );
        assert!(result.conflicts.is_empty());
        assert_eq!(overrides.get("cliente"), Some(SqlType::Text { length: 50 }));
        // CREATE TABLE keeps the declared type
        assert_eq!(
            decomposition.graph.table("Pedido").unwrap().column_type("cliente"),
            Some(SqlType::Integer)
        );
    }

    #[test]
    fn test_pinned_column_conflict_skips_foreign_key() {
        let mut decomposition = mixed_key_decomposition();
        let mut pinned = IndexMap::new();
        pinned.insert("cliente".to_string(), SqlType::Integer);
        let mut overrides = TypeOverrides::new(pinned);

        let result = SchemaReconciler::new().reconcile(&mut decomposition, &mut overrides);

        assert!(result.alters.is_empty());
        assert_eq!(result.conflicts.len(), 1);
        let fk = ForeignKey::new("cliente", "Cliente", "codigo");
        assert!(result.is_skipped("Pedido", &fk));
        assert!(result.diagnostics()[0].contains("foreign key skipped"));
    }

    #[test]
    fn test_pinned_column_differing_from_declared_gets_altered() {
        let mut decomposition = mixed_key_decomposition();
        let mut pinned = IndexMap::new();
        pinned.insert("cliente".to_string(), SqlType::Text { length: 50 });
        let mut overrides = TypeOverrides::new(pinned);

        let result = SchemaReconciler::new().reconcile(&mut decomposition, &mut overrides);

        assert_eq!(
            result.alters,
            vec![AlterColumn {
                table: "Pedido".into(),
                column: "cliente".into(),
                from: SqlType::Integer,
                to: SqlType::Text { length: 50 },
            }]
        );
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_pinned_synthesized_key_keeps_both_sides_aligned() {
        let rows = RowSet::new(
            vec!["n".into(), "country".into()],
            vec![
                vec![Value::from("1"), Value::from("US")],
                vec![Value::from("2"), Value::from("US")],
                vec![Value::from("3"), Value::from("MX")],
            ],
        );
        let mut pinned = IndexMap::new();
        pinned.insert("ID_COUNTRY".to_string(), SqlType::Text { length: 50 });
        let mut overrides = TypeOverrides::new(pinned);

        let mut decomposition = DecompositionEngine::new().decompose(&rows, &overrides).unwrap();
        let result = SchemaReconciler::new().reconcile(&mut decomposition, &mut overrides);

        let main = decomposition.graph.table("Tabla_Principal").unwrap();
        let entity = decomposition.graph.table("Entidad_country").unwrap();
        assert_eq!(main.column_type("ID_COUNTRY"), Some(SqlType::Text { length: 50 }));
        assert_eq!(entity.column_type("ID_COUNTRY"), Some(SqlType::Text { length: 50 }));
        assert_eq!(result, Reconciliation::default());
    }

    #[test]
    fn test_synthesized_keys_need_no_changes() {
        let rows = RowSet::new(
            vec!["n".into(), "color".into()],
            vec![
                vec![Value::from("1"), Value::from("red")],
                vec![Value::from("2"), Value::from("red")],
                vec![Value::from("3"), Value::from("blue")],
            ],
        );
        let mut overrides = TypeOverrides::default();
        let mut decomposition = DecompositionEngine::new().decompose(&rows, &overrides).unwrap();
        let result = SchemaReconciler::new().reconcile(&mut decomposition, &mut overrides);

        assert_eq!(result, Reconciliation::default());
        let entity = decomposition.graph.table("Entidad_color").unwrap();
        assert_eq!(entity.column_type("ID_COLOR"), Some(SqlType::Integer));
    }

    #[test]
    fn test_single_entity_row_keeps_integer_key() {
        let rows = RowSet::new(
            vec!["n".into(), "flag".into()],
            vec![
                vec![Value::from("1"), Value::from("x")],
                vec![Value::from("2"), Value::from("x")],
            ],
        );
        let mut overrides = TypeOverrides::default();
        let mut decomposition = DecompositionEngine::new().decompose(&rows, &overrides).unwrap();
        SchemaReconciler::new().reconcile(&mut decomposition, &mut overrides);

        let entity = decomposition.graph.table("Entidad_flag").unwrap();
        assert_eq!(entity.column_type("ID_FLAG"), Some(SqlType::Integer));
    }
}
