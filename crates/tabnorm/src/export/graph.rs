//! Node/edge graph for external diagram renderers.

use serde::{Deserialize, Serialize};

use crate::schema::{ForeignKey, SchemaGraph};

/// Side length of the square that random node positions fall in.
pub const CANVAS_SIZE: f64 = 400.0;

/// A node position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One table as a diagram node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub table_name: String,
    pub columns: Vec<String>,
    pub primary_key: Option<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub position: Position,
}

/// One foreign key as a diagram edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

/// A regenerable view of a schema graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Builds [`VisualGraph`]s with random node placement.
#[derive(Debug)]
pub struct GraphBuilder {
    rng: fastrand::Rng,
}

impl GraphBuilder {
    /// Builder with an entropy-seeded generator.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Builder whose layout is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Map every table to a node and every foreign key to an edge.
    pub fn build(&mut self, graph: &SchemaGraph) -> VisualGraph {
        let nodes = graph
            .tables
            .values()
            .map(|table| GraphNode {
                id: table.name.clone(),
                table_name: table.name.clone(),
                columns: table.columns.clone(),
                primary_key: table.primary_key.clone(),
                foreign_keys: table.foreign_keys.clone(),
                position: Position {
                    x: self.rng.f64() * CANVAS_SIZE,
                    y: self.rng.f64() * CANVAS_SIZE,
                },
            })
            .collect();

        let edges = graph
            .relations()
            .into_iter()
            .map(|rel| GraphEdge {
                id: format!("{}_{}_{}", rel.source_table, rel.column, rel.target_table),
                source: rel.source_table,
                target: rel.target_table,
                label: rel.column,
            })
            .collect();

        VisualGraph { nodes, edges }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SqlType, TableSchema};

    fn graph() -> SchemaGraph {
        let mut main = TableSchema::new("Tabla_Principal");
        main.add_column("ID_Main", SqlType::Integer);
        main.add_column("ID_PAIS", SqlType::Integer);
        main.primary_key = Some("ID_Main".into());
        main.foreign_keys.push(ForeignKey::new("ID_PAIS", "Entidad_pais", "ID_PAIS"));

        let mut entity = TableSchema::new("Entidad_pais");
        entity.add_column("ID_PAIS", SqlType::Integer);
        entity.primary_key = Some("ID_PAIS".into());

        let mut graph = SchemaGraph::new();
        graph.add_table(main);
        graph.add_table(entity);
        graph
    }

    #[test]
    fn test_nodes_and_edges() {
        let visual = GraphBuilder::with_seed(7).build(&graph());
        assert_eq!(visual.nodes.len(), 2);
        assert_eq!(
            visual.edges,
            vec![GraphEdge {
                id: "Tabla_Principal_ID_PAIS_Entidad_pais".into(),
                source: "Tabla_Principal".into(),
                target: "Entidad_pais".into(),
                label: "ID_PAIS".into(),
            }]
        );
        for node in &visual.nodes {
            assert!((0.0..CANVAS_SIZE).contains(&node.position.x));
            assert!((0.0..CANVAS_SIZE).contains(&node.position.y));
        }
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let a = GraphBuilder::with_seed(42).build(&graph());
        let b = GraphBuilder::with_seed(42).build(&graph());
        assert_eq!(a, b);
    }

    #[test]
    fn test_camel_case_json() {
        let visual = GraphBuilder::with_seed(1).build(&graph());
        let json = serde_json::to_value(&visual).unwrap();
        assert_eq!(json["nodes"][0]["tableName"], "Tabla_Principal");
        assert_eq!(json["nodes"][0]["primaryKey"], "ID_Main");
    }

    #[test]
    fn test_empty_graph() {
        let visual = GraphBuilder::with_seed(1).build(&SchemaGraph::new());
        assert!(visual.nodes.is_empty());
        assert!(visual.edges.is_empty());
    }
}
