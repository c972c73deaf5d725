//! Schema types for representing the inferred relational structure.

mod graph;
pub mod naming;
mod table;
mod types;

pub use graph::{Relation, SchemaGraph};
pub use naming::{names_match, normalize_identifier, qualified_name, quote_identifier, same_name};
pub use table::{ForeignKey, TableSchema};
pub use types::SqlType;
