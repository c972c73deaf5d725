//! Decomposition of flat rows into related tables.
//!
//! The [`DecompositionEngine`] extracts low-cardinality columns into
//! dependent entity tables linked to a main table by synthesized keys. The
//! [`SchemaReconciler`] then makes every foreign-key column agree on type
//! with the key it references.

mod config;
mod engine;
mod explode;
mod reconcile;

pub use config::DecompositionConfig;
pub use engine::{Decomposition, DecompositionEngine};
pub use explode::explode_rows;
pub use reconcile::{AlterColumn, Reconciliation, SchemaReconciler, TypeConflict};
