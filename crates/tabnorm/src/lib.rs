//! tabnorm: relational schema inference for denormalized tabular data.
//!
//! tabnorm reads a flat dataset (CSV/TSV, JSON rows, or a table fetched from
//! a remote service), infers column types and key candidates, splits
//! repeated categorical columns into dependent entity tables, reconciles
//! foreign-key types and renders the result as a T-SQL script.
//!
//! # Pipeline
//!
//! 1. [`input`] turns a source into a [`RowSet`].
//! 2. [`inference`] classifies columns and finds key candidates.
//! 3. [`decompose`] builds the [`SchemaGraph`] and reconciles foreign keys.
//! 4. [`sql`] and [`export`] render scripts, reports, bundles and graphs.
//!
//! # Example
//!
//! ```no_run
//! use tabnorm::Normalizer;
//!
//! let normalizer = Normalizer::new();
//! let result = normalizer.normalize_file("ventas.csv").unwrap();
//!
//! println!("Tables: {}", result.summary.tables);
//! println!("{}", result.sql);
//! ```

pub mod decompose;
pub mod error;
pub mod export;
pub mod inference;
pub mod input;
pub mod remote;
pub mod schema;
pub mod sql;

mod normalizer;

pub use crate::normalizer::{
    NormalizationResult, NormalizationSummary, Normalizer, NormalizerConfig,
};
pub use decompose::{Decomposition, Reconciliation};
pub use error::{NormalizeError, Result};
pub use input::{RowSet, SourceMetadata, Value};
pub use schema::{ForeignKey, SchemaGraph, SqlType, TableSchema};
