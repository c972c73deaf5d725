//! T-SQL generation.

mod ddl;
mod generator;
mod literal;

pub use ddl::{add_foreign_key, alter_column, create_table};
pub use generator::{SqlConfig, SqlGenerator, effective_type};
pub use literal::{format_literal, quote_text, serial_to_datetime};
