//! Input parsing and row-set handling.

mod parser;
mod source;
mod value;

pub use parser::{Parser, ParserConfig};
pub use source::{PREVIEW_ROWS, RowSet, SourceMetadata};
pub use value::{Value, format_number};
