//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{normalize_header, Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
