//! HTML and Markdown report assembly.

mod builder;
mod metadata;
mod template;

pub use builder::{
    escape_html, markdown_to_html, render_html, ReportBuilder, DEFAULT_HTML_FILE,
    DEFAULT_MARKDOWN_FILE,
};
pub use metadata::ReportMetadata;
pub use template::REPORT_TITLE;
