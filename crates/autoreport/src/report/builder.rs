//! Assembles the narrative and charts into report files.

use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Event, Options, Parser};
use tracing::info;

use crate::error::{ReportError, Result};
use crate::visualization::PlotCollection;

use super::metadata::ReportMetadata;
use super::template;

pub const DEFAULT_HTML_FILE: &str = "report.html";
pub const DEFAULT_MARKDOWN_FILE: &str = "report.md";

/// Writes HTML and Markdown reports into one output directory.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    output_dir: PathBuf,
}

impl ReportBuilder {
    /// Create the builder, creating `output_dir` if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|e| ReportError::io(&output_dir, e))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render the full HTML report and write it to `file_name`
    /// (default `report.html`).
    pub fn build_html_report(
        &self,
        narrative: &str,
        plots: &PlotCollection,
        metadata: Option<&ReportMetadata>,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let html = render_html(narrative, plots, metadata);
        let path = self.output_dir.join(file_name.unwrap_or(DEFAULT_HTML_FILE));
        fs::write(&path, html).map_err(|e| ReportError::io(&path, e))?;
        info!(path = %path.display(), plots = plots.len(), "HTML report written");
        Ok(path)
    }

    /// Write the raw narrative to `file_name` (default `report.md`).
    pub fn save_markdown(&self, narrative: &str, file_name: Option<&str>) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name.unwrap_or(DEFAULT_MARKDOWN_FILE));
        fs::write(&path, narrative).map_err(|e| ReportError::io(&path, e))?;
        info!(path = %path.display(), "Markdown report written");
        Ok(path)
    }
}

/// The complete HTML document as a string.
pub fn render_html(
    narrative: &str,
    plots: &PlotCollection,
    metadata: Option<&ReportMetadata>,
) -> String {
    let default_metadata = ReportMetadata::default();
    let metadata = metadata.unwrap_or(&default_metadata);

    template::document(
        &metadata_section(metadata),
        &markdown_to_html(narrative),
        &plots_section(plots),
    )
}

/// Convert Markdown to HTML.
///
/// Raw HTML in the Markdown is emitted as text, so the narrative can never
/// close the containers around it.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

fn metadata_section(metadata: &ReportMetadata) -> String {
    let mut html = String::from("        <div class=\"metadata\">\n");
    for (label, value) in metadata.entries() {
        html.push_str(&format!(
            "            <p><strong>{}:</strong> {}</p>\n",
            label,
            escape_html(&value)
        ));
    }
    html.push_str("        </div>\n");
    html
}

fn plots_section(plots: &PlotCollection) -> String {
    let mut html = String::from("        <div class=\"visualizations\">\n        <h2>📊 Data Visualizations</h2>\n");
    for markup in plots.values() {
        html.push_str("        <div class=\"plot-container\">\n");
        html.push_str(markup);
        html.push_str("\n        </div>\n");
    }
    html.push_str("        </div>\n");
    html
}

/// Escape text for use in element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plots() -> PlotCollection {
        let mut plots = PlotCollection::new();
        plots.insert("plot1".into(), "<div>Plot1 HTML</div>".into());
        plots.insert("plot2".into(), "<div>Plot2 HTML</div>".into());
        plots
    }

    #[test]
    fn test_output_directory_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let builder = ReportBuilder::new(&nested).unwrap();
        assert!(builder.output_dir().is_dir());
    }

    #[test]
    fn test_build_html_report() {
        let dir = tempfile::tempdir().unwrap();
        let builder = ReportBuilder::new(dir.path()).unwrap();
        let metadata = ReportMetadata::new()
            .with_model("TestModel")
            .with_data_source("TestDataSource");

        let path = builder
            .build_html_report(
                "# Report Title\nThis is a **test** narrative with *markdown*.",
                &plots(),
                Some(&metadata),
                None,
            )
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "report.html");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<h1>Report Title</h1>"));
        assert!(content.contains("This is a <strong>test</strong> narrative"));
        assert_eq!(content.matches("<div class=\"plot-container\">").count(), 2);
        assert!(content.contains("<div>Plot1 HTML</div>"));
        assert!(content.contains("<div class=\"metadata\">"));
        assert!(content.contains("<strong>AI Model:</strong> TestModel"));
        assert!(content.contains("<strong>Data Source:</strong> TestDataSource"));
    }

    #[test]
    fn test_empty_inputs_still_complete() {
        let html = render_html("", &PlotCollection::new(), None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("<strong>AI Model:</strong> Unknown"));
        assert!(!html.contains("plot-container\">"));
    }

    #[test]
    fn test_metadata_escaped() {
        let metadata = ReportMetadata::new().with_data_source("<script>alert(1)</script>");
        let html = render_html("text", &PlotCollection::new(), Some(&metadata));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_narrative_html_is_inert() {
        let html = markdown_to_html("before\n\n</div></body>\n\ninline <b>bold</b>");
        assert!(!html.contains("</div>"));
        assert!(html.contains("&lt;/div&gt;"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_markdown_extensions() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_save_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let builder = ReportBuilder::new(dir.path()).unwrap();
        let narrative = "# Markdown Report\nThis is a **test** markdown.";
        let path = builder.save_markdown(narrative, None).unwrap();
        assert_eq!(path.file_name().unwrap(), "report.md");
        assert_eq!(fs::read_to_string(path).unwrap(), narrative);

        let custom = builder.save_markdown("x", Some("custom.md")).unwrap();
        assert!(custom.ends_with("custom.md"));
    }
}
