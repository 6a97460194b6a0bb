//! Banner information shown at the top of a report.

use chrono::Local;
use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "Unknown";

/// Optional facts about a report run. Missing fields render with defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: Option<String>,
    pub model_name: Option<String>,
    pub data_source: Option<String>,
    pub total_records: Option<usize>,
    pub validation_status: Option<String>,
}

impl ReportMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    pub fn with_data_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = Some(source.into());
        self
    }

    pub fn with_total_records(mut self, total: usize) -> Self {
        self.total_records = Some(total);
        self
    }

    pub fn with_validation_status(mut self, status: impl Into<String>) -> Self {
        self.validation_status = Some(status.into());
        self
    }

    /// Label/value pairs in display order, defaults filled in.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            (
                "Report Generated",
                self.generated_at
                    .clone()
                    .unwrap_or_else(|| Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
            ("AI Model", self.model_name.clone().unwrap_or_else(|| UNKNOWN.to_string())),
            ("Data Source", self.data_source.clone().unwrap_or_else(|| UNKNOWN.to_string())),
        ];
        if let Some(total) = self.total_records {
            entries.push(("Total Records", total.to_string()));
        }
        if let Some(ref status) = self.validation_status {
            entries.push(("Validation Status", status.clone()));
        }
        entries
    }
}
