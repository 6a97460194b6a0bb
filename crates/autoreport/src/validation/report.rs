//! Validation outcome types.

use serde::{Deserialize, Serialize};

/// Severity of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth reviewing; the data is still usable.
    Warning,
    /// The data fails validation.
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// One message produced by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    /// Name of the check that produced it.
    pub check: String,
    pub message: String,
}

impl Finding {
    pub fn warning(check: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            check: check.to_string(),
            message: message.into(),
        }
    }

    pub fn error(check: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            check: check.to_string(),
            message: message.into(),
        }
    }
}

/// Table-level numbers reported alongside the findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_rows: usize,
    pub total_columns: usize,
    /// Null-like cells across the whole table.
    pub missing_values: usize,
    pub duplicate_rows: usize,
    /// Approximate in-memory size of the cell data.
    pub memory_usage_mb: f64,
}

/// Result of validating one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False as soon as any error is recorded.
    pub passed: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    /// Fold findings into a report, keeping their order within each severity.
    pub fn from_findings(findings: Vec<Finding>, stats: ValidationStats) -> Self {
        let mut report = Self {
            passed: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            stats,
        };

        for finding in findings {
            match finding.severity {
                Severity::Warning => report.warnings.push(finding.message),
                Severity::Error => {
                    report.errors.push(finding.message);
                    report.passed = false;
                }
            }
        }

        report
    }

    /// Human-readable status used in report metadata.
    pub fn status_label(&self) -> &'static str {
        match (self.passed, self.warnings.is_empty()) {
            (false, _) => "Failed",
            (true, true) => "Passed",
            (true, false) => "Passed with warnings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_fail_report() {
        let report = ValidationReport::from_findings(
            vec![
                Finding::warning("duplicates", "w1"),
                Finding::error("negatives", "e1"),
                Finding::warning("years", "w2"),
            ],
            ValidationStats::default(),
        );

        assert!(!report.passed);
        assert_eq!(report.warnings, vec!["w1", "w2"]);
        assert_eq!(report.errors, vec!["e1"]);
        assert_eq!(report.status_label(), "Failed");
    }

    #[test]
    fn test_status_labels() {
        let clean = ValidationReport::from_findings(Vec::new(), ValidationStats::default());
        assert!(clean.passed);
        assert_eq!(clean.status_label(), "Passed");

        let warned = ValidationReport::from_findings(
            vec![Finding::warning("years", "old")],
            ValidationStats::default(),
        );
        assert_eq!(warned.status_label(), "Passed with warnings");
    }
}
