//! Data-quality validation and business-rule filtering.

mod checks;
mod report;
mod validator;

pub use checks::{Check, ColumnKind, ColumnProfile, TableProfile};
pub use report::{Finding, Severity, ValidationReport, ValidationStats};
pub use validator::{DataValidator, ValidationConfig};
