//! Individual data-quality checks.

use std::collections::HashSet;

use crate::dataset::DERIVED_COLUMNS;
use crate::input::DataTable;

use super::report::Finding;
use super::validator::ValidationConfig;

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-null cell parses as a number.
    Numeric,
    Categorical,
}

/// Per-column facts shared by all checks.
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    /// Parsed cells, `None` where null or unparseable.
    pub numbers: Vec<Option<f64>>,
}

/// Facts about a table computed once before the checks run.
#[derive(Debug, Clone)]
pub struct TableProfile {
    pub row_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub duplicate_rows: usize,
}

impl TableProfile {
    pub fn build(table: &DataTable) -> Self {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut missing = 0;
                let mut all_numeric = true;
                let numbers = table
                    .column_values(idx)
                    .map(|value| {
                        if DataTable::is_null_value(value) {
                            missing += 1;
                            return None;
                        }
                        let parsed = DataTable::parse_number(value);
                        if parsed.is_none() {
                            all_numeric = false;
                        }
                        parsed
                    })
                    .collect();

                ColumnProfile {
                    name: name.clone(),
                    kind: if all_numeric { ColumnKind::Numeric } else { ColumnKind::Categorical },
                    missing,
                    numbers,
                }
            })
            .collect();

        let mut seen: HashSet<&Vec<String>> = HashSet::with_capacity(table.row_count());
        let duplicate_rows = table.rows.iter().filter(|row| !seen.insert(*row)).count();

        Self {
            row_count: table.row_count(),
            columns,
            duplicate_rows,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn missing_values(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }
}

/// A single validation rule.
pub trait Check: Send + Sync {
    /// Short identifier recorded on each finding.
    fn name(&self) -> &'static str;

    /// Inspect the table and report findings.
    fn run(&self, table: &DataTable, profile: &TableProfile, config: &ValidationConfig) -> Vec<Finding>;
}

/// Rows identical to an earlier row.
pub struct DuplicateRowCheck;

impl Check for DuplicateRowCheck {
    fn name(&self) -> &'static str {
        "duplicate_rows"
    }

    fn run(&self, _table: &DataTable, profile: &TableProfile, _config: &ValidationConfig) -> Vec<Finding> {
        if profile.duplicate_rows == 0 {
            return Vec::new();
        }
        vec![Finding::warning(
            self.name(),
            format!("Found {} duplicate rows", profile.duplicate_rows),
        )]
    }
}

/// Negative values in columns that must never be negative.
pub struct NegativeValueCheck;

impl Check for NegativeValueCheck {
    fn name(&self) -> &'static str {
        "negative_values"
    }

    fn run(&self, _table: &DataTable, profile: &TableProfile, config: &ValidationConfig) -> Vec<Finding> {
        profile
            .columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .filter(|c| config.non_negative_columns.iter().any(|p| *p == c.name))
            .filter_map(|c| {
                let negatives = c.numbers.iter().flatten().filter(|v| **v < 0.0).count();
                (negatives > 0).then(|| {
                    Finding::error(self.name(), format!("{} has {} negative values", c.name, negatives))
                })
            })
            .collect()
    }
}

/// Model years outside the plausible range.
pub struct YearRangeCheck;

impl Check for YearRangeCheck {
    fn name(&self) -> &'static str {
        "year_range"
    }

    fn run(&self, _table: &DataTable, profile: &TableProfile, config: &ValidationConfig) -> Vec<Finding> {
        let Some(year) = profile.column("year") else {
            return Vec::new();
        };
        let (min, max) = config.year_range;
        let outside = year
            .numbers
            .iter()
            .flatten()
            .filter(|y| **y < min as f64 || **y > max as f64)
            .count();

        if outside == 0 {
            return Vec::new();
        }
        vec![Finding::warning(
            self.name(),
            format!("Found {} rows with unrealistic years", outside),
        )]
    }
}

/// Prices outside the expected market band.
pub struct PriceRangeCheck;

impl Check for PriceRangeCheck {
    fn name(&self) -> &'static str {
        "price_range"
    }

    fn run(&self, _table: &DataTable, profile: &TableProfile, config: &ValidationConfig) -> Vec<Finding> {
        let Some(price) = profile.column("price_usd") else {
            return Vec::new();
        };
        let (low, high) = config.price_range;
        let outside = price
            .numbers
            .iter()
            .flatten()
            .filter(|p| **p < low || **p > high)
            .count();

        if outside == 0 {
            return Vec::new();
        }
        vec![Finding::warning(
            self.name(),
            format!(
                "Found {} rows with unusual prices (< ${} or > ${})",
                outside,
                thousands_label(low),
                thousands_label(high)
            ),
        )]
    }
}

/// Columns where most cells are missing.
pub struct MissingValueCheck;

impl Check for MissingValueCheck {
    fn name(&self) -> &'static str {
        "missing_values"
    }

    fn run(&self, _table: &DataTable, profile: &TableProfile, config: &ValidationConfig) -> Vec<Finding> {
        if profile.row_count == 0 {
            return Vec::new();
        }

        let heavy: Vec<String> = profile
            .columns
            .iter()
            .filter_map(|c| {
                let pct = c.missing as f64 / profile.row_count as f64 * 100.0;
                (pct > config.missing_threshold_pct).then(|| format!("{}: {:.1}", c.name, pct))
            })
            .collect();

        if heavy.is_empty() {
            return Vec::new();
        }
        vec![Finding::warning(
            self.name(),
            format!(
                "Columns with >{}% missing: {{{}}}",
                config.missing_threshold_pct,
                heavy.join(", ")
            ),
        )]
    }
}

/// Categorical columns with suspiciously many distinct values.
pub struct CardinalityCheck;

impl Check for CardinalityCheck {
    fn name(&self) -> &'static str {
        "cardinality"
    }

    fn run(&self, table: &DataTable, profile: &TableProfile, config: &ValidationConfig) -> Vec<Finding> {
        let limit = profile.row_count as f64 * config.cardinality_ratio;

        profile
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == ColumnKind::Categorical)
            // Bin labels come from a fixed set, not free text.
            .filter(|(_, c)| !DERIVED_COLUMNS.contains(&c.name.as_str()))
            .filter_map(|(idx, c)| {
                let unique: HashSet<&str> = table
                    .column_values(idx)
                    .filter(|v| !DataTable::is_null_value(v))
                    .collect();
                (unique.len() as f64 > limit).then(|| {
                    Finding::warning(
                        self.name(),
                        format!(
                            "{} has high cardinality ({} unique values) - check for typos",
                            c.name,
                            unique.len()
                        ),
                    )
                })
            })
            .collect()
    }
}

/// `10000.0` -> `10k`, `12500.0` -> `12.5k`, `750.0` -> `750`.
fn thousands_label(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{}k", value / 1000.0)
    } else {
        format!("{}", value)
    }
}
