//! Table validation and business-rule enforcement.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::SalesTable;
use crate::input::DataTable;

use super::checks::{
    CardinalityCheck, Check, DuplicateRowCheck, MissingValueCheck, NegativeValueCheck,
    PriceRangeCheck, TableProfile, YearRangeCheck,
};
use super::report::{Severity, ValidationReport, ValidationStats};

/// Thresholds used by the checks and the business rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Numeric columns in which any negative value is an error.
    pub non_negative_columns: Vec<String>,
    /// Plausible model years, inclusive.
    pub year_range: (i32, i32),
    /// Expected price band in USD, inclusive.
    pub price_range: (f64, f64),
    /// Warn when a column is missing more than this share of cells.
    pub missing_threshold_pct: f64,
    /// Warn when a categorical column's distinct values exceed this share of rows.
    pub cardinality_ratio: f64,
    /// Oldest model year kept by the business rules.
    pub min_business_year: i32,
    /// Newest model year kept; `None` means the current calendar year.
    pub max_business_year: Option<i32>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            non_negative_columns: vec![
                "price_usd".to_string(),
                "sales_volume".to_string(),
                "mileage_km".to_string(),
            ],
            year_range: (1900, 2030),
            price_range: (10_000.0, 800_000.0),
            missing_threshold_pct: 50.0,
            cardinality_ratio: 0.5,
            min_business_year: 1980,
            max_business_year: None,
        }
    }
}

/// Runs data-quality checks and applies business rules.
pub struct DataValidator {
    config: ValidationConfig,
    checks: Vec<Box<dyn Check>>,
}

impl DataValidator {
    /// Create a validator with default thresholds and every check enabled.
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            checks: vec![
                Box::new(DuplicateRowCheck),
                Box::new(NegativeValueCheck),
                Box::new(YearRangeCheck),
                Box::new(PriceRangeCheck),
                Box::new(MissingValueCheck),
                Box::new(CardinalityCheck),
            ],
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a table without modifying it.
    pub fn validate(&self, table: &DataTable) -> ValidationReport {
        let profile = TableProfile::build(table);

        let findings: Vec<_> = self
            .checks
            .iter()
            .flat_map(|check| check.run(table, &profile, &self.config))
            .collect();

        for finding in findings.iter().filter(|f| f.severity == Severity::Warning) {
            warn!(check = %finding.check, "{}", finding.message);
        }

        let stats = ValidationStats {
            total_rows: table.row_count(),
            total_columns: table.column_count(),
            missing_values: profile.missing_values(),
            duplicate_rows: profile.duplicate_rows,
            memory_usage_mb: estimate_memory_mb(table),
        };

        let report = ValidationReport::from_findings(findings, stats);
        info!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validation complete"
        );
        report
    }

    /// Keep rows with a positive price, non-negative sales volume and a model
    /// year inside the business window.
    pub fn enforce_business_rules(&self, table: &SalesTable) -> SalesTable {
        let min_year = self.config.min_business_year;
        let max_year = self
            .config
            .max_business_year
            .unwrap_or_else(|| Local::now().year());

        let kept = table.filter(|r| {
            r.price_usd > 0.0 && r.sales_volume >= 0.0 && r.year >= min_year && r.year <= max_year
        });

        let removed = table.len() - kept.len();
        if removed > 0 {
            info!(removed, "Removed invalid records after business rule enforcement");
        }
        kept
    }
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Cell bytes plus per-cell string overhead, in MiB.
fn estimate_memory_mb(table: &DataTable) -> f64 {
    let cell_overhead = std::mem::size_of::<String>();
    let header_bytes: usize = table.headers.iter().map(|h| h.len() + cell_overhead).sum();
    let cell_bytes: usize = table
        .rows
        .iter()
        .flat_map(|row| row.iter())
        .map(|cell| cell.len() + cell_overhead)
        .sum();
    (header_bytes + cell_bytes) as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{MileageBin, VehicleRecord};

    const HEADERS: [&str; 7] = [
        "model",
        "year",
        "region",
        "fuel_type",
        "mileage_km",
        "price_usd",
        "sales_volume",
    ];

    fn sample_rows() -> Vec<Vec<String>> {
        [
            ["7 Series", "2010", "North America", "Petrol", "50000", "50000", "100"],
            ["5 Series", "1995", "Europe", "Diesel", "100000", "10000", "50"],
            ["3 Series", "2020", "Asia", "Petrol", "150000", "20000", "500"],
            ["7 Series", "1980", "North America", "Diesel", "200000", "35000", "600"],
            ["5 Series", "2022", "Europe", "Petrol", "300000", "100000", "1500"],
            ["3 Series", "1989", "Asia", "Diesel", "250000", "80000", "200"],
        ]
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
    }

    fn sample_table() -> DataTable {
        DataTable::new(HEADERS.iter().map(|h| h.to_string()).collect(), sample_rows())
    }

    fn set(table: &mut DataTable, row: usize, col: &str, value: &str) {
        let idx = table.column_index(col).unwrap();
        table.rows[row][idx] = value.to_string();
    }

    fn record(year: i32, price: f64, sales: f64) -> VehicleRecord {
        VehicleRecord {
            model: Some("Z".to_string()),
            year,
            region: Some("NA".to_string()),
            color: None,
            fuel_type: Some("Gas".to_string()),
            transmission: None,
            engine_size_l: 2.0,
            engine_size: 2,
            mileage_km: 100_000.0,
            mileage_bin: MileageBin::from_km(100_000.0),
            price_usd: price,
            sales_volume: sales,
            extras: Vec::new(),
        }
    }

    #[test]
    fn test_clean_data_passes() {
        let table = sample_table();
        let report = DataValidator::new().validate(&table);

        assert!(report.passed);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.stats.total_rows, 6);
        assert_eq!(report.stats.total_columns, 7);
        assert!(report.stats.memory_usage_mb > 0.0);
    }

    #[test]
    fn test_duplicate_rows_warn() {
        let mut table = sample_table();
        table.rows.push(table.rows[0].clone());

        let report = DataValidator::new().validate(&table);
        assert!(report.warnings.contains(&"Found 1 duplicate rows".to_string()));
        assert!(report.passed);
        assert_eq!(report.stats.duplicate_rows, 1);
    }

    #[test]
    fn test_negative_values_are_errors() {
        let mut table = sample_table();
        set(&mut table, 0, "price_usd", "-1000");
        set(&mut table, 1, "sales_volume", "-5");
        set(&mut table, 2, "mileage_km", "-1");
        let before = table.clone();

        let report = DataValidator::new().validate(&table);

        assert!(report.errors.contains(&"price_usd has 1 negative values".to_string()));
        assert!(report.errors.contains(&"sales_volume has 1 negative values".to_string()));
        assert!(report.errors.contains(&"mileage_km has 1 negative values".to_string()));
        assert_eq!(report.errors.len(), 3);
        assert!(!report.passed);
        assert_eq!(table, before);
    }

    #[test]
    fn test_unrealistic_year_warns() {
        let mut table = sample_table();
        set(&mut table, 0, "year", "2035");

        let report = DataValidator::new().validate(&table);
        assert!(report.warnings.contains(&"Found 1 rows with unrealistic years".to_string()));
        assert!(report.passed);
    }

    #[test]
    fn test_price_outliers_warn() {
        let mut table = sample_table();
        set(&mut table, 0, "price_usd", "500");
        set(&mut table, 1, "price_usd", "950000");

        let report = DataValidator::new().validate(&table);
        assert!(report
            .warnings
            .contains(&"Found 2 rows with unusual prices (< $10k or > $800k)".to_string()));
        assert!(report.passed);
    }

    #[test]
    fn test_high_missing_percentage_warns() {
        let table = DataTable::new(
            vec!["price_usd".to_string(), "critical_col".to_string()],
            vec![
                vec!["10000".into(), "1".into()],
                vec!["20000".into(), "2".into()],
                vec!["".into(), "".into()],
                vec!["40000".into(), "".into()],
                vec!["50000".into(), "".into()],
            ],
        );

        let report = DataValidator::new().validate(&table);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Columns with >50% missing"));
        assert!(report.warnings[0].contains("critical_col: 60.0"));
        assert!(!report.warnings[0].contains("price_usd"));
        assert!(report.passed);
    }

    #[test]
    fn test_high_cardinality_warns() {
        let ids = ["ID_0", "ID_1", "ID_2", "ID_3", "ID_4", "ID_5", "ID_6", "ID_0", "ID_1", "ID_2"];
        let rows = ids
            .iter()
            .enumerate()
            .map(|(i, id)| vec![id.to_string(), i.to_string(), "X".to_string()])
            .collect();
        let table = DataTable::new(
            vec!["unique_id".into(), "row_sequence".into(), "category".into()],
            rows,
        );

        let report = DataValidator::new().validate(&table);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("unique_id has high cardinality (7 unique values)"));
        assert!(report.passed);
    }

    #[test]
    fn test_business_rules_remove_invalid_rows() {
        let current = Local::now().year();
        let table = SalesTable::new(
            vec![
                record(2020, 30_000.0, 10.0),
                record(2020, -500.0, 300.0),
                record(2020, 50_000.0, -10.0),
                record(1979, 30_000.0, 200.0),
                record(current + 1, 30_000.0, 200.0),
                record(1980, 30_000.0, 0.0),
                record(current, 1.0, 1.0),
            ],
            Vec::new(),
        );

        let kept = DataValidator::new().enforce_business_rules(&table);

        assert_eq!(kept.len(), 3);
        assert!(kept.records.iter().all(|r| r.price_usd > 0.0));
        assert!(kept.records.iter().all(|r| r.sales_volume >= 0.0));
        assert!(kept.records.iter().all(|r| r.year >= 1980 && r.year <= current));
    }

    #[test]
    fn test_business_year_cap_is_configurable() {
        let config = ValidationConfig {
            max_business_year: Some(2015),
            ..ValidationConfig::default()
        };
        let table = SalesTable::new(
            vec![record(2014, 1.0, 1.0), record(2016, 1.0, 1.0)],
            Vec::new(),
        );

        let kept = DataValidator::with_config(config).enforce_business_rules(&table);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.records[0].year, 2014);
    }
}
