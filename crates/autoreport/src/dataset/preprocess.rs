//! Load raw files and turn them into a cleaned [`SalesTable`].

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use super::record::{MileageBin, SalesTable, VehicleRecord, RECORD_COLUMNS};
use crate::error::{ReportError, Result};
use crate::input::{normalize_header, DataTable, Parser, SourceMetadata};
use crate::stats::quantile;

/// Numeric record fields, in the order they are imputed.
const NUMERIC_FIELDS: [&str; 5] = ["year", "engine_size_l", "mileage_km", "price_usd", "sales_volume"];

const YEAR: usize = 0;
const ENGINE_SIZE_L: usize = 1;
const MILEAGE_KM: usize = 2;
const PRICE_USD: usize = 3;
const SALES_VOLUME: usize = 4;

/// Row between parsing and imputation: numbers may still be missing.
#[derive(Debug, Clone)]
struct RawRecord {
    model: Option<String>,
    region: Option<String>,
    color: Option<String>,
    fuel_type: Option<String>,
    transmission: Option<String>,
    numeric: [Option<f64>; 5],
    extras: Vec<String>,
}

/// Imputation group: model, year, engine size, mileage and transmission.
type GroupKey = (String, u64, u64, u64, String);

impl RawRecord {
    /// Rows with any missing key column belong to no group.
    fn group_key(&self) -> Option<GroupKey> {
        Some((
            self.model.clone()?,
            key_bits(self.numeric[YEAR]?),
            key_bits(self.numeric[ENGINE_SIZE_L]?),
            key_bits(self.numeric[MILEAGE_KM]?),
            self.transmission.clone()?,
        ))
    }
}

fn key_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

/// Cleans raw tabular data into typed vehicle records.
pub struct Preprocessor {
    expected_columns: Vec<String>,
    parser: Parser,
}

impl Preprocessor {
    /// Create a preprocessor that insists on `expected_columns` being present.
    pub fn new(expected_columns: Vec<String>) -> Self {
        Self {
            expected_columns: expected_columns.iter().map(|c| normalize_header(c)).collect(),
            parser: Parser::new(),
        }
    }

    /// Use a custom parser.
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// Load a file from disk and clean it.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(SalesTable, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path)?;
        let cleaned = self.clean(&table)?;
        Ok((cleaned, source))
    }

    /// Check columns, coerce numbers, impute gaps and derive engine size and
    /// mileage bins.
    pub fn clean(&self, table: &DataTable) -> Result<SalesTable> {
        let missing: Vec<String> = self
            .expected_columns
            .iter()
            .map(String::as_str)
            .chain(RECORD_COLUMNS)
            .filter(|col| table.column_index(col).is_none())
            .fold(Vec::new(), |mut acc, col| {
                if !acc.iter().any(|c| c == col) {
                    acc.push(col.to_string());
                }
                acc
            });
        if !missing.is_empty() {
            return Err(ReportError::MissingColumns(missing));
        }

        let index = |name: &str| table.column_index(name).unwrap_or_default();
        let text_cols = [
            index("model"),
            index("region"),
            index("color"),
            index("fuel_type"),
            index("transmission"),
        ];
        let numeric_cols = NUMERIC_FIELDS.map(index);

        let extra_indices: Vec<usize> = (0..table.column_count())
            .filter(|i| !RECORD_COLUMNS.contains(&table.headers[*i].as_str()))
            .collect();
        let extra_headers: Vec<String> = extra_indices
            .iter()
            .map(|&i| table.headers[i].clone())
            .collect();

        let text = |row: usize, col: usize| {
            table
                .get(row, col)
                .filter(|v| !DataTable::is_null_value(v))
                .map(|v| v.to_string())
        };

        let mut raw: Vec<RawRecord> = (0..table.row_count())
            .map(|row| RawRecord {
                model: text(row, text_cols[0]),
                region: text(row, text_cols[1]),
                color: text(row, text_cols[2]),
                fuel_type: text(row, text_cols[3]),
                transmission: text(row, text_cols[4]),
                numeric: numeric_cols.map(|col| table.get(row, col).and_then(DataTable::parse_number)),
                extras: extra_indices
                    .iter()
                    .map(|&col| table.get(row, col).unwrap_or_default().to_string())
                    .collect(),
            })
            .collect();

        impute(&mut raw);

        let records = raw.into_iter().map(finish_record).collect();
        let cleaned = SalesTable::new(records, extra_headers);
        info!(rows = cleaned.len(), "Cleaned data");
        Ok(cleaned)
    }
}

/// Fill missing numbers: group median, then column median, then zero.
fn impute(rows: &mut [RawRecord]) {
    let keys: Vec<Option<GroupKey>> = rows.iter().map(RawRecord::group_key).collect();

    let mut groups: HashMap<&GroupKey, Vec<usize>> = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        if let Some(k) = key {
            groups.entry(k).or_default().push(i);
        }
    }

    for (field_idx, field) in NUMERIC_FIELDS.iter().enumerate() {
        let mut group_filled = 0usize;
        for members in groups.values() {
            let present: Vec<f64> = members
                .iter()
                .filter_map(|&i| rows[i].numeric[field_idx])
                .collect();
            if present.is_empty() || present.len() == members.len() {
                continue;
            }
            let median = quantile(&present, 0.5);
            for &i in members {
                if rows[i].numeric[field_idx].is_none() {
                    rows[i].numeric[field_idx] = Some(median);
                    group_filled += 1;
                }
            }
        }

        let present: Vec<f64> = rows.iter().filter_map(|r| r.numeric[field_idx]).collect();
        let fallback = if present.is_empty() { 0.0 } else { quantile(&present, 0.5) };
        let mut global_filled = 0usize;
        for row in rows.iter_mut() {
            if row.numeric[field_idx].is_none() {
                row.numeric[field_idx] = Some(fallback);
                global_filled += 1;
            }
        }

        if group_filled + global_filled > 0 {
            debug!(
                field,
                group_filled, global_filled, "Imputed missing values"
            );
        }
    }
}

fn finish_record(raw: RawRecord) -> VehicleRecord {
    let value = |idx: usize| raw.numeric[idx].unwrap_or(0.0);
    let engine_size_l = value(ENGINE_SIZE_L);
    let mileage_km = value(MILEAGE_KM);

    VehicleRecord {
        year: value(YEAR).trunc() as i32,
        engine_size_l,
        engine_size: engine_size_l.trunc() as i64,
        mileage_km,
        mileage_bin: MileageBin::from_km(mileage_km),
        price_usd: value(PRICE_USD),
        sales_volume: value(SALES_VOLUME),
        model: raw.model,
        region: raw.region,
        color: raw.color,
        fuel_type: raw.fuel_type,
        transmission: raw.transmission,
        extras: raw.extras,
    }
}
