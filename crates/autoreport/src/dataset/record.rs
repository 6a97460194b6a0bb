//! Typed vehicle-sales records.

use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// Columns every input file must provide, in canonical order.
pub const RECORD_COLUMNS: [&str; 10] = [
    "model",
    "year",
    "region",
    "color",
    "fuel_type",
    "transmission",
    "engine_size_l",
    "mileage_km",
    "price_usd",
    "sales_volume",
];

/// Fixed mileage buckets, upper-inclusive: (0, 50k], (50k, 100k], ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MileageBin {
    UpTo50k,
    From50kTo100k,
    From100kTo150k,
    From150kTo200k,
}

impl MileageBin {
    /// All bins in ascending order.
    pub const ALL: [MileageBin; 4] = [
        MileageBin::UpTo50k,
        MileageBin::From50kTo100k,
        MileageBin::From100kTo150k,
        MileageBin::From150kTo200k,
    ];

    /// Bucket a mileage; zero, negative and >200k readings have no bin.
    pub fn from_km(km: f64) -> Option<Self> {
        match km {
            v if v > 0.0 && v <= 50_000.0 => Some(MileageBin::UpTo50k),
            v if v > 50_000.0 && v <= 100_000.0 => Some(MileageBin::From50kTo100k),
            v if v > 100_000.0 && v <= 150_000.0 => Some(MileageBin::From100kTo150k),
            v if v > 150_000.0 && v <= 200_000.0 => Some(MileageBin::From150kTo200k),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MileageBin::UpTo50k => "0-50k",
            MileageBin::From50kTo100k => "50k-100k",
            MileageBin::From100kTo150k => "100k-150k",
            MileageBin::From150kTo200k => "150k-200k",
        }
    }
}

/// One cleaned row of vehicle-sales data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub model: Option<String>,
    pub year: i32,
    pub region: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    /// Engine displacement in litres, as recorded.
    pub engine_size_l: f64,
    /// Engine displacement truncated to whole litres.
    pub engine_size: i64,
    pub mileage_km: f64,
    pub mileage_bin: Option<MileageBin>,
    pub price_usd: f64,
    pub sales_volume: f64,
    /// Cells of any columns beyond the record fields, in `SalesTable::extra_headers` order.
    #[serde(skip)]
    pub extras: Vec<String>,
}

impl VehicleRecord {
    /// Revenue contributed by this row.
    pub fn revenue(&self) -> f64 {
        self.price_usd * self.sales_volume
    }
}

/// Columns computed during cleaning, appended after the input columns.
pub const DERIVED_COLUMNS: [&str; 2] = ["engine_size", "mileage_bin"];

/// Cleaned vehicle-sales table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    pub records: Vec<VehicleRecord>,
    /// Input columns that are not record fields, kept for validation.
    pub extra_headers: Vec<String>,
}

impl SalesTable {
    pub fn new(records: Vec<VehicleRecord>, extra_headers: Vec<String>) -> Self {
        Self {
            records,
            extra_headers,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of columns the table renders to, derived ones included.
    pub fn column_count(&self) -> usize {
        RECORD_COLUMNS.len() + self.extra_headers.len() + DERIVED_COLUMNS.len()
    }

    /// Keep only records matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&VehicleRecord) -> bool) -> SalesTable {
        SalesTable {
            records: self.records.iter().filter(|r| predicate(r)).cloned().collect(),
            extra_headers: self.extra_headers.clone(),
        }
    }

    /// Render back into an untyped table: record columns, extra columns,
    /// then the derived `engine_size` and `mileage_bin`.
    pub fn to_data_table(&self) -> DataTable {
        let mut headers: Vec<String> = RECORD_COLUMNS.iter().map(|c| c.to_string()).collect();
        headers.extend(self.extra_headers.iter().cloned());
        headers.extend(DERIVED_COLUMNS.iter().map(|c| c.to_string()));

        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        let rows = self
            .records
            .iter()
            .map(|r| {
                let mut row = vec![
                    text(&r.model),
                    r.year.to_string(),
                    text(&r.region),
                    text(&r.color),
                    text(&r.fuel_type),
                    text(&r.transmission),
                    r.engine_size_l.to_string(),
                    r.mileage_km.to_string(),
                    r.price_usd.to_string(),
                    r.sales_volume.to_string(),
                ];
                row.extend(r.extras.iter().cloned());
                row.push(r.engine_size.to_string());
                row.push(r.mileage_bin.map(|b| b.label().to_string()).unwrap_or_default());
                row
            })
            .collect();

        DataTable::new(headers, rows)
    }
}
