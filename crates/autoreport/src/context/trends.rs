//! Year-over-year trend calculations.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::dataset::VehicleRecord;
use crate::stats::{group_sums, top_n, RunningStats};

/// Direction of the overall sales trend, classified from CAGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Above +5% is increasing, below -5% decreasing.
    pub fn classify(cagr: f64) -> Self {
        if cagr > 0.05 {
            TrendDirection::Increasing
        } else if cagr < -0.05 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compound annual growth rate over a year-ordered series.
///
/// Zero when there are fewer than two points or the first value is not
/// positive.
pub fn cagr(series: &[(i32, f64)]) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0.0;
    };
    if series.len() < 2 || first.1 <= 0.0 {
        return 0.0;
    }
    let periods = (series.len() - 1) as f64;
    (last.1 / first.1).powf(1.0 / periods) - 1.0
}

/// Whole-period growth: `last / first - 1`, or zero when undefined.
pub fn period_growth(series: &[f64]) -> f64 {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 && *first > 0.0 => last / first - 1.0,
        _ => 0.0,
    }
}

/// Units sold and average price in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub units: f64,
    pub avg_price: f64,
}

/// Yearly history of one category value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTrend {
    pub item: String,
    /// Ascending by year.
    pub yearly: Vec<YearPoint>,
    /// Growth in units between the first and last year.
    pub growth: f64,
}

impl ItemTrend {
    pub fn start_price(&self) -> f64 {
        self.yearly.first().map_or(f64::NAN, |p| p.avg_price)
    }

    pub fn end_price(&self) -> f64 {
        self.yearly.last().map_or(f64::NAN, |p| p.avg_price)
    }
}

/// Yearly units and average price for the `n` best-selling values of `key`.
pub fn item_trends<K, F>(records: &[VehicleRecord], key: F, n: usize) -> Vec<ItemTrend>
where
    K: Ord + Clone + fmt::Display,
    F: Fn(&VehicleRecord) -> Option<K>,
{
    let sums = group_sums(records, &key, |r| r.sales_volume);

    top_n(&sums, n)
        .into_iter()
        .filter_map(|(item, _)| {
            let mut by_year: BTreeMap<i32, (f64, RunningStats)> = BTreeMap::new();
            for record in records.iter().filter(|r| key(r).as_ref() == Some(&item)) {
                let entry = by_year.entry(record.year).or_default();
                entry.0 += record.sales_volume;
                entry.1.push(record.price_usd);
            }
            if by_year.is_empty() {
                return None;
            }

            let yearly: Vec<YearPoint> = by_year
                .into_iter()
                .map(|(year, (units, prices))| YearPoint {
                    year,
                    units,
                    avg_price: prices.mean(),
                })
                .collect();
            let units: Vec<f64> = yearly.iter().map(|p| p.units).collect();

            Some(ItemTrend {
                item: item.to_string(),
                growth: period_growth(&units),
                yearly,
            })
        })
        .collect()
}
