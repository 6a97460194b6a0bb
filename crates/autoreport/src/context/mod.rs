//! Statistical context extraction for the narrative prompt.
//!
//! [`LlmContext::from_table`] computes every aggregate from a cleaned
//! [`SalesTable`]; its `Display` impl renders them as the text block the
//! language model receives. Both steps are pure, so the same table always
//! yields byte-identical text.

mod format;
mod render;
mod trends;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::dataset::{SalesTable, VehicleRecord};
use crate::stats::{group_sums, group_values, pearson, top_n, ColumnSummary, FloatKey, RunningStats};

pub use format::{grouped, money, percent, signed_percent, NOT_AVAILABLE};
pub use trends::{cagr, item_trends, period_growth, ItemTrend, TrendDirection, YearPoint};

/// How price and sales volume move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSalesCorrelation {
    Negative,
    Positive,
    Neutral,
}

impl PriceSalesCorrelation {
    pub fn classify(r: f64) -> Self {
        if r < -0.4 {
            PriceSalesCorrelation::Negative
        } else if r > 0.4 {
            PriceSalesCorrelation::Positive
        } else {
            PriceSalesCorrelation::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceSalesCorrelation::Negative => "negative",
            PriceSalesCorrelation::Positive => "positive",
            PriceSalesCorrelation::Neutral => "neutral",
        }
    }
}

/// How strongly mileage depresses price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MileagePriceCorrelation {
    StrongNegative,
    Negative,
    Neutral,
}

impl MileagePriceCorrelation {
    pub fn classify(r: f64) -> Self {
        if r < -0.6 {
            MileagePriceCorrelation::StrongNegative
        } else if r < -0.2 {
            MileagePriceCorrelation::Negative
        } else {
            MileagePriceCorrelation::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MileagePriceCorrelation::StrongNegative => "strong negative",
            MileagePriceCorrelation::Negative => "negative",
            MileagePriceCorrelation::Neutral => "neutral",
        }
    }
}

/// Mean, range and count of one metric within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Demand and pricing profile of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProfile {
    pub region: String,
    pub total_sales: f64,
    pub avg_price: f64,
    pub avg_mileage: f64,
    pub top_model: Option<String>,
    pub top_fuel: Option<String>,
    pub top_transmission: Option<String>,
}

/// Whole-table totals and the yearly sales trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSummary {
    pub total_revenue: f64,
    pub total_units: f64,
    /// First and last model year present.
    pub year_span: Option<(i32, i32)>,
    /// Units per year, ascending by year.
    pub yearly_sales: Vec<(i32, f64)>,
    pub cagr: f64,
    pub trend: TrendDirection,
}

/// Best sellers by units across several dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformers {
    pub regions: Vec<(String, f64)>,
    pub models: Vec<(String, f64)>,
    /// Keyed by engine size in litres.
    pub engine_sizes: Vec<(String, f64)>,
    pub fuel_types: Vec<(String, f64)>,
    pub colors: Vec<(String, f64)>,
}

/// Every aggregate that goes into the context text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmContext {
    pub global: GlobalSummary,
    pub top: TopPerformers,
    pub price: ColumnSummary,
    pub mileage: ColumnSummary,
    pub engine: ColumnSummary,
    pub price_sales_r: f64,
    pub price_sales: PriceSalesCorrelation,
    pub mileage_price_r: f64,
    pub mileage_price: MileagePriceCorrelation,
    /// Ordered by total sales, largest first.
    pub regions: Vec<RegionProfile>,
    pub regional_prices: Vec<GroupSummary>,
    pub model_prices: Vec<GroupSummary>,
    pub model_sales: Vec<GroupSummary>,
    pub transmission_prices: Vec<GroupSummary>,
    pub fuel_prices: Vec<GroupSummary>,
    pub mileage_bin_prices: Vec<GroupSummary>,
    pub model_trends: Vec<ItemTrend>,
    pub fuel_trends: Vec<ItemTrend>,
    pub transmission_trends: Vec<ItemTrend>,
    pub engine_size_trends: Vec<ItemTrend>,
}

const TOP_PERFORMERS: usize = 3;

impl LlmContext {
    pub fn from_table(table: &SalesTable) -> Self {
        let records = table.records.as_slice();
        let price_sales_r = correlation(records, |r| r.price_usd, |r| r.sales_volume);
        let mileage_price_r = correlation(records, |r| r.mileage_km, |r| r.price_usd);

        let context = Self {
            global: global_summary(records),
            top: TopPerformers {
                regions: top_labels(records, |r| r.region.clone()),
                models: top_labels(records, |r| r.model.clone()),
                engine_sizes: top_labels(records, |r| Some(FloatKey(r.engine_size_l))),
                fuel_types: top_labels(records, |r| r.fuel_type.clone()),
                colors: top_labels(records, |r| r.color.clone()),
            },
            price: column_summary(records, |r| r.price_usd),
            mileage: column_summary(records, |r| r.mileage_km),
            engine: column_summary(records, |r| r.engine_size_l),
            price_sales_r,
            price_sales: PriceSalesCorrelation::classify(price_sales_r),
            mileage_price_r,
            mileage_price: MileagePriceCorrelation::classify(mileage_price_r),
            regions: region_profiles(records),
            regional_prices: group_summaries(records, |r| r.region.clone(), |r| r.price_usd),
            model_prices: group_summaries(records, |r| r.model.clone(), |r| r.price_usd),
            model_sales: group_summaries(records, |r| r.model.clone(), |r| r.sales_volume),
            transmission_prices: group_summaries(records, |r| r.transmission.clone(), |r| r.price_usd),
            fuel_prices: group_summaries(records, |r| r.fuel_type.clone(), |r| r.price_usd),
            mileage_bin_prices: group_values(records, |r| r.mileage_bin, |r| r.price_usd)
                .into_iter()
                .map(|(bin, values)| summarize_group(bin.label().to_string(), &values))
                .collect(),
            model_trends: item_trends(records, |r| r.model.clone(), 3),
            fuel_trends: item_trends(records, |r| r.fuel_type.clone(), 4),
            transmission_trends: item_trends(records, |r| r.transmission.clone(), 2),
            engine_size_trends: item_trends(records, |r| Some(r.engine_size), 3),
        };

        debug!(
            regions = context.regions.len(),
            years = context.global.yearly_sales.len(),
            "Extracted LLM context"
        );
        context
    }
}

/// Render the context text for a cleaned table.
pub fn extract_llm_context(table: &SalesTable) -> String {
    LlmContext::from_table(table).to_string()
}

fn global_summary(records: &[VehicleRecord]) -> GlobalSummary {
    let yearly_sales: Vec<(i32, f64)> = group_sums(records, |r| Some(r.year), |r| r.sales_volume)
        .into_iter()
        .collect();
    let year_span = match (yearly_sales.first(), yearly_sales.last()) {
        (Some(first), Some(last)) => Some((first.0, last.0)),
        _ => None,
    };
    let growth = cagr(&yearly_sales);

    GlobalSummary {
        total_revenue: records.iter().map(VehicleRecord::revenue).sum(),
        total_units: records.iter().map(|r| r.sales_volume).sum(),
        year_span,
        yearly_sales,
        cagr: growth,
        trend: TrendDirection::classify(growth),
    }
}

fn top_labels<K, F>(records: &[VehicleRecord], key: F) -> Vec<(String, f64)>
where
    K: Ord + Clone + fmt::Display,
    F: Fn(&VehicleRecord) -> Option<K>,
{
    let sums = group_sums(records, key, |r| r.sales_volume);
    top_n(&sums, TOP_PERFORMERS)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn top_one<F>(records: &[&VehicleRecord], key: F) -> Option<String>
where
    F: Fn(&VehicleRecord) -> Option<String>,
{
    let sums = group_sums(records, |r| key(*r), |r| r.sales_volume);
    top_n(&sums, 1).into_iter().next().map(|(k, _)| k)
}

fn column_summary(records: &[VehicleRecord], value: impl Fn(&VehicleRecord) -> f64) -> ColumnSummary {
    let values: Vec<f64> = records.iter().map(value).collect();
    ColumnSummary::from_values(&values, 0)
}

fn correlation(
    records: &[VehicleRecord],
    x: impl Fn(&VehicleRecord) -> f64,
    y: impl Fn(&VehicleRecord) -> f64,
) -> f64 {
    let xs: Vec<f64> = records.iter().map(&x).collect();
    let ys: Vec<f64> = records.iter().map(&y).collect();
    pearson(&xs, &ys)
}

fn summarize_group(label: String, values: &[f64]) -> GroupSummary {
    let stats: RunningStats = values.iter().copied().collect();
    GroupSummary {
        label,
        mean: stats.mean(),
        min: stats.min(),
        max: stats.max(),
        count: stats.count(),
    }
}

fn group_summaries(
    records: &[VehicleRecord],
    key: impl Fn(&VehicleRecord) -> Option<String>,
    value: impl Fn(&VehicleRecord) -> f64,
) -> Vec<GroupSummary> {
    group_values(records, key, value)
        .into_iter()
        .map(|(label, values)| summarize_group(label, &values))
        .collect()
}

fn region_profiles(records: &[VehicleRecord]) -> Vec<RegionProfile> {
    let mut by_region: BTreeMap<&str, Vec<&VehicleRecord>> = BTreeMap::new();
    for record in records {
        if let Some(region) = record.region.as_deref() {
            by_region.entry(region).or_default().push(record);
        }
    }

    let mut profiles: Vec<RegionProfile> = by_region
        .into_iter()
        .map(|(region, rows)| {
            let prices: RunningStats = rows.iter().map(|r| r.price_usd).collect();
            let mileage: RunningStats = rows.iter().map(|r| r.mileage_km).collect();
            RegionProfile {
                region: region.to_string(),
                total_sales: rows.iter().map(|r| r.sales_volume).sum(),
                avg_price: prices.mean(),
                avg_mileage: mileage.mean(),
                top_model: top_one(&rows, |r| r.model.clone()),
                top_fuel: top_one(&rows, |r| r.fuel_type.clone()),
                top_transmission: top_one(&rows, |r| r.transmission.clone()),
            }
        })
        .collect();

    // Stable sort keeps region name order among equal totals.
    profiles.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    profiles
}
