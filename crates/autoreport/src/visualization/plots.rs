//! The fixed set of report charts.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::figure::{palette_color, Facets, Figure};
use crate::dataset::{SalesTable, VehicleRecord};
use crate::error::{ReportError, Result};
use crate::stats::{group_sums, top_n, RunningStats};

/// Plot name to embeddable HTML, in display order.
pub type PlotCollection = IndexMap<String, String>;

/// Largest marker diameter in the price elasticity scatter, in pixels.
const MAX_MARKER_SIZE: f64 = 45.0;

/// Builds charts from a cleaned table and writes them to disk.
pub struct Visualizer<'a> {
    table: &'a SalesTable,
    plots_dir: PathBuf,
}

impl<'a> Visualizer<'a> {
    /// Standalone chart pages go to `{output_dir}/plots`.
    pub fn new(table: &'a SalesTable, output_dir: impl AsRef<Path>) -> Self {
        Self {
            table,
            plots_dir: output_dir.as_ref().join("plots"),
        }
    }

    pub fn plots_dir(&self) -> &Path {
        &self.plots_dir
    }

    /// All report figures, in display order.
    pub fn figures(&self) -> Vec<Figure> {
        vec![
            self.combined_trend(),
            self.top_models(),
            self.price_elasticity(),
            self.engine_price_box(),
        ]
    }

    /// Render every figure, write standalone pages, and return embeddable
    /// fragments. Only the first fragment loads plotly.js.
    pub fn generate_plots(&self) -> Result<PlotCollection> {
        fs::create_dir_all(&self.plots_dir).map_err(|e| ReportError::io(&self.plots_dir, e))?;

        let mut plots = PlotCollection::new();
        for (i, figure) in self.figures().into_iter().enumerate() {
            let page_path = self.plots_dir.join(format!("{}.html", figure.name));
            fs::write(&page_path, figure.to_standalone_html()?)
                .map_err(|e| ReportError::io(&page_path, e))?;
            debug!(path = %page_path.display(), "Wrote plot");

            plots.insert(figure.name.clone(), figure.to_embed(i == 0)?);
        }

        info!(count = plots.len(), dir = %self.plots_dir.display(), "Generated plots");
        Ok(plots)
    }

    /// Yearly units per region, with the global total as a dashed black line.
    fn combined_trend(&self) -> Figure {
        let records = &self.table.records;

        let mut per_region: BTreeMap<&str, BTreeMap<i32, f64>> = BTreeMap::new();
        for r in records {
            if let Some(region) = r.region.as_deref() {
                *per_region.entry(region).or_default().entry(r.year).or_insert(0.0) += r.sales_volume;
            }
        }
        let global = group_sums(records, |r| Some(r.year), |r| r.sales_volume);

        let mut data: Vec<Value> = per_region
            .iter()
            .enumerate()
            .map(|(i, (region, yearly))| {
                line_trace(region, yearly, json!({ "color": palette_color(i), "width": 2 }))
            })
            .collect();
        data.push(line_trace(
            "Global",
            &global,
            json!({ "color": "#000000", "width": 3, "dash": "dash" }),
        ));

        Figure::new(
            "combined_trend_plot",
            data,
            json!({
                "title": { "text": "Sales Trends: Regional Performance Overlaid with Global Trend (Units)" },
                "xaxis": { "title": { "text": "year" } },
                "yaxis": { "title": { "text": "Sales Volume" } },
                "legend": { "title": { "text": "region" } },
            }),
        )
    }

    /// Top 10 models by units, stacked by fuel type, one facet per year.
    fn top_models(&self) -> Figure {
        let records = &self.table.records;

        let model_sums = group_sums(records, |r| r.model.clone(), |r| r.sales_volume);
        let model_order: Vec<String> = top_n(&model_sums, 10).into_iter().map(|(m, _)| m).collect();

        let mut cells: BTreeMap<(String, i32), BTreeMap<String, f64>> = BTreeMap::new();
        let mut years = BTreeSet::new();
        for r in records {
            let (Some(model), Some(fuel)) = (&r.model, &r.fuel_type) else {
                continue;
            };
            if !model_order.contains(model) {
                continue;
            }
            years.insert(r.year);
            *cells
                .entry((fuel.clone(), r.year))
                .or_default()
                .entry(model.clone())
                .or_insert(0.0) += r.sales_volume;
        }

        let years: Vec<i32> = years.into_iter().collect();
        let fuels: BTreeSet<&String> = cells.keys().map(|(fuel, _)| fuel).collect();

        let mut data = Vec::new();
        for (color_idx, fuel) in fuels.iter().enumerate() {
            let mut first = true;
            for (facet_idx, year) in years.iter().enumerate() {
                let Some(by_model) = cells.get(&((*fuel).clone(), *year)) else {
                    continue;
                };
                // Keep sales order along the x axis.
                let (x, y): (Vec<&String>, Vec<f64>) = model_order
                    .iter()
                    .filter_map(|m| by_model.get(m).map(|v| (m, *v)))
                    .unzip();

                data.push(json!({
                    "type": "bar",
                    "name": fuel,
                    "legendgroup": fuel,
                    "showlegend": first,
                    "x": x,
                    "y": y,
                    "xaxis": Facets::axis_ref(facet_idx),
                    "yaxis": "y",
                    "marker": { "color": palette_color(color_idx) },
                    "hovertemplate": format!("Fuel Type={}<br>model=%{{x}}<br>Units=%{{y}}<extra></extra>", fuel),
                }));
                first = false;
            }
        }

        let mut layout = Map::new();
        layout.insert(
            "title".into(),
            json!({ "text": "Top 10 Models: Sales Volume Composition by Fuel Type" }),
        );
        layout.insert("barmode".into(), json!("stack"));
        layout.insert("yaxis".into(), json!({ "title": { "text": "Total Sales Volume (Units)" } }));
        layout.insert("legend".into(), json!({ "title": { "text": "Fuel Type" } }));
        Facets::new(years.iter().map(|y| format!("year={}", y)).collect()).apply(
            &mut layout,
            &json!({ "categoryorder": "array", "categoryarray": model_order }),
        );

        Figure::new("top_models_plot", data, Value::Object(layout))
    }

    /// Average price against total units per (transmission, fuel type),
    /// faceted by fuel type. Marker area scales with units.
    fn price_elasticity(&self) -> Figure {
        struct Segment {
            prices: RunningStats,
            engines: RunningStats,
            units: f64,
        }

        let mut segments: BTreeMap<(String, String), Segment> = BTreeMap::new();
        for r in &self.table.records {
            let (Some(trans), Some(fuel)) = (&r.transmission, &r.fuel_type) else {
                continue;
            };
            let seg = segments
                .entry((trans.clone(), fuel.clone()))
                .or_insert_with(|| Segment {
                    prices: RunningStats::new(),
                    engines: RunningStats::new(),
                    units: 0.0,
                });
            seg.prices.push(r.price_usd);
            seg.engines.push(r.engine_size_l);
            seg.units += r.sales_volume;
        }

        let fuels: Vec<&String> = segments.keys().map(|(_, f)| f).collect::<BTreeSet<_>>().into_iter().collect();
        let transmissions: Vec<&String> = segments
            .keys()
            .map(|(t, _)| t)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let max_units = segments.values().map(|s| s.units).fold(0.0, f64::max);
        let sizeref = if max_units > 0.0 {
            2.0 * max_units / (MAX_MARKER_SIZE * MAX_MARKER_SIZE)
        } else {
            1.0
        };

        let mut data = Vec::new();
        for (color_idx, trans) in transmissions.iter().enumerate() {
            let mut first = true;
            for (facet_idx, fuel) in fuels.iter().enumerate() {
                let Some(seg) = segments.get(&((*trans).clone(), (*fuel).clone())) else {
                    continue;
                };
                data.push(json!({
                    "type": "scatter",
                    "mode": "markers",
                    "name": trans,
                    "legendgroup": trans,
                    "showlegend": first,
                    "x": [seg.prices.mean()],
                    "y": [seg.units],
                    "customdata": [[seg.engines.mean()]],
                    "xaxis": Facets::axis_ref(facet_idx),
                    "yaxis": "y",
                    "marker": {
                        "color": palette_color(color_idx),
                        "size": [seg.units.max(0.0)],
                        "sizemode": "area",
                        "sizeref": sizeref,
                        "sizemin": 4,
                    },
                    "hovertemplate": "Average Price (USD)=%{x:,.0f}<br>Total Sales Volume (Units)=%{y:,.0f}<br>avg_engine_size=%{customdata[0]:.2f}<extra></extra>",
                }));
                first = false;
            }
        }

        let mut layout = Map::new();
        layout.insert(
            "title".into(),
            json!({ "text": "Price vs. Sales Volume: Model Market Position (Aggregated by Fuel/Trans)" }),
        );
        layout.insert("height".into(), json!(450));
        layout.insert("showlegend".into(), json!(true));
        layout.insert("yaxis".into(), json!({ "title": { "text": "Total Sales Volume (Units)" } }));
        layout.insert("legend".into(), json!({ "title": { "text": "Transmission" } }));
        Facets::new(fuels.iter().map(|f| f.to_string()).collect()).apply(
            &mut layout,
            &json!({ "title": { "text": "Average Price (USD)" } }),
        );

        Figure::new("price_elasticity_plot", data, Value::Object(layout))
    }

    /// Price distribution per whole-litre engine size, one box series per fuel.
    fn engine_price_box(&self) -> Figure {
        let mut by_fuel: BTreeMap<&str, Vec<&VehicleRecord>> = BTreeMap::new();
        for r in &self.table.records {
            if let Some(fuel) = r.fuel_type.as_deref() {
                by_fuel.entry(fuel).or_default().push(r);
            }
        }

        let engine_sizes: BTreeSet<i64> = by_fuel
            .values()
            .flat_map(|rows| rows.iter().map(|r| r.engine_size))
            .collect();
        let category_order: Vec<String> = engine_sizes.iter().map(|e| e.to_string()).collect();

        let data = by_fuel
            .iter()
            .enumerate()
            .map(|(i, (fuel, rows))| {
                let x: Vec<String> = rows.iter().map(|r| r.engine_size.to_string()).collect();
                let y: Vec<f64> = rows.iter().map(|r| r.price_usd).collect();
                json!({
                    "type": "box",
                    "name": fuel,
                    "x": x,
                    "y": y,
                    "marker": { "color": palette_color(i) },
                    "boxpoints": "outliers",
                })
            })
            .collect();

        Figure::new(
            "engine_price_box",
            data,
            json!({
                "title": { "text": "Price Distribution by Binned Engine Size and Fuel Type" },
                "boxmode": "group",
                "xaxis": {
                    "title": { "text": "Engine Size (L, Binned)" },
                    "type": "category",
                    "categoryorder": "array",
                    "categoryarray": category_order,
                },
                "yaxis": { "title": { "text": "Price (USD)" } },
                "legend": { "title": { "text": "fuel_type" } },
            }),
        )
    }
}

fn line_trace(name: &str, yearly: &BTreeMap<i32, f64>, line: Value) -> Value {
    let x: Vec<i32> = yearly.keys().copied().collect();
    let y: Vec<f64> = yearly.values().copied().collect();
    json!({
        "type": "scatter",
        "mode": "lines+markers",
        "name": name,
        "x": x,
        "y": y,
        "line": line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MileageBin;

    fn record(
        year: i32,
        region: &str,
        model: &str,
        fuel: &str,
        trans: &str,
        engine: f64,
        price: f64,
        sales: f64,
    ) -> VehicleRecord {
        VehicleRecord {
            model: Some(model.to_string()),
            year,
            region: Some(region.to_string()),
            color: None,
            fuel_type: Some(fuel.to_string()),
            transmission: Some(trans.to_string()),
            engine_size_l: engine,
            engine_size: engine as i64,
            mileage_km: 30_000.0,
            mileage_bin: MileageBin::from_km(30_000.0),
            price_usd: price,
            sales_volume: sales,
            extras: Vec::new(),
        }
    }

    fn sample() -> SalesTable {
        SalesTable::new(
            vec![
                record(2021, "North America", "7 Series", "Gas", "Automatic", 2.0, 20_000.0, 100.0),
                record(2021, "North America", "7 Series", "Diesel", "Manual", 2.5, 25_000.0, 150.0),
                record(2022, "North America", "7 Series", "Gas", "Automatic", 4.0, 22_000.0, 120.0),
                record(2022, "Asia", "3 Series", "Diesel", "Manual", 1.5, 26_000.0, 170.0),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_generate_plots_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample();
        let viz = Visualizer::new(&table, dir.path());

        let plots = viz.generate_plots().unwrap();

        let names: Vec<&str> = plots.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["combined_trend_plot", "top_models_plot", "price_elasticity_plot", "engine_price_box"]
        );
        for name in &names {
            assert!(dir.path().join("plots").join(format!("{name}.html")).is_file());
        }
        assert!(plots["combined_trend_plot"].contains("cdn.plot.ly"));
        assert!(!plots["top_models_plot"].contains("cdn.plot.ly"));
    }

    #[test]
    fn test_global_line_is_last_and_dashed() {
        let table = sample();
        let fig = Visualizer::new(&table, ".").combined_trend();

        assert_eq!(fig.data.len(), 3);
        assert_eq!(fig.data[0]["name"], "Asia");
        let global = &fig.data[2];
        assert_eq!(global["name"], "Global");
        assert_eq!(global["line"]["dash"], "dash");
        assert_eq!(global["line"]["color"], "#000000");
        assert_eq!(global["y"], json!([250.0, 290.0]));
    }

    #[test]
    fn test_top_models_follow_sales_order() {
        let table = sample();
        let fig = Visualizer::new(&table, ".").top_models();

        assert_eq!(fig.layout["barmode"], "stack");
        assert_eq!(fig.layout["xaxis"]["categoryarray"], json!(["7 Series", "3 Series"]));
        assert!(fig.layout.get("xaxis2").is_some());
        // Each fuel appears once in the legend.
        let diesel_legends = fig
            .data
            .iter()
            .filter(|t| t["name"] == "Diesel" && t["showlegend"] == json!(true))
            .count();
        assert_eq!(diesel_legends, 1);
    }

    #[test]
    fn test_engine_box_sorted_categories() {
        let table = sample();
        let fig = Visualizer::new(&table, ".").engine_price_box();

        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.layout["xaxis"]["categoryarray"], json!(["1", "2", "4"]));
    }

    #[test]
    fn test_empty_table_still_renders() {
        let table = SalesTable::default();
        let figures = Visualizer::new(&table, ".").figures();
        assert_eq!(figures.len(), 4);
        assert!(figures.iter().all(|f| f.to_embed(false).is_ok()));
    }
}
