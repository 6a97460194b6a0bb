//! Text layout of the context block.

use std::fmt::{self, Write};

use super::format::{fixed, grouped, money, percent, signed_percent, NOT_AVAILABLE};
use super::{GroupSummary, ItemTrend, LlmContext};

const RULE: &str = "--- ";

impl fmt::Display for LlmContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "***COMPREHENSIVE VEHICLE SALES DATA CONTEXT***")?;
        writeln!(f)?;

        self.write_global(f)?;
        self.write_top_performers(f)?;
        self.write_price_dynamics(f)?;
        self.write_regions(f)?;

        writeln!(f)?;
        writeln!(f, "SECTION: CATEGORICAL_ANALYSIS")?;
        writeln!(f, "---")?;
        writeln!(f, "### Model Pricing and Sales Volume Summary")?;
        write_groups(f, &self.model_prices, "Price", true)?;
        write_groups(f, &self.model_sales, "Sales Volume", false)?;
        writeln!(f)?;
        writeln!(f, "### Transmission Price Summary")?;
        write_groups(f, &self.transmission_prices, "Price", true)?;
        writeln!(f)?;
        writeln!(f, "### Fuel Type Price Summary")?;
        write_groups(f, &self.fuel_prices, "Price", true)?;
        writeln!(f)?;
        writeln!(f, "### Mileage Bin Price Summary (Depreciation Profile)")?;
        write_groups(f, &self.mileage_bin_prices, "Price", true)?;

        write_trends(f, "TEMPORAL_MODEL_TRENDS", "MODEL", &self.model_trends)?;
        write_trends(f, "TEMPORAL_FUEL_TRENDS", "FUEL_TYPE", &self.fuel_trends)?;
        write_trends(f, "TEMPORAL_TRANSMISSION_TRENDS", "TRANSMISSION", &self.transmission_trends)?;
        write_trends(f, "TEMPORAL_ENGINE_SIZE_TRENDS", "ENGINE_SIZE", &self.engine_size_trends)?;

        Ok(())
    }
}

impl LlmContext {
    fn write_global(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.global;
        let (first, last) = match g.year_span {
            Some((first, last)) => (first.to_string(), last.to_string()),
            None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
        };
        let yearly = g
            .yearly_sales
            .iter()
            .map(|(year, units)| format!("{}: {}", year, grouped(*units, 0)))
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(f, "## 📊 Global Performance Summary")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "* **Total Revenue:** {}", money(g.total_revenue, 2))?;
        writeln!(f, "* **Total Sales Volume:** {} units", grouped(g.total_units, 0))?;
        writeln!(f, "* **Time Period:** Data spans from year **{}** to **{}**.", first, last)?;
        writeln!(
            f,
            "* **Sales Trend:** The overall sales trend is **{}** (CAGR: {}).",
            g.trend.label().to_uppercase(),
            percent(g.cagr)
        )?;
        writeln!(f, "    * *Yearly Sales Breakdown (Units):* {}", yearly)
    }

    fn write_top_performers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.top;
        writeln!(f, "### Top Performers (By Sales Volume)")?;
        writeln!(f, "* **Top 3 Regions:** {}", ranked(&t.regions, ""))?;
        writeln!(f, "* **Top 3 Models:** {}", ranked(&t.models, ""))?;
        writeln!(f, "* **Top 3 Engine Sizes (L):** {}", ranked(&t.engine_sizes, "L"))?;
        writeln!(f, "* **Top 3 Fuel Types:** {}", ranked(&t.fuel_types, ""))?;
        writeln!(f, "* **Top 3 Colors:** {}", ranked(&t.colors, ""))
    }

    fn write_price_dynamics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p, m, e) = (&self.price, &self.mileage, &self.engine);

        writeln!(f, "{}", RULE)?;
        writeln!(f, "## 💰 Price & Mileage Dynamics")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "### Overall Numerical Variable Statistics")?;
        writeln!(
            f,
            "* **Price (USD) Stats:** Mean: {}, Median: {}, Std: {}, Min: {}, Max: {}, IQR: {} - {}",
            money(p.mean, 2),
            money(p.median, 2),
            money(p.std, 2),
            money(p.min, 2),
            money(p.max, 2),
            money(p.q1, 2),
            money(p.q3, 2)
        )?;
        writeln!(
            f,
            "* **Mileage (KM) Stats:** Mean: {}km, Median: {}km, Max: {}km.",
            grouped(m.mean, 2),
            grouped(m.median, 2),
            grouped(m.max, 2)
        )?;
        writeln!(
            f,
            "* **Engine Size (L) Stats:** Mean: {}L, Median: {}L.",
            grouped(e.mean, 2),
            grouped(e.median, 2)
        )?;

        writeln!(f, "### Correlation Insights")?;
        writeln!(
            f,
            "* **Price vs. Sales Volume:** A **{}** correlation ({}) between unit price and units sold.",
            self.price_sales.label().to_uppercase(),
            fixed(self.price_sales_r, 2)
        )?;
        writeln!(
            f,
            "* **Mileage vs. Price:** A **{}** correlation ({}) between odometer reading and price.",
            self.mileage_price.label().to_uppercase(),
            fixed(self.mileage_price_r, 2)
        )
    }

    fn write_regions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "## 🌍 Regional Demand & Pricing Profile")?;
        writeln!(f, "{}", RULE)?;

        for region in &self.regions {
            writeln!(f, "* **Region: {}**", region.region)?;
            writeln!(f, "    * Total Sales: **{} units**", grouped(region.total_sales, 0))?;
            writeln!(f, "    * Average Price: **{}**", money(region.avg_price, 2))?;
            writeln!(f, "    * Average Mileage: **{}km**", grouped(region.avg_mileage, 0))?;
            writeln!(f, "    * Most Popular Model: **{}**", or_na(&region.top_model))?;
            writeln!(f, "    * Preferred Fuel Type: **{}**", or_na(&region.top_fuel))?;
            writeln!(f, "    * Preferred Transmission: **{}**", or_na(&region.top_transmission))?;
        }

        writeln!(f, "### Detailed Regional Price Variation (Mean Price USD)")?;
        for group in &self.regional_prices {
            writeln!(
                f,
                "* {}: Mean: {}, Max: {}, Min: {}",
                group.label,
                money(group.mean, 2),
                money(group.max, 2),
                money(group.min, 2)
            )?;
        }
        Ok(())
    }
}

fn ranked(items: &[(String, f64)], suffix: &str) -> String {
    if items.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    items
        .iter()
        .map(|(label, units)| format!("{}{} ({})", label, suffix, grouped(*units, 0)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn write_groups(
    f: &mut fmt::Formatter<'_>,
    groups: &[GroupSummary],
    metric: &str,
    as_money: bool,
) -> fmt::Result {
    let show = |v: f64| if as_money { money(v, 0) } else { grouped(v, 0) };
    for g in groups {
        writeln!(
            f,
            "* **{}**: Mean {}: {} | Range: {} - {} | Count: {}",
            g.label,
            metric,
            show(g.mean),
            show(g.min),
            show(g.max),
            g.count
        )?;
    }
    Ok(())
}

fn write_trends(f: &mut fmt::Formatter<'_>, section: &str, tag: &str, trends: &[ItemTrend]) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "SECTION: {}", section)?;
    writeln!(f, "---")?;
    for trend in trends {
        let mut breakdown = String::new();
        for (i, point) in trend.yearly.iter().enumerate() {
            if i > 0 {
                breakdown.push_str(" | ");
            }
            write!(
                breakdown,
                "Y{}: S{}/P{}",
                point.year,
                grouped(point.units, 0),
                money(point.avg_price, 0)
            )?;
        }

        writeln!(
            f,
            "{}: {} | SUMMARY: Growth: {} | Start_Year_Price: {} | End_Year_Price: {}",
            tag,
            trend.item,
            signed_percent(trend.growth),
            money(trend.start_price(), 0),
            money(trend.end_price(), 0)
        )?;
        writeln!(f, "BREAKDOWN_{}: {}", trend.item, breakdown)?;
    }
    Ok(())
}
