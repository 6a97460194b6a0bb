//! Property-based tests for the pipeline stages.
//!
//! Property-based tests verify:
//! 1. **Determinism**: the LLM context is a pure function of the table
//! 2. **Invariants**: business rules keep only valid rows
//! 3. **Well-formedness**: the HTML report survives any narrative or plot markup
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p autoreport --test property_tests
//! ```

use chrono::{Datelike, Local};
use proptest::prelude::*;

use autoreport::dataset::MileageBin;
use autoreport::report::{markdown_to_html, render_html, ReportMetadata};
use autoreport::{
    extract_llm_context, DataValidator, PlotCollection, SalesTable, VehicleRecord,
};

// =============================================================================
// Test Strategies
// =============================================================================

fn category(values: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    prop::option::weighted(0.9, prop::sample::select(values).prop_map(String::from))
}

fn record() -> impl Strategy<Value = VehicleRecord> {
    (
        category(&["3 Series", "5 Series", "X3", "X5", "i4"]),
        1970i32..2035,
        category(&["Europe", "Asia", "North America"]),
        category(&["Black", "White", "Blue"]),
        category(&["Petrol", "Diesel", "Electric"]),
        category(&["Automatic", "Manual"]),
        0.0f64..6.0,
        0.0f64..250_000.0,
        -1_000.0f64..900_000.0,
        -10.0f64..10_000.0,
    )
        .prop_map(
            |(model, year, region, color, fuel_type, transmission, engine, mileage, price, volume)| {
                VehicleRecord {
                    model,
                    year,
                    region,
                    color,
                    fuel_type,
                    transmission,
                    engine_size_l: engine,
                    engine_size: engine.trunc() as i64,
                    mileage_km: mileage,
                    mileage_bin: MileageBin::from_km(mileage),
                    price_usd: price,
                    sales_volume: volume,
                    extras: Vec::new(),
                }
            },
        )
}

fn table() -> impl Strategy<Value = SalesTable> {
    prop::collection::vec(record(), 1..40).prop_map(|records| SalesTable::new(records, Vec::new()))
}

/// Markdown-ish text with a fair share of markup characters.
fn narrative() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 #*_|\\-\\n]{0,200}",
        "(<[a-z/]{1,8}>|[a-z ]{1,10}|\\n|</div>|</body>|<script>){0,30}",
    ]
}

// =============================================================================
// Context
// =============================================================================

proptest! {
    #[test]
    fn context_is_deterministic(table in table()) {
        let first = extract_llm_context(&table);
        let second = extract_llm_context(&table.clone());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn context_never_prints_nan(table in table()) {
        let context = extract_llm_context(&table);
        prop_assert!(!context.contains("NaN"));
    }
}

// =============================================================================
// Business rules
// =============================================================================

proptest! {
    #[test]
    fn business_rules_keep_only_valid_rows(table in table()) {
        let validator = DataValidator::new();
        let kept = validator.enforce_business_rules(&table);
        let current_year = Local::now().year();

        for r in &kept.records {
            prop_assert!(r.price_usd > 0.0);
            prop_assert!(r.sales_volume >= 0.0);
            prop_assert!(r.year >= 1980 && r.year <= current_year);
        }

        let expected = table
            .records
            .iter()
            .filter(|r| {
                r.price_usd > 0.0
                    && r.sales_volume >= 0.0
                    && (1980..=current_year).contains(&r.year)
            })
            .count();
        prop_assert_eq!(kept.len(), expected);
    }

    #[test]
    fn negative_prices_fail_validation(table in table()) {
        let report = DataValidator::new().validate(&table.to_data_table());
        let has_negative = table
            .records
            .iter()
            .any(|r| r.price_usd < 0.0 || r.sales_volume < 0.0);
        if has_negative {
            prop_assert!(!report.passed);
        }
    }
}

// =============================================================================
// HTML assembly
// =============================================================================

proptest! {
    #[test]
    fn narrative_cannot_close_containers(text in narrative()) {
        let html = markdown_to_html(&text);
        prop_assert!(!html.contains("</div>"));
        prop_assert!(!html.contains("</body>"));
        prop_assert!(!html.contains("<script>"));
    }

    #[test]
    fn report_is_always_complete(
        text in narrative(),
        plot_count in 0usize..4,
        source in proptest::option::of("[<>&\"a-z]{0,20}"),
    ) {
        let mut plots = PlotCollection::new();
        for i in 0..plot_count {
            plots.insert(format!("plot{i}"), format!("<div id=\"p{i}\"></div>"));
        }
        let metadata = source.map(|s| ReportMetadata::new().with_data_source(s));

        let html = render_html(&text, &plots, metadata.as_ref());

        prop_assert!(html.starts_with("<!DOCTYPE html>"));
        prop_assert!(html.trim_end().ends_with("</html>"));
        prop_assert_eq!(html.matches("<body>").count(), 1);
        prop_assert_eq!(html.matches("</body>").count(), 1);
        prop_assert_eq!(html.matches("<div class=\"plot-container\">").count(), plot_count);
    }
}
