//! Context extraction benchmarks.
//!
//! Measures cleaning and summarizing across table sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use autoreport::input::Parser;
use autoreport::{extract_llm_context, Preprocessor, SalesTable};

const MODELS: [&str; 6] = ["3 Series", "5 Series", "X3", "X5", "i4", "M3"];
const REGIONS: [&str; 4] = ["Europe", "North America", "Asia", "Middle East"];
const COLORS: [&str; 5] = ["Black", "White", "Blue", "Grey", "Red"];
const FUELS: [&str; 3] = ["Petrol", "Diesel", "Hybrid"];

/// Generate synthetic sales CSV with the specified number of rows.
fn generate_sales_csv(rows: usize) -> String {
    let mut data = String::from(
        "Model,Year,Region,Color,Fuel_Type,Transmission,Engine_Size_L,Mileage_KM,Price_USD,Sales_Volume\n",
    );

    for row in 0..rows {
        // Every 50th row misses its price to exercise imputation.
        let price = if row % 50 == 0 {
            String::new()
        } else {
            format!("{}", 30_000 + (row * 7919) % 90_000)
        };
        data.push_str(&format!(
            "{},{},{},{},{},{},{:.1},{},{},{}\n",
            MODELS[row % MODELS.len()],
            2010 + row % 15,
            REGIONS[(row / 3) % REGIONS.len()],
            COLORS[(row / 7) % COLORS.len()],
            FUELS[(row / 11) % FUELS.len()],
            if row % 3 == 0 { "Manual" } else { "Automatic" },
            1.5 + (row % 6) as f64 * 0.5,
            (row * 3571) % 200_000,
            price,
            100 + (row * 31) % 9_000,
        ));
    }

    data
}

fn cleaned_table(rows: usize) -> SalesTable {
    let raw = Parser::new()
        .parse_bytes(generate_sales_csv(rows).as_bytes(), b',')
        .expect("synthetic data parses");
    Preprocessor::new(Vec::new())
        .clean(&raw)
        .expect("synthetic data cleans")
}

/// Benchmark the text summary on already-cleaned tables.
fn bench_extract_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_llm_context");

    for rows in [1_000, 10_000, 50_000] {
        let table = cleaned_table(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| extract_llm_context(black_box(table)))
        });
    }

    group.finish();
}

/// Benchmark cleaning (type coercion, imputation, derived columns).
fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess_clean");

    for rows in [1_000, 10_000] {
        let raw = Parser::new()
            .parse_bytes(generate_sales_csv(rows).as_bytes(), b',')
            .expect("synthetic data parses");
        let preprocessor = Preprocessor::new(Vec::new());
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &raw, |b, raw| {
            b.iter(|| preprocessor.clean(black_box(raw)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract_context, bench_clean);
criterion_main!(benches);
