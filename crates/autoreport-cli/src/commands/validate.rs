//! Validate command - run the data-quality checks on a file.

use std::path::PathBuf;

use autoreport::{Pipeline, PipelineConfig};
use colored::Colorize;

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let pipeline = Pipeline::new(PipelineConfig::for_input(&file));
    let (table, _source) = pipeline.load()?;
    let report = pipeline.validate(&table);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {}",
            "Validation for".cyan().bold(),
            file.display().to_string().white()
        );
        println!();

        let stats = &report.stats;
        println!("Rows: {}", stats.total_rows.to_string().white().bold());
        println!("Columns: {}", stats.total_columns);
        println!("Missing values: {}", stats.missing_values);
        println!("Duplicate rows: {}", stats.duplicate_rows);
        if verbose {
            println!("Memory usage: {:.2} MB", stats.memory_usage_mb);
        }
        println!();

        for error in &report.errors {
            println!("  {} {}", "error:".red().bold(), error);
        }
        for warning in &report.warnings {
            println!("  {} {}", "warning:".yellow(), warning);
        }

        let status = report.status_label();
        let status = if !report.passed {
            status.red().bold()
        } else if report.warnings.is_empty() {
            status.green().bold()
        } else {
            status.yellow().bold()
        };
        println!("Status: {}", status);
    }

    if !report.passed {
        return Err(format!("validation failed with {} error(s)", report.errors.len()).into());
    }
    Ok(())
}
