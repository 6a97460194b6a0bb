//! Context command - print the LLM data context for a file.

use std::path::PathBuf;

use autoreport::{Pipeline, PipelineConfig};

pub fn run(file: PathBuf, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let prepared = Pipeline::new(PipelineConfig::for_input(file)).prepare()?;
    println!("{}", prepared.context);
    Ok(())
}
