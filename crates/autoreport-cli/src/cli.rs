//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// autoreport: automated business reports from vehicle-sales data
#[derive(Parser)]
#[command(name = "autoreport")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the HTML and Markdown reports
    Run {
        /// Pipeline configuration file
        #[arg(short, long, default_value = autoreport::config::DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// LLM configuration file
        #[arg(long, default_value = autoreport::config::DEFAULT_LLM_CONFIG_PATH)]
        llm_config: PathBuf,

        /// Override the LLM provider (gemini, anthropic, openai, ollama, mock)
        #[arg(long)]
        provider: Option<String>,

        /// Override the model (provider-specific, e.g. "gemini-2.5-pro", "llama3.2")
        #[arg(long)]
        model: Option<String>,

        /// Print the data context and stop before calling the LLM
        #[arg(long)]
        dry_run: bool,

        /// Open the HTML report in a browser when done
        #[arg(long)]
        open: bool,
    },

    /// Print the LLM data context for a file
    Context {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Validate a data file and print the report
    Validate {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
