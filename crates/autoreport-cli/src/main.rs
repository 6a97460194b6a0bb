//! autoreport CLI - automated vehicle-sales reports.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use commands::run::RunArgs;

fn main() {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let log_file = logging::init(cli.verbose);
    if let Some(ref path) = log_file {
        tracing::debug!(path = %path.display(), "Logging to file");
    }

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\nPipeline interrupted by user");
        std::process::exit(130);
    }) {
        tracing::warn!("Could not install Ctrl-C handler: {}", e);
    }

    let result = match cli.command {
        Commands::Run {
            config,
            llm_config,
            provider,
            model,
            dry_run,
            open,
        } => commands::run::run(
            RunArgs {
                config,
                llm_config,
                provider,
                model,
                dry_run,
                open,
            },
            cli.verbose,
        ),

        Commands::Context { file } => commands::context::run(file, cli.verbose),

        Commands::Validate { file, json } => commands::validate::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
