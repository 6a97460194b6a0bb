//! Run command - the full report pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use autoreport::{LlmSettings, NarrativeEngine, Pipeline, PipelineConfig, ProviderKind};
use colored::Colorize;

pub struct RunArgs {
    pub config: PathBuf,
    pub llm_config: PathBuf,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub dry_run: bool,
    pub open: bool,
}

pub fn run(args: RunArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load(&args.config)?;

    println!(
        "{} {}",
        "Generating report for".cyan().bold(),
        config.data.input_path.display().to_string().white()
    );

    let mut pipeline = Pipeline::new(config).dry_run(args.dry_run);

    if !args.dry_run {
        let settings = LlmSettings::load(&args.llm_config)?;
        let kind = match args.provider {
            Some(ref name) => name.parse::<ProviderKind>()?,
            None => settings.llm.provider,
        };

        let mut llm_config = settings.llm_config();
        if args.provider.is_some() && settings.llm.provider != kind {
            llm_config.model = kind.default_model().to_string();
        }
        if let Some(model) = args.model {
            llm_config.model = model;
        }

        if verbose {
            println!(
                "LLM: {} / {} (temperature {}, max tokens {})",
                kind, llm_config.model, llm_config.temperature, llm_config.max_tokens
            );
        }

        let provider = kind.build(llm_config)?;
        pipeline = pipeline
            .with_narrative_engine(NarrativeEngine::new(Arc::from(provider), settings.prompts));
    }

    let outcome = pipeline.run()?;

    println!(
        "Processed {} records ({})",
        outcome.records.to_string().white().bold(),
        outcome.validation.status_label()
    );
    if !outcome.validation.warnings.is_empty() {
        for warning in &outcome.validation.warnings {
            println!("  {} {}", "warning:".yellow(), warning);
        }
    }
    println!(
        "Generated {} visualizations",
        outcome.plot_names.len().to_string().white().bold()
    );

    match outcome.report {
        Some(paths) => {
            println!();
            println!(
                "{} {}",
                "Report saved to".green().bold(),
                paths.html.display().to_string().white()
            );
            println!(
                "{} {}",
                "Markdown saved to".green().bold(),
                paths.markdown.display().to_string().white()
            );

            if args.open {
                if let Err(e) = open::that(&paths.html) {
                    eprintln!("Failed to open browser: {}", e);
                }
            }
        }
        None => {
            println!();
            println!("{}", outcome.context);
            println!("{}", "Dry run: not generating report".yellow());
        }
    }

    Ok(())
}
