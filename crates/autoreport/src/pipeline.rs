//! End-to-end report pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::PipelineConfig;
use crate::context::extract_llm_context;
use crate::dataset::{Preprocessor, SalesTable};
use crate::error::{ReportError, Result};
use crate::input::SourceMetadata;
use crate::llm::{LlmProvider, NarrativeEngine, PromptTemplates};
use crate::report::{ReportBuilder, ReportMetadata};
use crate::validation::{DataValidator, ValidationReport};
use crate::visualization::Visualizer;

/// Cleaned, validated data ready for summarizing.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub source: SourceMetadata,
    pub table: SalesTable,
    pub validation: ValidationReport,
    pub context: String,
}

/// Files written by the report stage.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPaths {
    pub html: PathBuf,
    pub markdown: PathBuf,
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub source: SourceMetadata,
    /// Records left after the business rules.
    pub records: usize,
    pub validation: ValidationReport,
    pub context: String,
    pub plot_names: Vec<String>,
    /// `None` on a dry run.
    pub report: Option<ReportPaths>,
}

/// Runs load, validation, summarizing, charting, narration and assembly.
pub struct Pipeline {
    config: PipelineConfig,
    engine: Option<NarrativeEngine>,
    dry_run: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            engine: None,
            dry_run: false,
        }
    }

    /// Use `provider` with `prompts` for the narrative stage.
    pub fn with_llm(self, provider: impl LlmProvider + 'static, prompts: PromptTemplates) -> Self {
        self.with_narrative_engine(NarrativeEngine::new(Arc::new(provider), prompts))
    }

    pub fn with_narrative_engine(mut self, engine: NarrativeEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Stop after the charts; no LLM call and no report files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn validator(&self) -> DataValidator {
        DataValidator::with_config(self.config.validation.clone())
    }

    /// Load and clean the configured input.
    pub fn load(&self) -> Result<(SalesTable, SourceMetadata)> {
        let preprocessor = Preprocessor::new(self.config.data.columns.clone());
        let (table, source) = preprocessor.load(&self.config.data.input_path)?;
        info!(
            rows = table.len(),
            columns = table.column_count(),
            "Data loaded"
        );
        Ok((table, source))
    }

    /// Validate the cleaned table without failing on errors.
    pub fn validate(&self, table: &SalesTable) -> ValidationReport {
        self.validator().validate(&table.to_data_table())
    }

    /// Load, validate, apply the business rules and build the LLM context.
    ///
    /// Validation errors abort with [`ReportError::Validation`].
    pub fn prepare(&self) -> Result<PreparedData> {
        info!("STAGE 1: Loading and validating data");
        let (table, source) = self.load()?;

        let validation = self.validate(&table);
        if !validation.passed {
            for message in &validation.errors {
                error!("  - {}", message);
            }
            return Err(ReportError::Validation(validation.errors.clone()));
        }

        let table = self.validator().enforce_business_rules(&table);
        if table.is_empty() {
            return Err(ReportError::EmptyData(
                "no records remain after applying business rules".to_string(),
            ));
        }

        let context = extract_llm_context(&table);
        info!(chars = context.len(), "Data context extracted for LLM");
        debug!("Data summary:\n{}", context);

        Ok(PreparedData {
            source,
            table,
            validation,
            context,
        })
    }

    /// Run every stage in order, stopping at the first failure.
    pub fn run(&self) -> Result<PipelineOutcome> {
        info!("Starting automated report generation pipeline");

        let engine = match (&self.engine, self.dry_run) {
            (Some(engine), _) => Some(engine),
            (None, true) => None,
            (None, false) => {
                return Err(ReportError::Config(
                    "No LLM provider configured; use a dry run to skip the narrative".to_string(),
                ))
            }
        };

        let prepared = self.prepare()?;

        info!("STAGE 2: Generating visualizations");
        let plots = Visualizer::new(&prepared.table, &self.config.output.dir).generate_plots()?;
        info!(count = plots.len(), "Generated visualizations");
        let plot_names: Vec<String> = plots.keys().cloned().collect();

        let report = match engine {
            Some(engine) if !self.dry_run => {
                info!("STAGE 3: Generating narrative with LLM");
                let narrative = engine.generate_report_narrative(&prepared.context)?;
                info!(chars = narrative.len(), "Generated narrative");

                info!("STAGE 4: Building final report");
                let builder = ReportBuilder::new(&self.config.output.dir)?;
                let metadata = ReportMetadata::new()
                    .with_model(engine.model_name())
                    .with_data_source(self.config.data.input_path.display().to_string())
                    .with_total_records(prepared.table.len())
                    .with_validation_status(prepared.validation.status_label());

                let file_name = self.config.report_file_name();
                let html = builder.build_html_report(
                    &narrative,
                    &plots,
                    Some(&metadata),
                    Some(&file_name),
                )?;
                let markdown = builder.save_markdown(&narrative, None)?;
                Some(ReportPaths { html, markdown })
            }
            _ => {
                warn!("Dry run: skipping narrative and report assembly");
                None
            }
        };

        info!("Pipeline completed successfully");

        Ok(PipelineOutcome {
            records: prepared.table.len(),
            source: prepared.source,
            validation: prepared.validation,
            context: prepared.context,
            plot_names,
            report,
        })
    }
}
