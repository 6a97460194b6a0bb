//! autoreport: automated business reports from vehicle-sales data.
//!
//! A linear batch pipeline turns one sales table into one report:
//!
//! 1. **Load & clean**: parse the CSV, normalize headers, impute missing
//!    numbers, derive `engine_size` and `mileage_bin`.
//! 2. **Validate**: a fixed checklist of data-quality checks; errors abort.
//! 3. **Business rules**: keep positive prices, non-negative volumes and
//!    plausible model years.
//! 4. **Context**: a deterministic text summary written for an LLM.
//! 5. **Charts**: Plotly figures, embedded and as standalone pages.
//! 6. **Narrative**: one LLM call turns the context into Markdown.
//! 7. **Report**: a styled HTML page plus the raw Markdown.
//!
//! # Example
//!
//! ```no_run
//! use autoreport::{MockProvider, Pipeline, PipelineConfig, PromptTemplates};
//!
//! let config = PipelineConfig::for_input("data/vehicle_sales.csv");
//! let outcome = Pipeline::new(config)
//!     .with_llm(MockProvider::new(), PromptTemplates::default())
//!     .run()
//!     .unwrap();
//!
//! println!("{} records, {} charts", outcome.records, outcome.plot_names.len());
//! ```

pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod input;
pub mod llm;
pub mod report;
pub mod stats;
pub mod validation;
pub mod visualization;

mod pipeline;

pub use crate::pipeline::{Pipeline, PipelineOutcome, PreparedData, ReportPaths};
pub use config::{LlmSettings, PipelineConfig};
pub use context::{extract_llm_context, LlmContext};
pub use dataset::{Preprocessor, SalesTable, VehicleRecord};
pub use error::{ReportError, Result};
pub use input::{DataTable, SourceMetadata};
pub use llm::{
    AnthropicProvider, GeminiProvider, LlmConfig, LlmProvider, MockProvider, NarrativeEngine,
    OllamaProvider, OpenAIProvider, PromptTemplates, ProviderKind,
};
pub use report::{ReportBuilder, ReportMetadata};
pub use validation::{DataValidator, ValidationConfig, ValidationReport};
pub use visualization::{PlotCollection, Visualizer};
