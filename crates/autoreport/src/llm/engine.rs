//! Narrative generation on top of a provider.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ReportError, Result};

use super::prompts::{narrative_prompt, PromptTemplates};
use super::provider::LlmProvider;

/// Turns a data summary into a Markdown report narrative.
#[derive(Clone)]
pub struct NarrativeEngine {
    provider: Arc<dyn LlmProvider>,
    prompts: PromptTemplates,
}

impl NarrativeEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, prompts: PromptTemplates) -> Self {
        Self { provider, prompts }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn prompts(&self) -> &PromptTemplates {
        &self.prompts
    }

    /// Model name as configured on the provider.
    pub fn model_name(&self) -> &str {
        &self.provider.config().model
    }

    /// Generate the narrative for `summary`.
    ///
    /// An empty summary is rejected before any request is made.
    pub fn generate_report_narrative(&self, summary: &str) -> Result<String> {
        if summary.trim().is_empty() {
            return Err(ReportError::EmptyData("data summary is empty".to_string()));
        }

        let prompt = narrative_prompt(&self.prompts, summary);
        info!(
            provider = self.provider.name(),
            model = self.model_name(),
            prompt_chars = prompt.len(),
            "Generating report narrative"
        );

        match self.provider.generate(&prompt) {
            Ok(text) => {
                info!(chars = text.len(), "Narrative generated");
                Ok(text)
            }
            Err(e) => {
                warn!(error = %e, "Narrative generation failed");
                Err(e)
            }
        }
    }
}
