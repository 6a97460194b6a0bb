//! Mock LLM provider for testing and offline runs.

use std::sync::Mutex;

use crate::error::Result;

use super::provider::{LlmConfig, LlmProvider, ProviderKind};

/// Mock LLM provider that returns predictable responses.
///
/// Without a canned response it answers with a fixed Markdown report that
/// mentions how large the prompt was. Every prompt is recorded.
pub struct MockProvider {
    config: LlmConfig,
    response: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::with_config(LlmConfig::default().with_model(ProviderKind::Mock.default_model()))
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Self {
        Self {
            config,
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `response`.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        Ok(format!(
            "## Executive Summary\n\n\
             Offline report generated without a language model ({} prompt characters).\n\n\
             ## Key Findings\n\n\
             - Sales, pricing and regional figures are listed in the data context.\n\
             - Refer to the charts below for trends over time.\n\n\
             ## Recommendations\n\n\
             Configure an LLM provider to receive a written analysis.\n",
            prompt.chars().count()
        ))
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_response_is_markdown() {
        let mock = MockProvider::new();
        let text = mock.generate("abc").unwrap();
        assert!(text.starts_with("## Executive Summary"));
        assert!(text.contains("(3 prompt characters)"));
        assert_eq!(mock.prompts(), vec!["abc".to_string()]);
    }

    #[test]
    fn test_canned_response() {
        let mock = MockProvider::new().with_response("fixed");
        assert_eq!(mock.generate("one").unwrap(), "fixed");
        assert_eq!(mock.generate("two").unwrap(), "fixed");
        assert_eq!(mock.prompts().len(), 2);
    }
}
