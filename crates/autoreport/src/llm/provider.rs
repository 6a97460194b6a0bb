//! LLM provider trait and types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

use super::{AnthropicProvider, GeminiProvider, MockProvider, OllamaProvider, OpenAIProvider};

/// Generation settings shared by every provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,

    /// Maximum tokens in the response.
    pub max_tokens: usize,

    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: ProviderKind::Gemini.default_model().to_string(),
            max_tokens: 1500,
            temperature: 0.6,
        }
    }
}

impl LlmConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Trait for LLM providers.
///
/// Implementations must be thread-safe (Send + Sync) so a provider can be
/// shared behind an `Arc`.
pub trait LlmProvider: Send + Sync {
    /// Send a single prompt and return the generated text.
    ///
    /// Empty generations are errors, never `Ok("")`.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

/// Supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    Ollama,
    Mock,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Mock => "mock",
        }
    }

    /// Model used when the configuration names none.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::OpenAI => "gpt-4o",
            ProviderKind::Ollama => "llama3.2",
            ProviderKind::Mock => "mock",
        }
    }

    /// Construct the provider, reading API keys from the environment.
    pub fn build(&self, config: LlmConfig) -> Result<Box<dyn LlmProvider>> {
        Ok(match self {
            ProviderKind::Gemini => Box::new(GeminiProvider::from_env_with_config(config)?),
            ProviderKind::Anthropic => Box::new(AnthropicProvider::from_env_with_config(config)?),
            ProviderKind::OpenAI => Box::new(OpenAIProvider::from_env_with_config(config)?),
            ProviderKind::Ollama => Box::new(OllamaProvider::with_config(config)?),
            ProviderKind::Mock => Box::new(MockProvider::with_config(config)),
        })
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "gpt" => Ok(ProviderKind::OpenAI),
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(ReportError::Config(format!(
                "Unknown LLM provider '{}' (expected gemini, anthropic, openai, ollama or mock)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.temperature, 0.6);
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert_eq!(" ollama ".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert!("bard".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::OpenAI.to_string(), "openai");
    }

    #[test]
    fn test_mock_builds_without_keys() {
        let provider = ProviderKind::Mock.build(LlmConfig::default()).unwrap();
        assert_eq!(provider.name(), "mock");
    }
}
