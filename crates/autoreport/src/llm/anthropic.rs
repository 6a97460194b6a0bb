//! Anthropic Claude API provider implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ReportError, Result};

use super::provider::{LlmConfig, LlmProvider, ProviderKind};

/// Anthropic API base URL.
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

const PROVIDER: &str = "anthropic";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    config: LlmConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let config = LlmConfig::default().with_model(ProviderKind::Anthropic.default_model());
        Self::with_config(api_key, config)
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            config,
        })
    }

    /// Create from environment variable.
    pub fn from_env() -> Result<Self> {
        let config = LlmConfig::default().with_model(ProviderKind::Anthropic.default_model());
        Self::from_env_with_config(config)
    }

    pub fn from_env_with_config(config: LlmConfig) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            ReportError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    /// Point requests at a different host (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| ReportError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }
}

impl LlmProvider for AnthropicProvider {
    fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| ReportError::llm(PROVIDER, format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(ReportError::llm(
                PROVIDER,
                format!("API error ({}): {}", status, error_text),
            ));
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| ReportError::llm(PROVIDER, format!("Failed to parse API response: {}", e)))?;

        let text: String = api_response
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(ReportError::llm(
                PROVIDER,
                match api_response.stop_reason {
                    Some(reason) => format!("LLM generation returned empty text. Finish reason: {}", reason),
                    None => "No text in API response".to_string(),
                },
            ));
        }
        Ok(text)
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Content block in API response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_blocks_deserialize() {
        let body = r#"{"content":[{"type":"text","text":"Report"},{"type":"tool_use","id":"x"}],"stop_reason":"end_turn"}"#;
        let parsed: ApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.content.len(), 2);
        assert_eq!(parsed.content[0].text, "Report");
        assert_eq!(parsed.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_default_model() {
        let provider = AnthropicProvider::new("test").unwrap();
        assert_eq!(provider.config().model, "claude-sonnet-4-20250514");
        assert_eq!(provider.name(), "anthropic");
    }
}
