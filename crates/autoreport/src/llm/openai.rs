//! OpenAI GPT API provider implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ReportError, Result};

use super::provider::{LlmConfig, LlmProvider, ProviderKind};

/// OpenAI API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const PROVIDER: &str = "openai";

/// OpenAI GPT provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    config: LlmConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let config = LlmConfig::default().with_model(ProviderKind::OpenAI.default_model());
        Self::with_config(api_key, config)
    }

    /// Create a new OpenAI provider with custom configuration.
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
        let config = LlmConfig::default().with_model(ProviderKind::OpenAI.default_model());
        Self::from_env_with_config(config)
    }

    pub fn from_env_with_config(config: LlmConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ReportError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    /// Point requests at a different host (proxies, compatible servers, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| ReportError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }
}

impl LlmProvider for OpenAIProvider {
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
            .post(format!("{}/v1/chat/completions", self.base_url))
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

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::llm(PROVIDER, "No choices in API response"))?;

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ReportError::llm(
                PROVIDER,
                format!(
                    "LLM generation returned empty text. Finish reason: {}",
                    choice.finish_reason.as_deref().unwrap_or("unknown")
                ),
            )),
        }
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// OpenAI API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

/// Choice in API response.
#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Message in choice.
#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}
