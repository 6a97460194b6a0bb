//! Ollama local LLM provider implementation.
//!
//! Ollama allows running LLMs locally without API keys.
//! Install from: https://ollama.ai

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ReportError, Result};

use super::provider::{LlmConfig, LlmProvider, ProviderKind};

/// Default Ollama host.
const DEFAULT_HOST: &str = "http://localhost:11434";

const PROVIDER: &str = "ollama";

/// Ollama local LLM provider.
pub struct OllamaProvider {
    client: Client,
    api_url: String,
    config: LlmConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses llama3.2 model by default. Make sure you've pulled it:
    /// `ollama pull llama3.2`
    pub fn new() -> Result<Self> {
        Self::with_model(ProviderKind::Ollama.default_model())
    }

    /// Create with a specific model.
    pub fn with_model(model: impl Into<String>) -> Result<Self> {
        Self::with_config(LlmConfig::default().with_model(model))
    }

    /// Create with custom configuration. `OLLAMA_HOST` overrides the host.
    pub fn with_config(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // Local models on CPU are slow on long prompts
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        Ok(Self {
            client,
            api_url: chat_url(&host),
            config,
        })
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.api_url = chat_url(host);
        self
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

fn chat_url(host: &str) -> String {
    format!("{}/api/chat", host.trim_end_matches('/'))
}

impl LlmProvider for OllamaProvider {
    fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            },
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let response = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ReportError::llm(
                        PROVIDER,
                        "Failed to connect to Ollama. Is it running? Start with: ollama serve",
                    )
                } else {
                    ReportError::llm(PROVIDER, format!("Ollama request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            if error_text.contains("not found") {
                return Err(ReportError::llm(
                    PROVIDER,
                    format!(
                        "Model '{}' not found. Pull it with: ollama pull {}",
                        self.config.model, self.config.model
                    ),
                ));
            }

            return Err(ReportError::llm(
                PROVIDER,
                format!("Ollama error ({}): {}", status, error_text),
            ));
        }

        let api_response: OllamaResponse = response
            .json()
            .map_err(|e| ReportError::llm(PROVIDER, format!("Failed to parse Ollama response: {}", e)))?;

        let text = api_response.message.content;
        if text.trim().is_empty() {
            return Err(ReportError::llm(PROVIDER, "LLM generation returned empty text."));
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

/// Ollama chat response (non-streaming).
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url() {
        assert_eq!(chat_url("http://gpu-box:11434/"), "http://gpu-box:11434/api/chat");
    }

    #[test]
    fn test_with_model() {
        let provider = OllamaProvider::with_model("mistral").unwrap().with_host("http://h:1");
        assert_eq!(provider.config().model, "mistral");
        assert_eq!(provider.api_url, "http://h:1/api/chat");
    }
}
