//! LLM providers and the report narrative engine.
//!
//! # Supported Providers
//!
//! - **Gemini** - Google models via API (requires `GOOGLE_API_KEY`)
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (honours `OLLAMA_HOST`)
//! - **Mock** - Deterministic offline output
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use autoreport::llm::{GeminiProvider, NarrativeEngine, PromptTemplates};
//!
//! let provider = GeminiProvider::from_env().unwrap();
//! let engine = NarrativeEngine::new(Arc::new(provider), PromptTemplates::default());
//! let narrative = engine.generate_report_narrative("Total Revenue: $1,000").unwrap();
//! ```

mod anthropic;
mod engine;
mod gemini;
mod mock;
mod ollama;
mod openai;
mod prompts;
mod provider;

pub use anthropic::AnthropicProvider;
pub use engine::NarrativeEngine;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use prompts::{narrative_prompt, PromptTemplates, DIRECTIVES_END};
pub use provider::{LlmConfig, LlmProvider, ProviderKind};
