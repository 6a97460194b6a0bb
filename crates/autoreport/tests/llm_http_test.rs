//! HTTP-level tests for the LLM providers against a local mock server.
//!
//! Providers use the blocking reqwest client, so every call runs on a
//! blocking thread while wiremock serves from the async runtime.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use autoreport::{
    AnthropicProvider, GeminiProvider, LlmConfig, LlmProvider, OllamaProvider, OpenAIProvider,
    ReportError,
};

async fn generate<P>(provider: P, prompt: &'static str) -> autoreport::Result<String>
where
    P: LlmProvider + 'static,
{
    tokio::task::spawn_blocking(move || provider.generate(prompt))
        .await
        .expect("blocking task panicked")
}

// =============================================================================
// Gemini
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_gemini_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "temperature": 0.6, "maxOutputTokens": 1500 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "## Executive Summary" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = tokio::task::block_in_place(|| GeminiProvider::new("test-key").unwrap().with_base_url(server.uri()));
    let text = generate(provider, "summary").await.unwrap();
    assert_eq!(text, "## Executive Summary");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gemini_safety_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let provider = tokio::task::block_in_place(|| GeminiProvider::new("k").unwrap().with_base_url(server.uri()));
    let err = generate(provider, "summary").await.unwrap_err();
    assert!(err.to_string().contains("Finish reason: SAFETY"), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gemini_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .mount(&server)
        .await;

    let provider = tokio::task::block_in_place(|| GeminiProvider::new("k").unwrap().with_base_url(server.uri()));
    match generate(provider, "summary").await {
        Err(ReportError::Llm { provider, message }) => {
            assert_eq!(provider, "gemini");
            assert!(message.contains("429"));
            assert!(message.contains("RESOURCE_EXHAUSTED"));
        }
        other => panic!("expected LLM error, got {other:?}"),
    }
}

// =============================================================================
// Anthropic
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_anthropic_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({ "model": "claude-sonnet-4-20250514" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "Report body" }],
            "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;

    let provider = tokio::task::block_in_place(|| AnthropicProvider::new("test-key").unwrap().with_base_url(server.uri()));
    assert_eq!(generate(provider, "summary").await.unwrap(), "Report body");
}

// =============================================================================
// OpenAI
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_openai_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Report body" },
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let provider = tokio::task::block_in_place(|| OpenAIProvider::new("test-key").unwrap().with_base_url(server.uri()));
    assert_eq!(generate(provider, "summary").await.unwrap(), "Report body");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_openai_empty_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": null }, "finish_reason": "length" }]
        })))
        .mount(&server)
        .await;

    let provider = tokio::task::block_in_place(|| OpenAIProvider::new("k").unwrap().with_base_url(server.uri()));
    let err = generate(provider, "summary").await.unwrap_err();
    assert!(err.to_string().contains("Finish reason: length"), "{err}");
}

// =============================================================================
// Ollama
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_ollama_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
            "options": { "num_predict": 1500 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "Local report" },
            "done": true
        })))
        .mount(&server)
        .await;

    let provider = tokio::task::block_in_place(|| OllamaProvider::new().unwrap().with_host(&server.uri()));
    assert_eq!(generate(provider, "summary").await.unwrap(), "Local report");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ollama_model_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"error":"model 'mistral' not found"}"#),
        )
        .mount(&server)
        .await;

    let config = LlmConfig::default().with_model("mistral");
    let provider = tokio::task::block_in_place(|| OllamaProvider::with_config(config).unwrap().with_host(&server.uri()));
    let err = generate(provider, "summary").await.unwrap_err();
    assert!(err.to_string().contains("ollama pull mistral"), "{err}");
}
