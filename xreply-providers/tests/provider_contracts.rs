//! HTTP contract tests against a mock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xreply_core::{INVALID_KEY_MESSAGE, ProviderKind, RATE_LIMIT_MESSAGE, ReplyError};
use xreply_fetch::{FetchContext, FetchError, FetchSettings, GenerationClient, RetryPolicy};
use xreply_providers::ProviderRegistry;

fn fast_context() -> FetchContext {
    FetchContext::new().with_settings(
        FetchSettings::default()
            .with_retry(RetryPolicy::default().with_base_delay(Duration::from_millis(5))),
    )
}

fn client_for(kind: ProviderKind, server: &MockServer) -> GenerationClient {
    let adapter = ProviderRegistry::get(kind).unwrap().adapter_at(&server.uri());
    GenerationClient::new(adapter, fast_context())
}

fn chat_ok(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    }))
}

// ============================================================================
// Request shapes
// ============================================================================

#[tokio::test]
async fn test_gemini_request_contract() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "AIza-test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "prompt" }] }],
            "generationConfig": { "topK": 40, "maxOutputTokens": 150, "candidateCount": 1 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": " nice one " }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(ProviderKind::Gemini, &server)
        .generate("prompt", "AIza-test-key", None)
        .await
        .unwrap();
    assert_eq!(text, "nice one");
}

#[tokio::test]
async fn test_openrouter_headers_and_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-or-v1-test"))
        .and(header("http-referer", "https://x.com"))
        .and(header("x-title", "X Auto Reply Assistant"))
        .and(body_partial_json(json!({
            "model": "meta/llama:free",
            "messages": [{ "role": "user", "content": "prompt" }],
            "max_tokens": 150
        })))
        .respond_with(chat_ok("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(ProviderKind::OpenRouter, &server)
        .generate("prompt", "sk-or-v1-test", Some("meta/llama:free"))
        .await
        .unwrap();
    assert_eq!(text, "hello");
}

#[tokio::test]
async fn test_deepseek_default_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "deepseek-chat" })))
        .respond_with(chat_ok("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let completion = client_for(ProviderKind::DeepSeek, &server)
        .complete("prompt", "sk-deep", Some("  "))
        .await
        .unwrap();
    assert_eq!(completion.model, "deepseek-chat");
    assert_eq!(completion.attempts, 1);
}

#[tokio::test]
async fn test_claude_request_contract() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-opus-4-20250514",
            "max_tokens": 150
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "Sounds right" }],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(ProviderKind::Claude, &server)
        .generate("prompt", "sk-ant-test", None)
        .await
        .unwrap();
    assert_eq!(text, "Sounds right");
}

// ============================================================================
// Retry behaviour
// ============================================================================

#[tokio::test]
async fn test_rate_limits_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(chat_ok("third time"))
        .expect(1)
        .mount(&server)
        .await;

    let completion = client_for(ProviderKind::OpenAI, &server)
        .complete("prompt", "sk-test", None)
        .await
        .unwrap();
    assert_eq!(completion.text, "third time");
    assert_eq!(completion.attempts, 3);
}

#[tokio::test]
async fn test_persistent_rate_limit_exhausts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(4)
        .mount(&server)
        .await;

    let err = client_for(ProviderKind::OpenAI, &server)
        .generate("prompt", "sk-test", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::RetriesExhausted { attempts: 4, .. }));

    let reply: ReplyError = err.into();
    assert_eq!(reply.user_message(), RATE_LIMIT_MESSAGE);
}

#[tokio::test]
async fn test_forbidden_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "error": { "message": "permission denied" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(ProviderKind::Claude, &server)
        .generate("prompt", "sk-ant-bad", None)
        .await
        .unwrap_err();
    assert!(err.is_auth());

    let reply: ReplyError = err.into();
    assert!(reply.is_configuration());
    assert_eq!(reply.user_message(), INVALID_KEY_MESSAGE);
}

#[tokio::test]
async fn test_gemini_invalid_key_400_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid. Please pass a valid API key." }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(ProviderKind::Gemini, &server)
        .generate("prompt", "AIza-wrong", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_server_error_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(chat_ok("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(ProviderKind::DeepSeek, &server)
        .generate("prompt", "sk-deep", None)
        .await
        .unwrap();
    assert_eq!(text, "recovered");
}

// ============================================================================
// Response validation
// ============================================================================

#[tokio::test]
async fn test_malformed_response_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(ProviderKind::OpenAI, &server)
        .generate("prompt", "sk-test", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
    assert_eq!(err.to_string(), "Invalid response structure from OpenAI API");
}

#[tokio::test]
async fn test_blank_text_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "   " }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(ProviderKind::Claude, &server)
        .generate("prompt", "sk-ant-test", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::EmptyResponse(_)));
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_ok("unreachable"))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(ProviderKind::OpenRouter, &server)
        .generate("prompt", "   ", None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "OpenRouter API key not configured");
}

#[tokio::test]
async fn test_allowlist_blocks_unknown_host() {
    let server = MockServer::start().await;
    let ctx = fast_context().with_http(
        xreply_fetch::HttpClient::new().restrict_to(ProviderRegistry::allowed_domains()),
    );
    let adapter = ProviderRegistry::get(ProviderKind::OpenAI)
        .unwrap()
        .adapter_at(&server.uri());

    let err = GenerationClient::new(adapter, ctx)
        .generate("prompt", "sk-test", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::DomainNotAllowed(_)));
}
