//! Background request handling against a mock provider.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xreply_bridge::{
    BackgroundService, InstallReason, Request, Response, RuntimeBridge, channel,
};
use xreply_core::{
    ErrorKind, HumanizeConfig, INVALID_KEY_MESSAGE, ProviderKind, ReplyError,
    ReplyPostProcessor, TweetContent,
};
use xreply_fetch::{FetchContext, FetchSettings, RetryPolicy};
use xreply_store::{Settings, SettingsStore, Tone};

// ============================================================================
// Fixtures
// ============================================================================

async fn store_with(dir: &TempDir, settings: Settings) -> Arc<SettingsStore> {
    let store = SettingsStore::with_settings(dir.path().join("settings.json"), settings);
    store.save().await.unwrap();
    Arc::new(store)
}

fn service(store: Arc<SettingsStore>, server: &MockServer) -> BackgroundService {
    let retry = RetryPolicy::default().with_base_delay(Duration::from_millis(5));
    BackgroundService::new(store)
        .with_base_url(server.uri())
        .with_fetch_context(
            FetchContext::new().with_settings(FetchSettings::default().with_retry(retry)),
        )
        .with_processor(ReplyPostProcessor::new().with_humanize(HumanizeConfig::disabled()))
        .with_rng(StdRng::seed_from_u64(7))
}

fn openai_settings() -> Settings {
    Settings {
        provider: ProviderKind::OpenAI,
        openai_key: "sk-test-key".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        default_text: "via xreply".to_string(),
        ..Settings::default()
    }
}

fn chat_ok(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    }))
}

fn tweet() -> TweetContent {
    TweetContent::from_text("Is Rust worth it?").with_author("Ada")
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_reply_round_trip_through_port() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .and(body_string_contains("Is Rust worth it?"))
        .and(body_string_contains("- Author: Ada"))
        .respond_with(chat_ok("\"Totally worth it\""))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = Arc::new(service(store_with(&dir, openai_settings()).await, &server));
    let (port, listener) = channel(8);
    tokio::spawn(service.serve(listener));

    let bridge = RuntimeBridge::new(Arc::new(port));
    let reply = bridge.generate_reply(&tweet()).await.unwrap();

    assert_eq!(reply, "Totally worth it via xreply");
}

#[tokio::test]
async fn test_provider_switch_applies_to_next_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "from gemini" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "from claude" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings = Settings {
        gemini_key: "AIza-test".to_string(),
        ..Settings::default()
    };
    let store = store_with(&dir, settings).await;
    let service = service(Arc::clone(&store), &server);

    let first = service.handle(&Request::GenerateTweet { prompt: "p".into() }).await;
    assert_eq!(first.tweet.as_deref(), Some("from gemini"));

    // Another context saves a new provider straight to disk.
    let popup = SettingsStore::load(store.path().to_path_buf()).await.unwrap();
    popup.set_value("claudeKey", json!("sk-ant-test")).await.unwrap();
    popup.set_value("provider", json!("claude")).await.unwrap();

    let second = service.handle(&Request::GenerateTweet { prompt: "p".into() }).await;
    assert_eq!(second.tweet.as_deref(), Some("from claude"));
}

#[tokio::test]
async fn test_rate_limits_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_ok("third time lucky"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service(store_with(&dir, openai_settings()).await, &server);

    let response = service
        .handle(&Request::GenerateReply { tweet_content: tweet() })
        .await;
    assert_eq!(response.reply.as_deref(), Some("third time lucky via xreply"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_forbidden_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": { "message": "nope" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service(store_with(&dir, openai_settings()).await, &server);

    let response = service
        .handle(&Request::GenerateReply { tweet_content: tweet() })
        .await;
    assert!(!response.success);
    assert_eq!(response.error_kind, Some(ErrorKind::Configuration));
    assert_eq!(response.error.as_deref(), Some(INVALID_KEY_MESSAGE));
}

#[tokio::test]
async fn test_missing_key_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_ok("unreachable"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings = Settings {
        openai_key: "   ".to_string(),
        ..openai_settings()
    };
    let service = service(store_with(&dir, settings).await, &server);

    let err = service
        .handle(&Request::GenerateReply { tweet_content: tweet() })
        .await
        .into_text()
        .unwrap_err();
    assert_eq!(err, ReplyError::missing_key(ProviderKind::OpenAI));
}

#[tokio::test]
async fn test_disabled_extension_refuses_work() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        enabled: false,
        ..openai_settings()
    };
    let service = service(store_with(&dir, settings).await, &server);

    let response = service
        .handle(&Request::GenerateTweet { prompt: "p".into() })
        .await;
    assert_eq!(response.error_kind, Some(ErrorKind::Configuration));
}

#[tokio::test]
async fn test_empty_tweet_is_invalid() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let service = service(store_with(&dir, openai_settings()).await, &server);

    let response = service
        .handle(&Request::GenerateReply {
            tweet_content: TweetContent::from_text("  "),
        })
        .await;
    assert_eq!(response.error_kind, Some(ErrorKind::InvalidRequest));
}

#[tokio::test]
async fn test_side_requests_are_acknowledged() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let service = service(store_with(&dir, openai_settings()).await, &server);

    for request in [
        Request::OpenPopup,
        Request::RecordStats {
            stats_action: "inserted".into(),
            data: json!({ "method": "typing" }),
        },
        Request::SettingsUpdated {
            settings: Settings::default(),
        },
    ] {
        assert_eq!(service.handle(&request).await, Response::ack());
    }
}

#[tokio::test]
async fn test_reloaded_background_invalidates_context() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let service = Arc::new(service(store_with(&dir, openai_settings()).await, &server));
    let (port, listener) = channel(8);
    let background = tokio::spawn(service.serve(listener));

    background.abort();
    let _ = background.await;

    let bridge = RuntimeBridge::new(Arc::new(port));
    let err = bridge.generate_reply(&tweet()).await.unwrap_err();
    assert_eq!(err, ReplyError::ContextInvalidated);
    assert_eq!(
        err.user_message(),
        "Extension was reloaded. Please refresh the page and try again."
    );
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_install_and_update_hooks() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    tokio::fs::write(&path, r#"{"tone":"formal","legacyFlag":true}"#)
        .await
        .unwrap();

    let store = Arc::new(SettingsStore::new(path.clone()));
    let service = service(Arc::clone(&store), &server);

    let upgraded = service.on_installed(InstallReason::Update).await.unwrap();
    assert_eq!(upgraded.tone, Tone::Formal);
    assert_eq!(upgraded.max_words, 16);
    assert_eq!(upgraded.extra.get("legacyFlag"), Some(&json!(true)));

    let installed = service.on_installed(InstallReason::Install).await.unwrap();
    assert_eq!(installed, Settings::default());
    let on_disk: serde_json::Value =
        serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
    assert_eq!(on_disk["tone"], "casual");
}
