//! Persistence round-trip and settings lifecycle tests.

use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::error::StoreError;
use crate::persistence::{ensure_dir, load_json, merge_json, save_json};
use crate::settings::{Settings, Tone, TypingSpeed};
use crate::settings_store::SettingsStore;
use xreply_core::ProviderKind;

fn settings_path(dir: &TempDir) -> PathBuf {
    dir.path().join("xreply").join("settings.json")
}

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.provider = ProviderKind::Claude;
    settings.claude_key = "sk-ant-secret".to_string();
    settings.tone = Tone::Academic;

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
    assert!(!temp_dir.path().join("settings.json.tmp").exists());
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    save_json(&nested_path, &json!({"key": "value"})).await.unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");
    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(matches!(result, Err(StoreError::Io(_))));
}

#[tokio::test]
async fn test_ensure_dir_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dir_path = temp_dir.path().join("test_dir");

    ensure_dir(&dir_path).await.unwrap();
    ensure_dir(&dir_path).await.unwrap();

    assert!(dir_path.is_dir());
}

#[cfg(unix)]
#[tokio::test]
async fn test_saved_settings_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let path = settings_path(&temp_dir);
    save_json(&path, &Settings::default()).await.unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    let dir_mode = std::fs::metadata(path.parent().unwrap())
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(dir_mode, 0o700);
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_keeps_stored_and_fills_defaults() {
    let defaults = serde_json::to_value(Settings::default()).unwrap();
    let merged = merge_json(&defaults, &json!({"tone": "formal"})).unwrap();

    let defaults = defaults.as_object().unwrap();
    let merged = merged.as_object().unwrap();
    assert_eq!(merged.len(), defaults.len());
    assert_eq!(merged["tone"], "formal");
    for (key, value) in defaults {
        if key != "tone" {
            assert_eq!(&merged[key], value, "default for {key} changed");
        }
    }
}

#[test]
fn test_merge_is_shallow() {
    let merged = merge_json(
        &json!({"nested": {"a": 1, "b": 2}}),
        &json!({"nested": {"a": 9}}),
    )
    .unwrap();
    assert_eq!(merged, json!({"nested": {"a": 9}}));
}

// ============================================================================
// Store Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_load_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::load(settings_path(&temp_dir)).await.unwrap();
    assert_eq!(store.get().await, Settings::default());
}

#[tokio::test]
async fn test_load_corrupt_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = settings_path(&temp_dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let store = SettingsStore::load(path).await.unwrap();
    assert_eq!(store.get().await, Settings::default());
}

#[tokio::test]
async fn test_bad_field_keeps_rest_of_record() {
    let temp_dir = TempDir::new().unwrap();
    let path = settings_path(&temp_dir);
    save_json(
        &path,
        &json!({
            "provider": "openai",
            "openaiKey": "sk-kept-key",
            "typingSpeed": "turbo",
            "maxWords": "many",
        }),
    )
    .await
    .unwrap();

    let store = SettingsStore::load(path).await.unwrap();
    let settings = store.get().await;
    assert_eq!(settings.provider, ProviderKind::OpenAI);
    assert_eq!(settings.openai_key, "sk-kept-key");
    assert_eq!(settings.typing_speed, TypingSpeed::Normal);
    assert_eq!(settings.max_words, Settings::default().max_words);

    let fresh = store.read_fresh().await.unwrap();
    assert_eq!(fresh.openai_key, "sk-kept-key");
}

#[tokio::test]
async fn test_install_writes_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(settings_path(&temp_dir));

    store.install().await.unwrap();
    let on_disk: Value = load_json(store.path()).await.unwrap();
    assert_eq!(on_disk["provider"], "gemini");
    assert_eq!(on_disk["typingSpeed"], "normal");
}

#[tokio::test]
async fn test_upgrade_merges_partial_record() {
    let temp_dir = TempDir::new().unwrap();
    let path = settings_path(&temp_dir);
    save_json(&path, &json!({"tone": "formal", "legacyFlag": 1}))
        .await
        .unwrap();

    let store = SettingsStore::new(path.clone());
    let settings = store.upgrade().await.unwrap();

    assert_eq!(settings.tone, Tone::Formal);
    assert_eq!(settings.max_words, 16);
    assert_eq!(settings.open_router_model, "deepseek/deepseek-chat-v3.1:free");

    let on_disk: Value = load_json(&path).await.unwrap();
    assert_eq!(on_disk["tone"], "formal");
    assert_eq!(on_disk["legacyFlag"], 1);
    assert_eq!(on_disk["minWords"], 5);
}

#[tokio::test]
async fn test_read_fresh_sees_external_provider_switch() {
    let temp_dir = TempDir::new().unwrap();
    let path = settings_path(&temp_dir);
    let store = SettingsStore::new(path.clone());
    store.install().await.unwrap();
    let mut rx = store.subscribe();
    let _ = rx.borrow_and_update();

    // Another writer switches the provider.
    let mut other = Settings::default();
    other.provider = ProviderKind::OpenRouter;
    other.open_router_key = "sk-or-v1-abc".to_string();
    save_json(&path, &other).await.unwrap();

    let fresh = store.read_fresh().await.unwrap();
    assert_eq!(fresh.provider, ProviderKind::OpenRouter);
    assert_eq!(fresh.active_api_key(), "sk-or-v1-abc");
    assert_eq!(store.get().await.provider, ProviderKind::OpenRouter);
    assert!(rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_set_value_validates() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(settings_path(&temp_dir));

    let settings = store.set_value("typingSpeed", json!("fast")).await.unwrap();
    assert_eq!(settings.typing_speed, TypingSpeed::Fast);

    assert!(matches!(
        store.set_value("delayRange", json!("9-1")).await,
        Err(StoreError::InvalidValue { .. })
    ));
    assert!(matches!(
        store.set_value("colour", json!("blue")).await,
        Err(StoreError::InvalidValue { .. })
    ));

    let reloaded = SettingsStore::load(store.path().to_path_buf()).await.unwrap();
    assert_eq!(reloaded.get().await.typing_speed, TypingSpeed::Fast);
}

#[tokio::test]
async fn test_update_notifies_without_saving() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(settings_path(&temp_dir));
    let mut rx = store.subscribe();

    store.update(|s| s.include_emoji = false).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 1);
    assert!(!store.path().exists());

    store.save().await.unwrap();
    let on_disk: Value = load_json(store.path()).await.unwrap();
    assert_eq!(on_disk["includeEmoji"], false);
}
