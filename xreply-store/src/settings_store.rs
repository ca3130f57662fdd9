//! User preferences store.
//!
//! Manages the settings record with persistence and change notification.
//! Generation requests call [`SettingsStore::read_fresh`] so that a provider
//! switch saved elsewhere takes effect on the very next request.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, merge_json, save_json};
use crate::settings::Settings;

// ============================================================================
// Record Helpers
// ============================================================================

/// Returns the defaults as a JSON object.
fn default_record() -> Result<Value, StoreError> {
    Ok(serde_json::to_value(Settings::default())?)
}

/// Reads the raw stored record, or `None` if there is no file.
async fn read_record(path: &Path) -> Result<Option<Value>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Merges a stored record over the defaults and decodes it.
///
/// A stored field that does not decode keeps its default, so one bad value
/// cannot discard the rest of the record.
fn decode_record(stored: &Value) -> Result<Settings, StoreError> {
    let defaults = default_record()?;
    let merged = merge_json(&defaults, stored)?;
    if let Ok(settings) = serde_json::from_value(merged) {
        return Ok(settings);
    }

    let Value::Object(fields) = stored else {
        return Err(StoreError::NotAnObject);
    };
    let mut record = defaults;
    for (key, value) in fields {
        let mut candidate = record.clone();
        if let Value::Object(map) = &mut candidate {
            map.insert(key.clone(), value.clone());
        }
        if serde_json::from_value::<Settings>(candidate.clone()).is_ok() {
            record = candidate;
        } else {
            warn!(key = %key, "Ignoring invalid stored settings value");
        }
    }
    Ok(serde_json::from_value(record)?)
}

/// Decodes a stored record, falling back to defaults when it is not an
/// object.
fn decode_or_default(path: &Path, stored: Option<&Value>) -> Settings {
    let Some(stored) = stored else {
        debug!(path = %path.display(), "Settings file not found, using defaults");
        return Settings::default();
    };
    decode_record(stored).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to decode settings, using defaults");
        Settings::default()
    })
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store holding defaults, backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    /// Creates a store holding `settings`, backed by `path`.
    pub fn with_settings(path: PathBuf, settings: Settings) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file exists but cannot be read.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file or a record that is not an object yields defaults.
    /// Fields that do not decode keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file exists but cannot be read.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let stored = match read_record(&path).await {
            Ok(stored) => stored,
            Err(StoreError::Io(e)) => return Err(StoreError::Io(e)),
            Err(e) => {
                warn!(error = %e, "Failed to parse settings, using defaults");
                None
            }
        };
        if stored.is_some() {
            info!(path = %path.display(), "Loading settings");
        }
        let settings = decode_or_default(&path, stored.as_ref());
        Ok(Self::with_settings(path, settings))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the in-memory settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Re-reads the record from disk and returns it.
    ///
    /// The in-memory copy is replaced, and subscribers are notified if it
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file exists but cannot be read.
    pub async fn read_fresh(&self) -> Result<Settings, StoreError> {
        let stored = match read_record(&self.path).await {
            Ok(stored) => stored,
            Err(StoreError::Io(e)) => return Err(StoreError::Io(e)),
            Err(e) => {
                warn!(error = %e, "Failed to parse settings, using defaults");
                None
            }
        };
        let fresh = decode_or_default(&self.path, stored.as_ref());

        let changed = {
            let mut settings = self.settings.write().await;
            let changed = *settings != fresh;
            settings.clone_from(&fresh);
            changed
        };
        if changed {
            debug!("Settings changed on disk");
            self.notify_change().await;
        }
        Ok(fresh)
    }

    /// Updates the in-memory settings and notifies subscribers.
    ///
    /// Nothing is written until [`SettingsStore::save`].
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Replaces the in-memory settings and notifies subscribers.
    pub async fn replace(&self, settings: Settings) {
        self.update(|s| *s = settings).await;
    }

    /// Saves the in-memory settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Writes the defaults, replacing any stored record.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn install(&self) -> Result<Settings, StoreError> {
        let defaults = Settings::default();
        save_json(&self.path, &defaults).await?;
        info!(path = %self.path.display(), "Installed default settings");
        self.replace(defaults.clone()).await;
        Ok(defaults)
    }

    /// Merges the stored record over the defaults and writes the result.
    ///
    /// Stored values win, new default keys appear, and unknown stored keys
    /// are kept.
    ///
    /// # Errors
    ///
    /// Returns error if the stored record cannot be read or decoded, or the
    /// merged record cannot be written.
    pub async fn upgrade(&self) -> Result<Settings, StoreError> {
        let stored = read_record(&self.path)
            .await?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let merged = merge_json(&default_record()?, &stored)?;
        let settings: Settings = serde_json::from_value(merged.clone())?;

        save_json(&self.path, &merged).await?;
        info!(path = %self.path.display(), "Upgraded settings");
        self.replace(settings.clone()).await;
        Ok(settings)
    }

    /// Sets one stored key and writes the record.
    ///
    /// The key must be a known settings key and the value must decode.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidValue`] for an unknown key or a value
    /// of the wrong shape.
    pub async fn set_value(&self, key: &str, value: Value) -> Result<Settings, StoreError> {
        let defaults = default_record()?;
        if defaults.get(key).is_none() {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
                message: "unknown settings key".to_string(),
            });
        }

        let stored = read_record(&self.path)
            .await?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let mut record = merge_json(&defaults, &stored)?;
        if let Value::Object(map) = &mut record {
            map.insert(key.to_string(), value);
        }

        let settings: Settings =
            serde_json::from_value(record.clone()).map_err(|e| StoreError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        save_json(&self.path, &record).await?;
        debug!(key, "Settings value saved");
        self.replace(settings.clone()).await;
        Ok(settings)
    }
}
