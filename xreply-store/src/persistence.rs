//! File persistence helpers.
//!
//! Handles loading and saving the settings record to disk with proper
//! security: the record holds API keys.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/xreply`
/// - Linux: `~/.config/xreply`
/// - Windows: `%APPDATA%\xreply`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("xreply"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("xreply"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Set restrictive permissions");
    Ok(())
}

/// Sets restrictive directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0700", "Set restrictive directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Creates the parent directory with restrictive permissions.
///
/// Only the innermost directory is tightened; ancestors such as
/// `~/.config` are left alone.
async fn create_secure_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!(path = %parent.display(), "Creating secure directory");
            tokio::fs::create_dir_all(parent).await?;
            set_restrictive_dir_permissions(parent).await?;
        }
    }
    Ok(())
}

/// Saves data to a JSON file with secure permissions.
///
/// Creates the parent directory if it doesn't exist, writes atomically
/// (via temp file + rename), and sets restrictive permissions on Unix.
///
/// # Errors
///
/// Returns error if the data cannot be serialized or written.
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    create_secure_parent_dir(path).await?;

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    set_restrictive_permissions(&temp_path).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), "JSON file saved securely");
    Ok(())
}

/// Loads data from a JSON file.
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Loads data from a JSON file, returning default if not found.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(e) => {
            if !matches!(e, StoreError::Io(_)) {
                warn!(path = %path.display(), error = %e, "Failed to load, using defaults");
            }
            T::default()
        }
    }
}

/// Ensures a directory exists with secure permissions.
///
/// # Errors
///
/// Returns error if the directory cannot be created.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path).await?;
        set_restrictive_dir_permissions(path).await?;
    }
    Ok(())
}

// ============================================================================
// Merging
// ============================================================================

/// Shallow object merge: every key of `defaults`, overridden by `stored`.
///
/// Keys only present in `stored` are kept. Values are replaced whole,
/// never merged recursively.
///
/// # Errors
///
/// Returns [`StoreError::NotAnObject`] unless both values are objects.
pub fn merge_json(defaults: &Value, stored: &Value) -> Result<Value, StoreError> {
    let (Value::Object(defaults), Value::Object(stored)) = (defaults, stored) else {
        return Err(StoreError::NotAnObject);
    };

    let mut merged = defaults.clone();
    for (key, value) in stored {
        merged.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(merged))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        let path = default_config_dir();
        assert!(!path.as_os_str().is_empty());
    }

    #[test]
    fn test_default_settings_path() {
        let path = default_settings_path();
        assert!(path.ends_with("settings.json"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        tokio::fs::write(&test_file, "{}").await.unwrap();
        set_restrictive_permissions(&test_file).await.unwrap();

        let metadata = tokio::fs::metadata(&test_file).await.unwrap();
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "File should have 0600 permissions");
    }

    #[test]
    fn test_merge_rejects_non_objects() {
        assert!(matches!(
            merge_json(&serde_json::json!({}), &serde_json::json!([1])),
            Err(StoreError::NotAnObject)
        ));
    }
}
