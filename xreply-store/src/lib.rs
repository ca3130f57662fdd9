// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # xreply Store
//!
//! The persisted settings record and its store.
//!
//! This crate provides:
//!
//! - **Settings**: the flat, camelCase settings record with its defaults
//! - **SettingsStore**: install/upgrade merging, fresh reads, change notification
//! - **Persistence**: file I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use xreply_store::SettingsStore;
//!
//! let store = SettingsStore::load_default().await?;
//!
//! // Every generation request starts from what is on disk.
//! let settings = store.read_fresh().await?;
//! let key = settings.active_api_key();
//!
//! // Subscribe to changes
//! let mut rx = store.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Settings updated!");
//! }
//! ```

pub mod error;
pub mod persistence;
pub mod settings;
pub mod settings_store;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, ensure_dir, load_json, load_json_or_default,
    merge_json, save_json,
};
pub use settings::{CUSTOM_MODEL, DelayRange, Settings, Tone, TypingSpeed};
pub use settings_store::SettingsStore;

#[cfg(test)]
mod persistence_tests;
