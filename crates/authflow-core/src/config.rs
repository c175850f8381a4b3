//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the auth
//! service base URL and where the session is persisted.
//!
//! Configuration is stored at `~/.config/authflow/config.json`. The
//! `AUTHFLOW_API_URL` environment variable overrides the stored base URL.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::DEFAULT_BASE_URL;
use crate::auth::SessionStore;
use crate::storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "authflow";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Subdirectory of the cache directory holding session keys
const SESSION_DIR: &str = "session";

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "AUTHFLOW_API_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One file per key under `session_dir`
    #[default]
    File,
    /// One OS keychain entry per key
    Keyring,
    /// Nothing persists past the process
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub storage: StorageBackend,
    pub session_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            storage: StorageBackend::default(),
            session_dir: None,
        }
    }
}

impl Config {
    /// Load the user config, falling back to defaults, then apply env overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(url);
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_api_url_override(&mut self, url: String) {
        let url = url.trim();
        if !url.is_empty() {
            self.api_base_url = url.to_string();
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the file storage backend
    pub fn session_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.session_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(SESSION_DIR))
    }

    pub fn open_storage(&self) -> Result<Box<dyn KeyValueStore>> {
        let storage: Box<dyn KeyValueStore> = match self.storage {
            StorageBackend::File => {
                let dir = self.session_dir()?;
                Box::new(FileStore::new(dir.clone()).with_context(|| {
                    format!("Failed to open session directory {}", dir.display())
                })?)
            }
            StorageBackend::Keyring => Box::new(KeyringStore::default()),
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        };
        Ok(storage)
    }

    /// Open the configured storage and load any persisted session from it
    pub fn open_session_store(&self) -> Result<SessionStore> {
        let storage = self.open_storage()?;
        SessionStore::open(storage).context("Failed to load persisted session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.storage, StorageBackend::File);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"storage":"memory"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.api_base_url, "http://localhost:4000");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "http://auth.internal:8080".to_string(),
            storage: StorageBackend::Keyring,
            session_dir: Some(dir.path().join("session")),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_api_url_override_ignores_blank() {
        let mut config = Config::default();
        config.apply_api_url_override("   ".to_string());
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        config.apply_api_url_override(" http://example.test ".to_string());
        assert_eq!(config.api_base_url, "http://example.test");
    }

    #[test]
    fn test_open_session_store_from_file_backend() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config {
            session_dir: Some(dir.path().join("session")),
            ..Config::default()
        };
        std::fs::create_dir_all(dir.path().join("session")).unwrap();
        std::fs::write(dir.path().join("session").join("refresh_token"), "r").unwrap();

        let store = config.open_session_store().unwrap();
        assert_eq!(store.session().refresh_token(), Some("r"));
        assert_eq!(store.session().access_token(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
