//! Persisted CLI settings.
//!
//! Settings remember the last login email, an API URL override and the
//! preferred token store. They are stored at
//! `~/.config/clipers/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "clipers";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Where access and refresh tokens are kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// JSON file in the user cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Process memory only; nothing survives the command
    Memory,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::File => write!(f, "file"),
            StoreKind::Keyring => write!(f, "keyring"),
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub api_url: Option<String>,
    pub last_email: Option<String>,
    pub token_store: Option<StoreKind>,
}

impl Settings {
    /// Settings from the default location, or defaults when none are saved.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Invalid settings file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write {}", path.display()))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_shape() {
        let settings = Settings {
            api_url: Some("http://localhost:8080".to_string()),
            last_email: Some("ana@example.com".to_string()),
            token_store: Some(StoreKind::Keyring),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["token_store"], "keyring");

        let parsed: Settings = serde_json::from_str(r#"{"last_email":"ana@example.com"}"#).unwrap();
        assert_eq!(parsed.last_email.as_deref(), Some("ana@example.com"));
        assert_eq!(parsed.token_store, None);
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipers").join(CONFIG_FILE);

        let missing = Settings::load_from(&path).unwrap();
        assert!(missing.last_email.is_none());

        let settings = Settings {
            last_email: Some("ana@example.com".to_string()),
            token_store: Some(StoreKind::Memory),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.last_email.as_deref(), Some("ana@example.com"));
        assert_eq!(loaded.token_store, Some(StoreKind::Memory));
    }

    #[test]
    fn test_corrupt_settings_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{oops").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
