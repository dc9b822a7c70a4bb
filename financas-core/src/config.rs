//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "databaseFile": "financas.duckdb", "passwordStorage": "argon2id" }
//! }
//! ```
//! Keys this crate does not manage are kept when saving.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::PasswordStorage;
use crate::domain::Argon2Params;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_DATABASE_FILE: &str = "financas.duckdb";

/// Environment override for the password storage scheme
pub const PASSWORD_STORAGE_ENV: &str = "FINANCAS_PASSWORD_STORAGE";

/// How new user passwords are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    Plain,
    #[default]
    Argon2id,
}

impl PasswordScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordScheme::Plain => "plain",
            PasswordScheme::Argon2id => "argon2id",
        }
    }

    /// Gateway storage mode for this scheme, with default hashing parameters
    pub fn storage(&self) -> PasswordStorage {
        match self {
            PasswordScheme::Plain => PasswordStorage::Plain,
            PasswordScheme::Argon2id => PasswordStorage::Argon2id(Argon2Params::default()),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(PasswordScheme::Plain),
            "argon2id" | "argon2" => Ok(PasswordScheme::Argon2id),
            other => Err(anyhow!("Unknown password storage scheme: {}", other)),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_storage: Option<PasswordScheme>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ledger database file name, relative to the data directory
    pub database_file: String,
    pub password_storage: PasswordScheme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            password_storage: PasswordScheme::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing file yields defaults. `FINANCAS_PASSWORD_STORAGE` overrides
    /// the stored scheme.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let mut config = Self::from_settings(&raw);

        if let Ok(value) = std::env::var(PASSWORD_STORAGE_ENV) {
            config.password_storage = value.parse()?;
        }

        Ok(config)
    }

    fn from_settings(raw: &SettingsFile) -> Self {
        let defaults = Self::default();
        Self {
            database_file: raw.app.database_file.clone().unwrap_or(defaults.database_file),
            password_storage: raw.app.password_storage.unwrap_or(defaults.password_storage),
        }
    }

    /// Save config to the data directory, preserving settings we don't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.app.database_file = Some(self.database_file.clone());
        settings.app.password_storage = Some(self.password_storage);

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        let config = Config::from_settings(&raw);
        assert_eq!(config, Config::default());
        assert_eq!(config.database_file, "financas.duckdb");
        assert_eq!(config.password_storage, PasswordScheme::Argon2id);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"app":{"theme":"dark","passwordStorage":"plain"},"plugins":{"x":1}}"#,
        )
        .unwrap();

        let mut config = Config::from_settings(&read_settings(dir.path()).unwrap());
        assert_eq!(config.password_storage, PasswordScheme::Plain);

        config.database_file = "outro.duckdb".to_string();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap())
                .unwrap();
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["app"]["databaseFile"], "outro.duckdb");
        assert_eq!(saved["app"]["passwordStorage"], "plain");
        assert_eq!(saved["plugins"]["x"], 1);
    }

    #[test]
    fn test_parse_scheme() {
        assert_eq!("ARGON2ID".parse::<PasswordScheme>().unwrap(), PasswordScheme::Argon2id);
        assert_eq!("plain".parse::<PasswordScheme>().unwrap(), PasswordScheme::Plain);
        assert!("md5".parse::<PasswordScheme>().is_err());
    }
}
