//! Application configuration and persistence utilities.
//!
//! Remembers the wizard's last selections and the accounts imported so far.
//! Secrets are never written here.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{AccountInfo, KeypairType, Network};

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Other configuration error.
    #[error("{0}")]
    Other(String),
}

/// Theme configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeConfig {
    /// Follow terminal background.
    #[default]
    System,
    /// Force light theme.
    Light,
    /// Force dark theme.
    Dark,
}

/// An account imported through the wizard (public data only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportedAccount {
    /// SS58-encoded address (generic prefix).
    pub address: String,
    /// Optional label/name for the account.
    #[serde(default)]
    pub label: Option<String>,
    /// Network the account is restricted to, if any.
    #[serde(default)]
    pub network: Option<Network>,
    /// Keypair type used for derivation.
    #[serde(default)]
    pub keypair_type: KeypairType,
    /// Import timestamp (Unix seconds).
    #[serde(default)]
    pub imported_at: u64,
}

impl ImportedAccount {
    /// Public part of a wizard candidate.
    pub fn from_account(account: &AccountInfo, label: Option<String>) -> Self {
        Self {
            address: account.address.clone(),
            label,
            network: account.network(),
            keypair_type: account.keypair_type,
            imported_at: chrono::Utc::now().timestamp().max(0) as u64,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Network selected the last time, `None` for any network.
    #[serde(default)]
    pub network: Option<Network>,
    /// Keypair type selected the last time.
    #[serde(default)]
    pub keypair_type: KeypairType,
    /// Theme preference.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Imported accounts, oldest first.
    #[serde(default)]
    pub accounts: Vec<ImportedAccount>,
}

impl AppConfig {
    /// Record an imported account. Does not add duplicates.
    /// Returns true if the account was added.
    pub fn add_account(&mut self, account: ImportedAccount) -> bool {
        if self
            .accounts
            .iter()
            .any(|a| a.address == account.address && a.keypair_type == account.keypair_type)
        {
            return false;
        }
        self.accounts.push(account);
        true
    }
}

// ==================== Path Utilities ====================

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("xyz", "seedwiz", "seedwiz")
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))
}

/// Get the config directory.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the config file path.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_config_dir().map(|dir| dir.join("config.json"))
}

// ==================== Config I/O ====================

/// Load configuration from disk.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Save configuration to disk.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path()?)
}

/// Load configuration from a specific file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a specific file, creating parent directories.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Backup a corrupted config file for debugging.
pub fn backup_corrupted_config(path: &Path) -> Result<PathBuf, ConfigError> {
    let parent = path
        .parent()
        .ok_or_else(|| ConfigError::Other("Config path has no parent".to_string()))?;
    let backup_path = parent.join(format!(
        "config.backup.{}",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));
    fs::copy(path, &backup_path)?;
    Ok(backup_path)
}
