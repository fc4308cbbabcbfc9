//! Configuration file handling.
//!
//! Reads from `~/.config/acctkeep/acctkeep.toml`

use acctkeep_core::DEFAULT_STORAGE_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the persisted account slot.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Name of the slot the account list is written to.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Whether passwords are shown as asterisks.
    #[serde(default = "default_mask_passwords")]
    pub mask_passwords: bool,
    /// Write logs here instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("acctkeep"))
        .unwrap_or_else(|| PathBuf::from(".acctkeep"))
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_mask_passwords() -> bool {
    true
}

/// How [`Config::load`] obtained the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    /// No file existed; defaults were written to this path.
    Created(PathBuf),
    /// Read from this path.
    Loaded(PathBuf),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
            mask_passwords: default_mask_passwords(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    ///
    /// Returns where the config came from so it can be logged once logging is up.
    pub fn load(custom_path: Option<PathBuf>) -> Result<(Self, ConfigOrigin)> {
        match custom_path {
            Some(path) => Self::load_from(path, false),
            None => Self::load_from(Self::config_path()?, true),
        }
    }

    fn load_from(config_path: PathBuf, create_missing: bool) -> Result<(Self, ConfigOrigin)> {
        if !config_path.exists() {
            if !create_missing {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
            let config = Config::default();
            config.save_to(&config_path)?;
            return Ok((config, ConfigOrigin::Created(config_path)));
        }

        let config = Self::read(&config_path)?;
        Ok((config, ConfigOrigin::Loaded(config_path)))
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("acctkeep").join("acctkeep.toml"))
    }
}
