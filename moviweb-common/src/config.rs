//! Configuration loading and root folder resolution

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the root folder location
pub const ROOT_FOLDER_ENV: &str = "MOVIWEB_ROOT_FOLDER";

/// Optional TOML configuration file contents
///
/// Unknown keys are ignored so older config files keep loading after
/// new fields are added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database / JSON documents
    pub root_folder: Option<String>,
    /// OMDb API key for metadata lookups
    pub omdb_api_key: Option<String>,
}

impl TomlConfig {
    /// Load configuration from a specific TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Parse TOML failed: {}", e)))?;
        Ok(config)
    }

    /// Load configuration from the platform default location
    ///
    /// A missing or unreadable config file is not fatal: startup continues
    /// with defaults and a warning.
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring unreadable config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moviweb").join("config.toml"))
}

/// Resolve the root folder following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("moviweb"))
        .unwrap_or_else(|| PathBuf::from("./moviweb_data"))
}

/// Create the root folder directory if it does not exist yet
pub fn ensure_root_folder(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Resolve the OMDb API key: CLI/environment beats the TOML config file.
///
/// Returns `None` when no source provides a non-empty key; callers decide
/// whether that is fatal.
pub fn resolve_omdb_api_key(cli_or_env: Option<&str>, config: &TomlConfig) -> Option<String> {
    if let Some(key) = cli_or_env {
        if !key.trim().is_empty() {
            return Some(key.to_string());
        }
    }
    if let Some(key) = &config.omdb_api_key {
        if !key.trim().is_empty() {
            return Some(key.clone());
        }
    }
    None
}
