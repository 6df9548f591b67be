//! Optional configuration read from `<data_dir>/config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fields::{CategoryFilter, SortKey};
use crate::store::DEFAULT_KEY;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the task list is stored under.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { key: default_key() }
    }
}

/// Initial view settings for `list` and the TUI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub filter: CategoryFilter,
    #[serde(default)]
    pub sort: SortKey,
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

/// Load `config.toml` from `data_dir`, falling back to defaults when absent.
pub fn load_config(data_dir: &Path) -> Result<Config> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub const DATA_DIR_ENV: &str = "TM_DATA_DIR";

/// Data directory: `--data-dir` first, then `TM_DATA_DIR`, then `~/.tm`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    resolve_data_dir_with(explicit, std::env::var(DATA_DIR_ENV).ok().as_deref())
}

fn resolve_data_dir_with(explicit: Option<&Path>, env_val: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_val.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tm")
}
