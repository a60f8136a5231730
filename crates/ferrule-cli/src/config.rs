//! Tool settings.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference.
//! Project configuration is a separate concern owned by `ferrule-core`.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables (`FERRULE_GLOBAL_CONFIG`, `FERRULE_GLOBAL_DIR`)
//! 2. Built-in defaults (platform directories)

use std::path::PathBuf;

use anyhow::bail;

/// Environment variable overriding the global plugin list file.
pub const GLOBAL_CONFIG_ENV: &str = "FERRULE_GLOBAL_CONFIG";

/// Environment variable overriding the global plugin directory.
pub const GLOBAL_DIR_ENV: &str = "FERRULE_GLOBAL_DIR";

const GLOBAL_CONFIG_FILE: &str = ".ferrule.config.json";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON file holding the global plugin list.
    pub global_config: PathBuf,
    /// Directory global plugin names are resolved from.
    pub global_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            global_config: Self::default_global_config(),
            global_dir: Self::default_global_dir(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment over the defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load with a custom environment lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(GLOBAL_CONFIG_ENV) {
            if path.trim().is_empty() {
                bail!("{GLOBAL_CONFIG_ENV} is set but empty");
            }
            config.global_config = PathBuf::from(path);
        }
        if let Some(dir) = lookup(GLOBAL_DIR_ENV) {
            if dir.trim().is_empty() {
                bail!("{GLOBAL_DIR_ENV} is set but empty");
            }
            config.global_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// `~/.ferrule.config.json`, or the current directory without a home.
    pub fn default_global_config() -> PathBuf {
        directories::BaseDirs::new()
            .map(|d| d.home_dir().join(GLOBAL_CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(GLOBAL_CONFIG_FILE))
    }

    /// Platform data directory, e.g. `~/.local/share/ferrule/plugins`.
    pub fn default_global_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "ferrule", "ferrule")
            .map(|d| d.data_dir().join("plugins"))
            .unwrap_or_else(|| PathBuf::from(".ferrule").join("plugins"))
    }
}
