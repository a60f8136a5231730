//! Reads a project's config file, `package.json` and dotenv files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument};

use ferrule_core::{
    application::{
        ApplicationError,
        ports::{LoadedConfig, ProjectLoader},
    },
    domain::PackageManifest,
    error::FerruleResult,
};

/// Config files tried, in order, when none is given explicitly.
pub const CONFIG_FILES: [&str; 2] = ["ferrule.config.json", "ferrule.config.toml"];

/// Key of `package.json` holding an inline configuration.
pub const PACKAGE_KEY: &str = "ferrule";

const MANIFEST: &str = "package.json";

/// Project loader over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProjectLoader;

impl FileProjectLoader {
    pub fn new() -> Self {
        Self
    }

    fn parse_config(path: &Path) -> FerruleResult<Value> {
        let text = std::fs::read_to_string(path).map_err(|e| ApplicationError::Filesystem {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str::<Value>(&text).map_err(|e| e.to_string()),
            _ => serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| {
            ApplicationError::ConfigParse {
                path: path.to_path_buf(),
                reason,
            }
            .into()
        })
    }

    fn read_package_json(base_dir: &Path) -> FerruleResult<Option<Value>> {
        let path = base_dir.join(MANIFEST);
        if !path.is_file() {
            return Ok(None);
        }
        Self::parse_config(&path).map(Some)
    }
}

impl ProjectLoader for FileProjectLoader {
    #[instrument(skip(self))]
    fn load_config(
        &self,
        base_dir: &Path,
        explicit: Option<&Path>,
    ) -> FerruleResult<Option<LoadedConfig>> {
        if let Some(path) = explicit {
            let data = Self::parse_config(path)?;
            return Ok(Some(LoadedConfig {
                path: path.to_path_buf(),
                data,
            }));
        }

        for name in CONFIG_FILES {
            let path = base_dir.join(name);
            if path.is_file() {
                let data = Self::parse_config(&path)?;
                return Ok(Some(LoadedConfig { path, data }));
            }
        }

        let inline = Self::read_package_json(base_dir)?
            .and_then(|mut manifest| manifest.get_mut(PACKAGE_KEY).map(Value::take))
            .filter(|v| !v.is_null());
        Ok(inline.map(|data| LoadedConfig {
            path: base_dir.join(MANIFEST),
            data,
        }))
    }

    fn load_manifest(&self, base_dir: &Path) -> FerruleResult<PackageManifest> {
        let Some(value) = Self::read_package_json(base_dir)? else {
            debug!("no package.json");
            return Ok(PackageManifest::default());
        };
        serde_json::from_value(value).map_err(|e| {
            ApplicationError::ConfigParse {
                path: base_dir.join(MANIFEST),
                reason: e.to_string(),
            }
            .into()
        })
    }

    #[instrument(skip(self))]
    fn load_env_files(
        &self,
        base_dir: &Path,
        node_env: Option<&str>,
    ) -> FerruleResult<BTreeMap<String, String>> {
        let mut envs = BTreeMap::new();
        // least specific first so that later tiers win
        for file in dotenv_tiers(base_dir, node_env).into_iter().rev() {
            if !file.is_file() {
                continue;
            }
            debug!(file = %file.display(), "using env file");
            let iter = dotenvy::from_path_iter(&file).map_err(|e| ApplicationError::ConfigParse {
                path: file.clone(),
                reason: e.to_string(),
            })?;
            for item in iter {
                let (key, value) = item.map_err(|e| ApplicationError::ConfigParse {
                    path: file.clone(),
                    reason: e.to_string(),
                })?;
                envs.insert(key, value);
            }
        }
        Ok(envs)
    }
}

/// Dotenv files for `node_env`, most specific first.
///
/// `.env.local` is skipped for `test` so tests see the same values on every
/// machine.
pub fn dotenv_tiers(base_dir: &Path, node_env: Option<&str>) -> Vec<PathBuf> {
    let dotenv = base_dir.join(".env");
    let with_suffix = |suffix: &str| {
        let mut name = dotenv.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };

    let mut tiers = Vec::with_capacity(4);
    if let Some(env) = node_env.filter(|e| !e.is_empty()) {
        tiers.push(with_suffix(&format!(".{env}.local")));
        tiers.push(with_suffix(&format!(".{env}")));
    }
    if node_env != Some("test") {
        tiers.push(with_suffix(".local"));
    }
    tiers.push(dotenv);
    tiers
}
