//! Driven (output) ports - implemented by infrastructure.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::application::plugin::PluginModule;
use crate::domain::PackageManifest;
use crate::error::FerruleResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `ferrule_adapters::filesystem::LocalFilesystem` (production)
/// - `ferrule_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> FerruleResult<()>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> FerruleResult<()>;

    /// Append content to a file, creating it if needed.
    fn append_file(&self, path: &Path, content: &str) -> FerruleResult<()>;

    fn read_to_string(&self, path: &Path) -> FerruleResult<String>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Names of the direct children of a directory, sorted.
    fn list_dir(&self, path: &Path) -> FerruleResult<Vec<String>>;

    fn remove_file(&self, path: &Path) -> FerruleResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> FerruleResult<()>;
}

/// A project config file found on disk, parsed to JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub data: Value,
}

/// Port for reading project-level inputs.
pub trait ProjectLoader: Send + Sync {
    /// Find and parse the project config.
    ///
    /// With `explicit` set only that file is read. Otherwise the loader's
    /// discovery order applies and `None` means no config file exists.
    fn load_config(
        &self,
        base_dir: &Path,
        explicit: Option<&Path>,
    ) -> FerruleResult<Option<LoadedConfig>>;

    /// Read `package.json`; a missing manifest is an empty one.
    fn load_manifest(&self, base_dir: &Path) -> FerruleResult<PackageManifest>;

    /// Read the dotenv tiers for `node_env`, most specific value winning.
    fn load_env_files(
        &self,
        base_dir: &Path,
        node_env: Option<&str>,
    ) -> FerruleResult<BTreeMap<String, String>>;
}

/// A plugin module located by name.
#[derive(Clone)]
pub struct ResolvedPlugin {
    pub module: PluginModule,
    /// Where the module was found, for diagnostics.
    pub location: String,
}

impl std::fmt::Debug for ResolvedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedPlugin")
            .field("module", &self.module.name())
            .field("location", &self.location)
            .finish()
    }
}

/// Port resolving plugin names to modules.
///
/// Resolution is rooted at `base_dir`: the project root for custom plugins,
/// the global plugin directory for global ones.
#[cfg_attr(test, mockall::automock)]
pub trait PluginCatalog: Send + Sync {
    fn resolve(&self, name: &str, base_dir: &Path) -> Result<ResolvedPlugin, String>;
}

/// Port for the persisted, machine-wide plugin list.
#[cfg_attr(test, mockall::automock)]
pub trait GlobalPluginStore: Send + Sync {
    fn load(&self) -> FerruleResult<Vec<String>>;

    fn save(&self, plugins: &[String]) -> FerruleResult<()>;
}
