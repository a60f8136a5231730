//! Application ports (traits) for external dependencies.
//!
//! - **Driven (output) ports**: called by the core, implemented by
//!   `ferrule-adapters`
//!   - `Filesystem`: file operations
//!   - `ProjectLoader`: config file, `package.json` and dotenv loading
//!   - `PluginCatalog`: name → plugin module resolution
//!   - `GlobalPluginStore`: the persisted global plugin list

pub mod output;

pub use output::{
    Filesystem, GlobalPluginStore, LoadedConfig, PluginCatalog, ProjectLoader, ResolvedPlugin,
};

#[cfg(test)]
pub use output::{MockGlobalPluginStore, MockPluginCatalog};
