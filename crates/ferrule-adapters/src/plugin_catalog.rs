//! In-process plugin catalog.
//!
//! Plugins are registered up front, either for every base directory or
//! rooted at one directory (a project or the global plugin directory).
//! A rooted plugin only resolves for base directories inside that root.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::debug;

use ferrule_core::application::ports::{PluginCatalog, ResolvedPlugin};
use ferrule_core::prelude::PluginModule;

#[derive(Clone)]
struct CatalogEntry {
    root: Option<PathBuf>,
    module: PluginModule,
}

/// Thread-safe catalog of named plugin modules.
#[derive(Clone, Default)]
pub struct StaticCatalog {
    inner: Arc<RwLock<HashMap<String, Vec<CatalogEntry>>>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` under `name` for every base directory.
    pub fn register(&self, name: impl Into<String>, module: PluginModule) -> &Self {
        self.insert(name.into(), None, module)
    }

    /// Register `module` under `name`, resolvable only from inside `root`.
    pub fn register_in(
        &self,
        root: impl Into<PathBuf>,
        name: impl Into<String>,
        module: PluginModule,
    ) -> &Self {
        self.insert(name.into(), Some(root.into()), module)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, name: String, root: Option<PathBuf>, module: PluginModule) -> &Self {
        match self.inner.write() {
            Ok(mut inner) => inner
                .entry(name)
                .or_default()
                .push(CatalogEntry { root, module }),
            Err(_) => tracing::error!(plugin = %name, "plugin catalog lock poisoned"),
        }
        self
    }
}

impl PluginCatalog for StaticCatalog {
    fn resolve(&self, name: &str, base_dir: &Path) -> Result<ResolvedPlugin, String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| "plugin catalog lock poisoned".to_string())?;

        // Rooted registrations take precedence over unrooted ones.
        let candidates = inner.get(name).into_iter().flatten();
        let mut fallback = None;
        for entry in candidates {
            match &entry.root {
                Some(root) if base_dir.starts_with(root) => {
                    let location = root.join("node_modules").join(name);
                    debug!(plugin = name, location = %location.display(), "plugin resolved");
                    return Ok(ResolvedPlugin {
                        module: entry.module.clone(),
                        location: location.display().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    fallback.get_or_insert(entry);
                }
            }
        }

        fallback
            .map(|entry| ResolvedPlugin {
                module: entry.module.clone(),
                location: format!("ferrule:{name}"),
            })
            .ok_or_else(|| {
                format!(
                    "Cannot find module '{name}' from '{}'",
                    base_dir.display()
                )
            })
    }
}
