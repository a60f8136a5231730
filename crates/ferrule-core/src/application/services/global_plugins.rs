//! Editing the persisted global plugin list.

use std::path::Path;

use tracing::{info, instrument};

use crate::application::ApplicationError;
use crate::application::ports::{GlobalPluginStore, PluginCatalog};
use crate::domain::Provenance;
use crate::error::FerruleResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

pub struct GlobalPlugins<'a> {
    store: &'a dyn GlobalPluginStore,
    catalog: &'a dyn PluginCatalog,
    global_dir: &'a Path,
}

impl<'a> GlobalPlugins<'a> {
    pub fn new(
        store: &'a dyn GlobalPluginStore,
        catalog: &'a dyn PluginCatalog,
        global_dir: &'a Path,
    ) -> Self {
        Self {
            store,
            catalog,
            global_dir,
        }
    }

    /// Add `name` once it resolves from the global plugin directory.
    #[instrument(skip(self))]
    pub fn add(&self, name: &str) -> FerruleResult<AddOutcome> {
        let mut plugins = self.store.load()?;
        if plugins.iter().any(|p| p == name) {
            info!("{name} exists");
            return Ok(AddOutcome::AlreadyPresent);
        }

        self.catalog
            .resolve(name, self.global_dir)
            .map_err(|reason| ApplicationError::PluginNotFound {
                name: name.to_string(),
                provenance: Provenance::Global,
                reason: format!("{reason} (searched {})", self.global_dir.display()),
            })?;

        plugins.push(name.to_string());
        self.store.save(&plugins)?;
        info!("{name} added to global config");
        Ok(AddOutcome::Added)
    }

    /// Remove every occurrence of `name`. Returns whether any was removed.
    #[instrument(skip(self))]
    pub fn delete(&self, name: &str) -> FerruleResult<bool> {
        let plugins = self.store.load()?;
        let before = plugins.len();
        let kept: Vec<String> = plugins.into_iter().filter(|p| p != name).collect();
        self.store.save(&kept)?;
        Ok(kept.len() != before)
    }

    pub fn list(&self) -> FerruleResult<Vec<String>> {
        self.store.load()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::application::plugin::{PluginConstructor, PluginModule};
    use crate::application::ports::{MockGlobalPluginStore, MockPluginCatalog, ResolvedPlugin};
    use crate::error::FerruleError;

    fn resolvable() -> MockPluginCatalog {
        let mut catalog = MockPluginCatalog::new();
        catalog.expect_resolve().returning(|name, dir| {
            if name == "ghost" {
                return Err("cannot find module".into());
            }
            Ok(ResolvedPlugin {
                module: PluginModule::Constructor(PluginConstructor::new(name, |_| {
                    anyhow::bail!("not built in tests")
                })),
                location: dir.join(name).display().to_string(),
            })
        });
        catalog
    }

    fn store_with(names: &[&str]) -> MockGlobalPluginStore {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let mut store = MockGlobalPluginStore::new();
        store.expect_load().returning(move || Ok(names.clone()));
        store
    }

    #[test]
    fn add_persists_resolvable_plugins() {
        let catalog = resolvable();
        let mut store = store_with(&["a"]);
        store
            .expect_save()
            .with(eq(vec!["a".to_string(), "b".to_string()]))
            .times(1)
            .returning(|_| Ok(()));

        let global = GlobalPlugins::new(&store, &catalog, Path::new("/global"));
        assert_eq!(global.add("b").unwrap(), AddOutcome::Added);
    }

    #[test]
    fn add_is_idempotent() {
        let mut catalog = MockPluginCatalog::new();
        catalog.expect_resolve().never();
        let mut store = store_with(&["a"]);
        store.expect_save().never();

        let global = GlobalPlugins::new(&store, &catalog, Path::new("/global"));
        assert_eq!(global.add("a").unwrap(), AddOutcome::AlreadyPresent);
    }

    #[test]
    fn unresolvable_plugin_is_not_saved() {
        let catalog = resolvable();
        let mut store = store_with(&[]);
        store.expect_save().never();

        let global = GlobalPlugins::new(&store, &catalog, Path::new("/global"));
        let err = global.add("ghost").unwrap_err();
        assert!(matches!(
            err,
            FerruleError::Application(ApplicationError::PluginNotFound { .. })
        ));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn delete_filters_the_list() {
        let catalog = MockPluginCatalog::new();
        let mut store = store_with(&["a", "b", "a"]);
        store
            .expect_save()
            .with(eq(vec!["b".to_string()]))
            .times(1)
            .returning(|_| Ok(()));

        let global = GlobalPlugins::new(&store, &catalog, Path::new("/global"));
        assert!(global.delete("a").unwrap());
    }
}
