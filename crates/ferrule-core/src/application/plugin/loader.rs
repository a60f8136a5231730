use std::path::Path;

use tracing::{debug, warn};

use crate::application::plugin::{PluginDescriptor, PluginSpecifier, UnresolvedPlugin};
use crate::application::ports::PluginCatalog;

/// Turn specifiers into descriptors, in order.
///
/// Named specifiers are resolved through `catalog`, rooted at `base_dir`.
/// Resolution failures are carried in the descriptor, not returned: the
/// registry decides what a failure means for its tier. Nothing is
/// instantiated or applied here.
pub fn load_plugins<I>(
    specifiers: I,
    base_dir: &Path,
    catalog: &dyn PluginCatalog,
) -> Vec<PluginDescriptor>
where
    I: IntoIterator<Item = PluginSpecifier>,
{
    specifiers
        .into_iter()
        .map(|spec| match spec {
            PluginSpecifier::Module(module) => PluginDescriptor {
                module: Ok(module),
                args: Vec::new(),
                location: None,
            },
            PluginSpecifier::WithArgs(module, args) => PluginDescriptor {
                module: Ok(module),
                args,
                location: None,
            },
            PluginSpecifier::Named(name) => resolve(&name, Vec::new(), base_dir, catalog),
            PluginSpecifier::NamedWithArgs(name, args) => resolve(&name, args, base_dir, catalog),
        })
        .collect()
}

fn resolve(
    name: &str,
    args: Vec<serde_json::Value>,
    base_dir: &Path,
    catalog: &dyn PluginCatalog,
) -> PluginDescriptor {
    match catalog.resolve(name, base_dir) {
        Ok(resolved) => {
            debug!(plugin = name, location = %resolved.location, "plugin resolved");
            PluginDescriptor {
                module: Ok(resolved.module),
                args,
                location: Some(resolved.location),
            }
        }
        Err(reason) => {
            warn!(plugin = name, base_dir = %base_dir.display(), %reason, "plugin not resolvable");
            PluginDescriptor {
                module: Err(UnresolvedPlugin {
                    name: name.to_string(),
                    reason,
                }),
                args,
                location: Some(String::new()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::predicate::*;
    use serde_json::{Value, json};

    use super::*;
    use crate::application::host::Host;
    use crate::application::plugin::{Plugin, PluginModule};
    use crate::application::ports::{MockPluginCatalog, ResolvedPlugin};

    struct Noop(&'static str);

    #[async_trait]
    impl Plugin for Noop {
        fn name(&self) -> &str {
            self.0
        }
        async fn apply(&self, _host: &mut Host, _args: &[Value]) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn preserves_order_and_args() {
        let mut catalog = MockPluginCatalog::new();
        catalog
            .expect_resolve()
            .with(eq("sass"), eq(PathBuf::from("/p")))
            .returning(|_, _| {
                Ok(ResolvedPlugin {
                    module: PluginModule::instance(Noop("sass")),
                    location: "/p/node_modules/sass".into(),
                })
            });

        let specs = vec![
            PluginSpecifier::Module(PluginModule::instance(Noop("a"))),
            PluginSpecifier::NamedWithArgs("sass".into(), vec![json!({ "x": 1 })]),
            PluginSpecifier::WithArgs(PluginModule::instance(Noop("b")), vec![json!(2)]),
        ];
        let out = load_plugins(specs, Path::new("/p"), &catalog);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].module.as_ref().unwrap().name(), "a");
        assert_eq!(out[1].location.as_deref(), Some("/p/node_modules/sass"));
        assert_eq!(out[1].args, vec![json!({ "x": 1 })]);
        assert_eq!(out[2].args, vec![json!(2)]);
    }

    #[test]
    fn unresolved_names_carry_the_reason() {
        let mut catalog = MockPluginCatalog::new();
        catalog
            .expect_resolve()
            .returning(|name, _| Err(format!("cannot find module '{name}'")));

        let out = load_plugins(
            [PluginSpecifier::Named("missing".into())],
            Path::new("/p"),
            &catalog,
        );
        let err = out[0].module.as_ref().unwrap_err();
        assert_eq!(err.name, "missing");
        assert!(err.reason.contains("cannot find module"));
        assert_eq!(out[0].location.as_deref(), Some(""));
    }

    #[test]
    fn in_process_modules_skip_the_catalog() {
        let catalog = MockPluginCatalog::new();
        let module = PluginModule::Instance(Arc::new(Noop("inline")));
        let out = load_plugins([PluginSpecifier::Module(module)], Path::new("/p"), &catalog);
        assert!(out[0].location.is_none());
    }
}
