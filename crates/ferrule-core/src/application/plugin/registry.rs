use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::application::error::ApplicationError;
use crate::application::host::Host;
use crate::application::plugin::{Plugin, PluginDescriptor, PluginModule, describe_tier};
use crate::domain::{Provenance, validation::validate_plugin_name};
use crate::error::FerruleResult;

/// A plugin the registry has seen, applied or skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPlugin {
    pub name: String,
    pub provenance: Provenance,
    pub location: Option<String>,
    /// Skipped because an earlier plugin already used the name.
    pub skipped: bool,
}

/// Per-run plugin bookkeeping: every plugin seen, and the names in use.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    applied: Vec<AppliedPlugin>,
    names: HashSet<String>,
}

impl PluginRegistry {
    pub fn applied(&self) -> &[AppliedPlugin] {
        &self.applied
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn used_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Instantiate, name, de-duplicate and apply one tier of plugins, in order.
///
/// The first error aborts the tier; plugins after it are not applied.
#[instrument(skip_all, fields(tier = %provenance, count = descriptors.len()))]
pub async fn init_plugins(
    host: &mut Host,
    descriptors: Vec<PluginDescriptor>,
    provenance: Provenance,
) -> FerruleResult<()> {
    debug!("initializing {}", describe_tier(provenance));

    for descriptor in descriptors {
        let source_ref = descriptor.source_ref();
        let location = descriptor.location.clone().filter(|l| !l.is_empty());

        let module = match descriptor.module {
            Ok(module) => module,
            Err(unresolved) => {
                return Err(ApplicationError::PluginNotFound {
                    name: unresolved.name,
                    provenance,
                    reason: unresolved.reason,
                }
                .into());
            }
        };

        let (instance, fallback): (Arc<dyn Plugin>, String) = match &module {
            PluginModule::Instance(plugin) => (plugin.clone(), String::new()),
            PluginModule::Constructor(ctor) => match ctor.build(&descriptor.args) {
                Ok(plugin) => (plugin, ctor.name().to_string()),
                Err(source) => {
                    error!(
                        "[{provenance}] plugin {} apply error {}",
                        ctor.name(),
                        location.as_deref().unwrap_or_default()
                    );
                    return Err(ApplicationError::PluginApply {
                        plugin: ctor.name().to_string(),
                        provenance,
                        location,
                        source: source.into(),
                    }
                    .into());
                }
            },
        };

        let name = match instance.name() {
            "" => fallback,
            own => own.to_string(),
        };
        validate_plugin_name(&name, &source_ref)?;

        let collision = host.plugins.is_used(&name);
        host.plugins.applied.push(AppliedPlugin {
            name: name.clone(),
            provenance,
            location: location.clone(),
            skipped: collision,
        });

        if collision {
            warn!(
                "[{provenance}] \"{name}\" plugin name already exists\n{}",
                location.as_deref().unwrap_or_default()
            );
            continue;
        }

        if let Err(source) = instance.apply(host, &descriptor.args).await {
            error!(
                "[{provenance}] plugin {name} apply error {}",
                location.as_deref().unwrap_or_default()
            );
            return Err(ApplicationError::PluginApply {
                plugin: name,
                provenance,
                location,
                source: source.into(),
            }
            .into());
        }

        debug!("[{provenance}] use plugin {name}");
        host.plugins.names.insert(name);
    }

    Ok(())
}
