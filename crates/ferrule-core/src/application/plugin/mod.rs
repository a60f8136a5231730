//! Plugin contract, specifiers and descriptors.
//!
//! A plugin is anything implementing [`Plugin`]. It reaches the registry
//! either as a ready instance or as a constructor that is called once with
//! the plugin's arguments ([`PluginModule`]).

pub mod loader;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::host::Host;
use crate::domain::{PluginRef, Provenance};

pub use loader::load_plugins;
pub use registry::{AppliedPlugin, PluginRegistry, init_plugins};

/// Extension unit applied to the host once per run.
///
/// `apply` typically registers hook callbacks and command types; it may also
/// read or mutate host state directly.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique name within a run. An empty name is rejected.
    fn name(&self) -> &str;

    async fn apply(&self, host: &mut Host, args: &[Value]) -> anyhow::Result<()>;
}

type BuildFn = dyn Fn(&[Value]) -> anyhow::Result<Arc<dyn Plugin>> + Send + Sync;

/// Constructor producing a plugin instance from its arguments.
#[derive(Clone)]
pub struct PluginConstructor {
    name: String,
    build: Arc<BuildFn>,
}

impl PluginConstructor {
    /// `name` is used when the built instance reports an empty name.
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Arc<dyn Plugin>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(&self, args: &[Value]) -> anyhow::Result<Arc<dyn Plugin>> {
        (self.build)(args)
    }
}

/// A loaded plugin module.
#[derive(Clone)]
pub enum PluginModule {
    Instance(Arc<dyn Plugin>),
    Constructor(PluginConstructor),
}

impl PluginModule {
    pub fn instance<P: Plugin + 'static>(plugin: P) -> Self {
        Self::Instance(Arc::new(plugin))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Instance(p) => p.name(),
            Self::Constructor(c) => c.name(),
        }
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(p) => f.debug_tuple("Instance").field(&p.name()).finish(),
            Self::Constructor(c) => f.debug_tuple("Constructor").field(&c.name).finish(),
        }
    }
}

/// How a plugin is referenced before loading.
#[derive(Debug, Clone)]
pub enum PluginSpecifier {
    Module(PluginModule),
    WithArgs(PluginModule, Vec<Value>),
    Named(String),
    NamedWithArgs(String, Vec<Value>),
}

impl From<&PluginRef> for PluginSpecifier {
    fn from(plugin: &PluginRef) -> Self {
        let args = plugin.args();
        if args.is_empty() {
            Self::Named(plugin.name().to_string())
        } else {
            Self::NamedWithArgs(plugin.name().to_string(), args)
        }
    }
}

impl From<PluginModule> for PluginSpecifier {
    fn from(module: PluginModule) -> Self {
        Self::Module(module)
    }
}

/// A loaded (or failed) plugin ready for the registry.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    /// The module, or why it could not be loaded.
    pub module: Result<PluginModule, UnresolvedPlugin>,
    pub args: Vec<Value>,
    /// Resolved location of a named plugin; `None` for in-process modules.
    pub location: Option<String>,
}

impl PluginDescriptor {
    pub fn source_ref(&self) -> String {
        match (&self.location, &self.module) {
            (Some(loc), _) => loc.clone(),
            (None, Ok(module)) => format!("{module:?}"),
            (None, Err(unresolved)) => unresolved.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlugin {
    pub name: String,
    pub reason: String,
}

/// Names of the tiers, for log lines.
pub fn describe_tier(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::BuildIn => "built-in plugins",
        Provenance::Custom => "project plugins",
        Provenance::Global => "global plugins",
    }
}
