//! Application layer for ferrule.
//!
//! This layer contains:
//! - **Hooks**: the named hook registry and sequential invocation
//! - **Plugins**: the plugin contract, loader and tiered registry
//! - **Host**: the context every plugin and hook callback receives
//! - **Commands**: create / page / component type registries
//! - **Services**: start-up, configuration resolution, entries, scaffolding
//! - **Ports**: traits implemented by `ferrule-adapters`
//!
//! Business rules that need no I/O live in `crate::domain`.

pub mod commands;
pub mod error;
pub mod hooks;
pub mod host;
pub mod plugin;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::{
    CreateAction, CreateRequest, DispatchOutcome, ScaffoldAction, ScaffoldRequest, TypeInfo,
};
pub use error::ApplicationError;
pub use hooks::{HookArgs, HookHandler, hook_fn};
pub use host::{Host, HostOptions};
pub use plugin::{
    AppliedPlugin, Plugin, PluginConstructor, PluginDescriptor, PluginModule, PluginSpecifier,
};
pub use ports::{Filesystem, GlobalPluginStore, PluginCatalog, ProjectLoader};
pub use services::{
    AddOutcome, BuildOptions, GlobalPlugins, PluginSources, ProjectHooks, ScaffoldWriter,
};
