//! Application services - run start-up, configuration resolution, entry
//! discovery, scaffold writing and the global plugin list.

pub mod entries;
pub mod global_plugins;
pub mod lifecycle;
pub mod pipeline;
pub mod scaffold;

pub use entries::EntryResolver;
pub use global_plugins::{AddOutcome, GlobalPlugins};
pub use lifecycle::{PluginSources, apply_plugins, prepare};
pub use pipeline::{BuildOptions, LegacyOptions, ProjectHooks, WebpackOverride};
pub use scaffold::ScaffoldWriter;
