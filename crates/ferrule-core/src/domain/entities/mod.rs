pub mod chain;
pub mod config;
pub mod entry;
pub mod manifest;
pub mod project_structure;
pub mod render_context;

pub use chain::{ConfigChain, EntrySlot, LoaderUse, NamedSlots, Output, PluginSlot, Rule};
pub use config::{
    DevServer, EnvVars, FilenameOverrides, Filenames, PluginRef, ProjectConfig, SsrConfig,
};
pub use entry::EntryPoint;
pub use manifest::PackageManifest;
pub use project_structure::{FileToWrite, FsEntry, ProjectStructure};
pub use render_context::RenderContext;
