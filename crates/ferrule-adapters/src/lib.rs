//! Infrastructure adapters for ferrule.
//!
//! This crate implements the ports defined in `ferrule-core::application::ports`
//! and ships the built-in plugins. It owns all file and environment I/O.

pub mod builtin_plugins;
pub mod filesystem;
pub mod global_store;
pub mod plugin_catalog;
pub mod project_loader;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use global_store::JsonGlobalStore;
pub use plugin_catalog::StaticCatalog;
pub use project_loader::FileProjectLoader;
