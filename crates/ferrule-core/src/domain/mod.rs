// ============================================================================
//  DOMAIN LAYER
// ============================================================================

//! Pure data and rules: configuration layering, the configuration chain,
//! entry and manifest models, scaffolding structures.
//!
//! Nothing in here performs I/O or awaits; the application layer reaches the
//! outside world through ports.

pub mod common;
pub mod entities;
pub mod error;
pub mod validation;
pub mod value_objects;

pub use entities::{
    ConfigChain, DevServer, EntryPoint, EnvVars, FileToWrite, FilenameOverrides, Filenames,
    FsEntry, PackageManifest, PluginRef, ProjectConfig, ProjectStructure, RenderContext, Rule,
    SsrConfig,
};
pub use error::{DomainError, ErrorCategory};
pub use value_objects::{BuildMode, BuildTarget, DependencyScope, Provenance};
