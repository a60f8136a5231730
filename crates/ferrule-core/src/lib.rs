//! ferrule core - plugin host for a front-end build tool.
//!
//! This crate provides the domain and application layers of ferrule,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          ferrule-cli (CLI)              │
//! │   create, page, component, plugin, ...  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Host + Application Services      │
//! │  hooks, plugin tiers, config pipeline   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ Filesystem, ProjectLoader, Catalog, ... │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     ferrule-adapters (Infrastructure)   │
//! │  local fs, config loader, built-ins     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  ProjectConfig, ConfigChain, entries    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ferrule_core::prelude::*;
//!
//! # async fn run(loader: &dyn ProjectLoader, fs: std::sync::Arc<dyn Filesystem>) -> FerruleResult<()> {
//! let mut host = Host::load(HostOptions::new("/work/app"), loader, fs)?;
//! host.chain_webpack(|chain, _options, _host| {
//!     chain.rule("js").test(r"\.m?js$").use_loader("babel").loader("babel-loader");
//!     Ok(())
//! });
//! let config = host.resolve_configuration(BuildOptions::new(BuildTarget::Web)).await?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what plugins and adapters should use
pub mod prelude {
    pub use crate::application::hooks::names as hooks;
    pub use crate::application::{
        BuildOptions, CreateAction, CreateRequest, DispatchOutcome, Filesystem, GlobalPluginStore,
        HookArgs, Host, HostOptions, Plugin, PluginCatalog, PluginConstructor, PluginModule,
        PluginSpecifier, ProjectHooks, ProjectLoader, ScaffoldAction, ScaffoldRequest,
        ScaffoldWriter,
    };
    pub use crate::domain::{
        BuildMode, BuildTarget, ConfigChain, EntryPoint, ProjectConfig, ProjectStructure,
        Provenance, RenderContext,
    };
    pub use crate::error::{FerruleError, FerruleResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
