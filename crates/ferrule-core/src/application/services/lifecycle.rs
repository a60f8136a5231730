//! Run start-up: apply the three plugin tiers, then fire `beforeRun`.

use std::path::PathBuf;

use tracing::{error, info, instrument};

use crate::application::hooks::{HookArgs, names};
use crate::application::host::Host;
use crate::application::plugin::{PluginSpecifier, load_plugins};
use crate::application::ports::{GlobalPluginStore, PluginCatalog};
use crate::domain::Provenance;
use crate::error::FerruleResult;

/// Where each plugin tier comes from.
pub struct PluginSources<'a> {
    /// In-process plugins shipped with the tool.
    pub builtins: Vec<PluginSpecifier>,
    pub catalog: &'a dyn PluginCatalog,
    pub global_store: &'a dyn GlobalPluginStore,
    /// Root for resolving global plugin names.
    pub global_dir: PathBuf,
}

/// Apply built-in, custom and global plugins, in that order.
///
/// Built-in and custom failures are returned. Global failures are logged
/// with the global plugin list and the run continues.
#[instrument(skip_all, fields(root = %host.root().display()))]
pub async fn apply_plugins(host: &mut Host, mut sources: PluginSources<'_>) -> FerruleResult<()> {
    let root = host.root().to_path_buf();

    let builtins = std::mem::take(&mut sources.builtins);
    let builtins = load_plugins(builtins, &root, sources.catalog);
    host.init_plugins(builtins, Provenance::BuildIn).await?;

    let custom: Vec<PluginSpecifier> = host
        .config()
        .plugins
        .iter()
        .map(PluginSpecifier::from)
        .collect();
    let custom = load_plugins(custom, &root, sources.catalog);
    host.init_plugins(custom, Provenance::Custom).await?;

    let mut global_names = Vec::new();
    if let Err(e) = apply_global(host, &sources, &mut global_names).await {
        error!(error = %e, "global init error");
        error!("global plugin list: {}", global_names.join(", "));
    }

    info!(plugins = host.applied_plugins().len(), "plugins applied");
    Ok(())
}

async fn apply_global(
    host: &mut Host,
    sources: &PluginSources<'_>,
    names: &mut Vec<String>,
) -> FerruleResult<()> {
    *names = sources.global_store.load()?;
    let specifiers = names.iter().cloned().map(PluginSpecifier::Named);
    let descriptors = load_plugins(specifiers, &sources.global_dir, sources.catalog);
    host.init_plugins(descriptors, Provenance::Global).await
}

/// Apply every plugin tier and invoke `beforeRun` once.
pub async fn prepare(host: &mut Host, sources: PluginSources<'_>) -> FerruleResult<()> {
    apply_plugins(host, sources).await?;
    host.invoke_hook(names::BEFORE_RUN, &mut HookArgs::Empty).await
}
