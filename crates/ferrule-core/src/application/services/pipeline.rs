//! Bundler configuration resolution.
//!
//! Every call starts from an empty [`ConfigChain`], lets each `chainWebpack`
//! contributor edit it in registration order, gives the project the last
//! word, and materializes the result.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::application::error::ApplicationError;
use crate::application::hooks::{HookArgs, HookHandler, names};
use crate::application::host::{ChainFn, Host};
use crate::domain::{BuildMode, BuildTarget, ConfigChain, Filenames};
use crate::error::FerruleResult;

/// Options of one configuration resolution.
///
/// `mode` and `extract_css` are always recomputed from the host before
/// contributors see them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    #[serde(rename = "type")]
    pub target: BuildTarget,
    pub mode: BuildMode,
    /// Server-side rendering is active for this build.
    pub ssr: bool,
    pub extract_css: bool,
}

impl BuildOptions {
    pub fn new(target: BuildTarget) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn ssr(mut self, ssr: bool) -> Self {
        self.ssr = ssr;
        self
    }
}

/// Options handed to a legacy override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyOptions {
    /// The build mode for web builds, `"server"` otherwise.
    #[serde(rename = "type")]
    pub kind: String,
}

impl LegacyOptions {
    pub fn for_build(options: &BuildOptions) -> Self {
        let kind = match options.target {
            BuildTarget::Web => options.mode.as_str().to_string(),
            _ => "server".to_string(),
        };
        Self { kind }
    }
}

/// Post-materialization override. Mutate the config in place, or return a
/// replacement.
pub type WebpackOverride =
    Arc<dyn Fn(&mut Value, &LegacyOptions) -> anyhow::Result<Option<Value>> + Send + Sync>;

/// Project-level contributions supplied programmatically.
#[derive(Clone, Default)]
pub struct ProjectHooks {
    /// Runs after every plugin `chainWebpack` contribution.
    pub chain_webpack: Option<Arc<dyn HookHandler<Host>>>,
    /// Deprecated post-materialization override.
    pub webpack_override: Option<WebpackOverride>,
}

impl ProjectHooks {
    pub fn chain_webpack<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ConfigChain, &BuildOptions, &mut Host) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.chain_webpack = Some(Arc::new(ChainFn(f)));
        self
    }

    pub fn webpack_override<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Value, &LegacyOptions) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        self.webpack_override = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for ProjectHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectHooks")
            .field("chain_webpack", &self.chain_webpack.is_some())
            .field("webpack_override", &self.webpack_override.is_some())
            .finish()
    }
}

#[instrument(skip_all, fields(target = %options.target, build_id = %host.build_id()))]
pub async fn resolve_configuration(host: &mut Host, options: BuildOptions) -> FerruleResult<Value> {
    let mut chain = ConfigChain::new();

    let mut options = BuildOptions {
        mode: host.mode(),
        ..options
    };
    options.extract_css = host.config().extract_css && (options.mode.is_production() || options.ssr);

    let filenames = Filenames::for_build(&host.config().filenames, options.mode, options.target);
    debug!(?filenames, "output file names");
    host.config_mut().output_filenames = filenames;

    host.invoke_hook(
        names::CHAIN_WEBPACK,
        &mut HookArgs::ChainWebpack {
            chain: &mut chain,
            options: &options,
        },
    )
    .await?;

    if let Some(patch) = host.config().chain_webpack.clone() {
        chain.merge(&patch)?;
    }
    if let Some(project) = host.project_hooks.chain_webpack.clone() {
        project
            .call(
                host,
                &mut HookArgs::ChainWebpack {
                    chain: &mut chain,
                    options: &options,
                },
            )
            .await
            .map_err(|source| ApplicationError::HookFailed {
                hook: "chainWebpack (project)".into(),
                index: 0,
                source: source.into(),
            })?;
    }

    if host.inspect_dir().is_some() {
        write_inspection(host, &chain, &options);
    }

    let mut config = chain.to_config();

    if let Some(legacy) = host.project_hooks.webpack_override.clone() {
        warn!("webpackOverride is deprecated, use chainWebpack to modify the configuration");
        let legacy_options = LegacyOptions::for_build(&options);
        if let Some(replacement) = legacy(&mut config, &legacy_options)? {
            config = replacement;
        }
    }

    Ok(config)
}

/// Append the options and the named chain to the inspection file.
///
/// Failures are logged only.
fn write_inspection(host: &Host, chain: &ConfigChain, options: &BuildOptions) {
    let Some(dir) = host.inspect_dir() else {
        return;
    };
    let path = dir.join(format!(
        "ferrule-inspect-webpack-config-{}-{}.js",
        options.target,
        host.build_id()
    ));

    let options_json = serde_json::to_string(options).unwrap_or_default();
    let content = format!(
        "//{options_json}\nconst {} = {}\n",
        options.target,
        chain.to_inspect_string()
    );

    let fs = host.filesystem();
    match fs.create_dir_all(dir).and_then(|()| fs.append_file(&path, &content)) {
        Ok(()) => debug!(path = %path.display(), "configuration inspection written"),
        Err(e) => warn!(error = %e, path = %path.display(), "could not write inspection file"),
    }
}
