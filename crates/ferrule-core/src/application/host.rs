//! The host context every plugin receives.
//!
//! One [`Host`] exists per run. It is owned by the caller and lent out as
//! `&mut Host` to each plugin `apply` and each hook callback in turn, so two
//! callbacks can never touch it at the same time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::commands::{CreateAction, ScaffoldAction, TypeRegistry};
use crate::application::error::ApplicationError;
use crate::application::hooks::{
    HookArgs, HookFn, HookHandler, HookRegistry, names, run_sequential,
};
use crate::application::plugin::{AppliedPlugin, PluginDescriptor, PluginRegistry, init_plugins};
use crate::application::ports::{Filesystem, ProjectLoader};
use crate::application::services::entries::EntryResolver;
use crate::application::services::pipeline::{self, BuildOptions, ProjectHooks};
use crate::domain::{
    BuildMode, ConfigChain, DependencyScope, EntryPoint, EnvVars, PackageManifest,
    ProjectConfig, Provenance,
    common::{normalize, resolve_from},
};
use crate::error::FerruleResult;

/// Inputs for building a [`Host`].
#[derive(Default)]
pub struct HostOptions {
    /// Project root. Expected to be absolute.
    pub base_dir: PathBuf,
    /// Explicit config file; must exist when set.
    pub config_file: Option<PathBuf>,
    /// Environment snapshot (`HOST`, `PORT`, `NODE_ENV`, `FERRULE_*`).
    pub env: EnvVars,
    /// Directory receiving configuration inspection files.
    pub inspect_dir: Option<PathBuf>,
    pub project_hooks: ProjectHooks,
}

impl HostOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    pub fn config_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config_file = Some(file.into());
        self
    }

    pub fn env(mut self, env: EnvVars) -> Self {
        self.env = env;
        self
    }

    pub fn inspect_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.inspect_dir = Some(dir.into());
        self
    }

    pub fn project_hooks(mut self, hooks: ProjectHooks) -> Self {
        self.project_hooks = hooks;
        self
    }
}

pub struct Host {
    root: PathBuf,
    config: ProjectConfig,
    config_path: Option<PathBuf>,
    env: EnvVars,
    mode: BuildMode,
    build_id: String,
    manifest: PackageManifest,
    inspect_dir: Option<PathBuf>,
    filesystem: Arc<dyn Filesystem>,
    pub(crate) hooks: HookRegistry<Host>,
    pub(crate) plugins: PluginRegistry,
    pub(crate) project_hooks: ProjectHooks,
    pub(crate) create_types: TypeRegistry<dyn CreateAction>,
    pub(crate) page_types: TypeRegistry<dyn ScaffoldAction>,
    pub(crate) component_types: TypeRegistry<dyn ScaffoldAction>,
}

impl Host {
    /// Load configuration, manifest and env files, and build the host.
    #[instrument(skip_all, fields(base_dir = %options.base_dir.display()))]
    pub fn load(
        options: HostOptions,
        loader: &dyn ProjectLoader,
        filesystem: Arc<dyn Filesystem>,
    ) -> FerruleResult<Self> {
        let root = normalize(&options.base_dir);

        let explicit = match &options.config_file {
            Some(file) => {
                let path = resolve_from(&root, [file]);
                if !filesystem.exists(&path) {
                    return Err(ApplicationError::ConfigFileNotFound { path }.into());
                }
                Some(path)
            }
            None => None,
        };

        let loaded = loader.load_config(&root, explicit.as_deref())?;
        let (config_path, file_layer) = match loaded {
            Some(loaded) => {
                debug!(path = %loaded.path.display(), "using config file");
                (Some(loaded.path), Some(loaded.data))
            }
            None => {
                debug!("not using any config file");
                (None, None)
            }
        };

        let mut config = ProjectConfig::layered(file_layer, &options.env, &root)?;

        let node_env = options.env.get("NODE_ENV").map(String::as_str);
        let dotenv = loader.load_env_files(&root, node_env)?;
        let strings = dotenv
            .into_iter()
            .chain(ProjectConfig::prefixed_envs(&options.env));
        config
            .envs
            .extend(strings.map(|(k, v)| (k, Value::String(v))));

        let manifest = loader.load_manifest(&root)?;

        let mut build_id = Uuid::new_v4().simple().to_string();
        build_id.truncate(8);

        Ok(Self {
            root,
            config,
            config_path,
            env: options.env,
            mode: BuildMode::default(),
            build_id,
            manifest,
            inspect_dir: options.inspect_dir,
            filesystem,
            hooks: HookRegistry::new(),
            plugins: PluginRegistry::default(),
            project_hooks: options.project_hooks,
            create_types: TypeRegistry::default(),
            page_types: TypeRegistry::default(),
            component_types: TypeRegistry::default(),
        })
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ProjectConfig {
        &mut self.config
    }

    /// The config file the configuration came from, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: BuildMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Random identifier of this run.
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    /// The environment snapshot the host was loaded with.
    pub fn env(&self) -> &EnvVars {
        &self.env
    }

    /// Values embedded into application code at build time.
    pub fn envs(&self) -> BTreeMap<String, Value> {
        let mut envs = self.config.envs.clone();
        envs.insert(
            "PUBLIC_PATH".into(),
            Value::String(self.config.public_path.clone()),
        );
        envs
    }

    pub fn inspect_dir(&self) -> Option<&Path> {
        self.inspect_dir.as_deref()
    }

    pub fn set_inspect_dir(&mut self, dir: Option<PathBuf>) -> &mut Self {
        self.inspect_dir = dir;
        self
    }

    pub fn filesystem(&self) -> &Arc<dyn Filesystem> {
        &self.filesystem
    }

    pub fn applied_plugins(&self) -> &[AppliedPlugin] {
        self.plugins.applied()
    }

    pub fn project_hooks_mut(&mut self) -> &mut ProjectHooks {
        &mut self.project_hooks
    }

    /// Join `segments` onto the project root.
    pub fn resolve_path<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        resolve_from(&self.root, segments)
    }

    /// `scope` is one of `all`, `prod`, `dev`.
    pub fn has_dependency(&self, name: &str, scope: &str) -> FerruleResult<bool> {
        let scope: DependencyScope = scope.parse()?;
        Ok(self.manifest.has_dependency(name, scope))
    }

    // ------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------

    pub fn add_hook(&mut self, name: &str, handler: Arc<dyn HookHandler<Host>>) -> &mut Self {
        self.hooks.register(name, handler);
        self
    }

    /// Register a synchronous closure on `name`.
    pub fn hook<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Host, &mut HookArgs<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.add_hook(name, Arc::new(HookFn(f)))
    }

    /// Register a `chainWebpack` contribution.
    pub fn chain_webpack<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut ConfigChain, &BuildOptions, &mut Host) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.add_hook(names::CHAIN_WEBPACK, Arc::new(ChainFn(f)))
    }

    /// Register an asynchronous `chainWebpack` handler.
    pub fn chain_webpack_with(&mut self, handler: Arc<dyn HookHandler<Host>>) -> &mut Self {
        self.add_hook(names::CHAIN_WEBPACK, handler)
    }

    /// Invoke every callback of `name` sequentially with this host.
    pub async fn invoke_hook(&mut self, name: &str, args: &mut HookArgs<'_>) -> FerruleResult<()> {
        let handlers = self.hooks.handlers(name);
        run_sequential(name, handlers, self, args).await?;
        Ok(())
    }

    pub fn hook_count(&self, name: &str) -> usize {
        self.hooks.count(name)
    }

    // ------------------------------------------------------------------
    // Plugins, configuration, entries
    // ------------------------------------------------------------------

    pub async fn init_plugins(
        &mut self,
        descriptors: Vec<PluginDescriptor>,
        provenance: Provenance,
    ) -> FerruleResult<()> {
        init_plugins(self, descriptors, provenance).await
    }

    /// Build the bundler configuration for one target.
    pub async fn resolve_configuration(&mut self, options: BuildOptions) -> FerruleResult<Value> {
        pipeline::resolve_configuration(self, options).await
    }

    /// Web entry points: discovered pages, or the configured `entry` map.
    pub fn entries(&self) -> FerruleResult<Vec<EntryPoint>> {
        EntryResolver::new(self.filesystem.as_ref(), &self.config, &self.root).entries()
    }

    /// Server-render entry points.
    pub fn node_entries(&self) -> FerruleResult<Vec<EntryPoint>> {
        EntryResolver::new(self.filesystem.as_ref(), &self.config, &self.root).node_entries()
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("root", &self.root)
            .field("mode", &self.mode)
            .field("build_id", &self.build_id)
            .field("config_path", &self.config_path)
            .field("plugins", &self.plugins.applied().len())
            .finish_non_exhaustive()
    }
}

/// Adapter for `chainWebpack` closures; ignores other hook arguments.
pub struct ChainFn<F>(pub F);

#[async_trait]
impl<F> HookHandler<Host> for ChainFn<F>
where
    F: Fn(&mut ConfigChain, &BuildOptions, &mut Host) -> anyhow::Result<()> + Send + Sync,
{
    async fn call(&self, host: &mut Host, args: &mut HookArgs<'_>) -> anyhow::Result<()> {
        match args {
            HookArgs::ChainWebpack { chain, options } => (self.0)(&mut **chain, *options, host),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeFs, FakeLoader, ROOT, env, host_with, test_host};
    use crate::domain::DomainError;
    use crate::error::FerruleError;
    use serde_json::json;

    #[test]
    fn resolve_path_joins_onto_root() {
        let host = test_host();
        assert_eq!(host.resolve_path(["src", "pages"]), Path::new("/work/app/src/pages"));
        assert_eq!(host.resolve_path(["/abs"]), Path::new("/abs"));
        let once = host.resolve_path(["a/./b/../c"]);
        assert_eq!(host.resolve_path([&once]), once);
    }

    #[test]
    fn unknown_dependency_scope_is_an_error() {
        let loader = FakeLoader {
            manifest: serde_json::from_value(json!({ "devDependencies": { "eslint": "6" } }))
                .unwrap(),
            ..Default::default()
        };
        let host = Host::load(HostOptions::new(ROOT), &loader, Arc::new(FakeFs::new())).unwrap();

        assert!(host.has_dependency("eslint", "dev").unwrap());
        assert!(!host.has_dependency("eslint", "prod").unwrap());
        assert!(matches!(
            host.has_dependency("eslint", "peer"),
            Err(FerruleError::Domain(DomainError::UnknownScope(_)))
        ));
    }

    #[test]
    fn explicit_config_must_exist() {
        let err = Host::load(
            HostOptions::new(ROOT).config_file("custom.json"),
            &FakeLoader::default(),
            Arc::new(FakeFs::new()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FerruleError::Application(ApplicationError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn envs_merge_config_dotenv_and_prefixed_vars() {
        let loader = FakeLoader {
            config: Some(json!({ "envs": { "A": "config", "B": "config" }, "publicPath": "/x/" })),
            dotenv: [("B".to_string(), "dotenv".to_string())].into(),
            ..Default::default()
        };
        let host = Host::load(
            HostOptions::new(ROOT).env(env(&[("FERRULE_C", "process"), ("OTHER", "no")])),
            &loader,
            Arc::new(FakeFs::new()),
        )
        .unwrap();

        let envs = host.envs();
        assert_eq!(envs["A"], "config");
        assert_eq!(envs["B"], "dotenv");
        assert_eq!(envs["FERRULE_C"], "process");
        assert_eq!(envs["PUBLIC_PATH"], "/x/");
        assert!(!envs.contains_key("OTHER"));
    }

    #[test]
    fn envs_keep_non_string_values() {
        let loader = FakeLoader {
            config: Some(json!({ "envs": { "DEBUG": true, "RETRIES": 3, "FLAGS": ["a"] } })),
            ..Default::default()
        };
        let host = Host::load(HostOptions::new(ROOT), &loader, Arc::new(FakeFs::new())).unwrap();

        let envs = host.envs();
        assert_eq!(envs["DEBUG"], json!(true));
        assert_eq!(envs["RETRIES"], json!(3));
        assert_eq!(envs["FLAGS"], json!(["a"]));
    }

    #[test]
    fn build_id_is_short_and_random() {
        let a = test_host();
        let b = test_host();
        assert_eq!(a.build_id().len(), 8);
        assert_ne!(a.build_id(), b.build_id());
    }

    #[tokio::test]
    async fn hook_callbacks_can_mutate_the_host() {
        let mut host = host_with(None, FakeFs::new());
        host.hook("beforeRun", |host, _| {
            host.set_mode(BuildMode::Production);
            Ok(())
        });
        host.invoke_hook("beforeRun", &mut HookArgs::Empty).await.unwrap();
        assert_eq!(host.mode(), BuildMode::Production);
    }

    #[tokio::test]
    async fn callbacks_registered_during_invocation_do_not_join_it() {
        let mut host = test_host();
        host.hook("x", |host, _| {
            host.hook("x", |_, _| anyhow::bail!("late callback ran"));
            Ok(())
        });
        host.invoke_hook("x", &mut HookArgs::Empty).await.unwrap();
        assert_eq!(host.hook_count("x"), 2);
    }
}
