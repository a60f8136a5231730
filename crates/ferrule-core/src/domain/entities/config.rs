//! Merged project configuration.
//!
//! A [`ProjectConfig`] is produced once per run by layering, in order:
//!
//! 1. built-in defaults ([`ProjectConfig::defaults`])
//! 2. the project config file (already parsed to JSON by an adapter)
//! 3. environment overrides (`HOST`, `PORT`)
//! 4. derived fields (absolute paths, `publicPath` fallback)
//!
//! Layers 1 and 2 are merged as JSON values with [`merge_values`] before the
//! typed struct is deserialized, so a config file only ever has to mention the
//! fields it wants to change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::domain::{
    common::resolve_from,
    error::DomainError,
    value_objects::{BuildMode, BuildTarget},
};

/// Snapshot of the process environment handed to the host.
///
/// Captured once at startup so configuration layering never reads
/// `std::env` directly.
pub type EnvVars = BTreeMap<String, String>;

/// Prefix of environment variables copied into the build-time env map.
pub const ENV_PREFIX: &str = "FERRULE_";

pub const SERVER_ENTRY_DIR: &str = "./.ferrule/server/entry";
pub const SERVER_VIEW_DIR: &str = "./.ferrule/server/view";

// ============================================================================
// Typed configuration
// ============================================================================

/// Fully merged configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Project type key used by `page` / `component` dispatch.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,

    /// Project-declared plugins (custom tier).
    #[serde(default)]
    pub plugins: Vec<PluginRef>,

    /// Declarative chain patch applied after every plugin contribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_webpack: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssr_config: Option<SsrConfig>,

    /// Deprecated alias of `ssrConfig`.
    #[serde(default, skip_serializing)]
    pub ssr_dev_server: Option<Value>,

    /// Values embedded into the application at build time. Any JSON value.
    #[serde(default)]
    pub envs: BTreeMap<String, Value>,

    pub dist: PathBuf,
    pub pages_path: PathBuf,
    pub template: PathBuf,
    pub cache_directory: PathBuf,

    #[serde(default)]
    pub public_path: String,

    /// User overrides for output file name templates.
    #[serde(default)]
    pub filenames: FilenameOverrides,

    /// Effective file name templates of the most recent resolution.
    #[serde(skip)]
    pub output_filenames: Filenames,

    pub dev_server: DevServer,

    /// Files prepended to every entry point.
    #[serde(default)]
    pub init_entry: Vec<PathBuf>,

    /// Explicit entries; when absent or empty pages are discovered instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Map<String, Value>>,

    #[serde(default)]
    pub ignore_pages: Vec<String>,

    #[serde(default)]
    pub extract_css: bool,

    /// Whether the project supports server-side rendering at all.
    #[serde(default)]
    pub ssr: bool,
}

/// A plugin reference as written in a config file.
///
/// Accepted shapes: `"name"`, `["name"]`, `["name", [arg, ...]]` and
/// `["name", {options}]` (a single non-array argument).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginRef {
    Name(String),
    WithArgs(String, Value),
    Bare((String,)),
}

impl PluginRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::WithArgs(name, _) | Self::Bare((name,)) => name,
        }
    }

    /// Instantiation arguments.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::WithArgs(_, Value::Array(args)) => args.clone(),
            Self::WithArgs(_, Value::Null) => Vec::new(),
            Self::WithArgs(_, single) => vec![single.clone()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServer {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    /// Options passed through untouched to the dev server collaborator.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsrConfig {
    pub entry_path: PathBuf,
    pub view_path: PathBuf,
    pub dist: PathBuf,
    /// Either a map of name to files, or a list of web entry names to reuse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Output file name templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filenames {
    pub js: String,
    pub css: String,
    pub file: String,
}

impl Filenames {
    /// Compute templates for a build, then apply user overrides field by field.
    ///
    /// Server bundles always use `[name].js` for scripts: the SSR runtime
    /// requires them by entry name.
    pub fn for_build(overrides: &FilenameOverrides, mode: BuildMode, target: BuildTarget) -> Self {
        let mut names = match mode {
            BuildMode::Development => Self {
                js: "[name].js".into(),
                css: "[name].css".into(),
                file: "[name].[ext]".into(),
            },
            BuildMode::Production => Self {
                js: "[name].[contenthash:8].js".into(),
                css: "[name].[contenthash:8].css".into(),
                file: "[name].[hash:8].[ext]".into(),
            },
        };

        if let Some(js) = &overrides.js {
            names.js = js.clone();
        }
        if let Some(css) = &overrides.css {
            names.css = css.clone();
        }
        if let Some(file) = &overrides.file {
            names.file = file.clone();
        }
        if target == BuildTarget::Node {
            names.js = "[name].js".into();
        }
        names
    }
}

// ============================================================================
// Layering
// ============================================================================

impl ProjectConfig {
    /// Built-in defaults, as the bottom configuration layer.
    pub fn defaults() -> Value {
        json!({
            "plugins": [],
            "envs": {},
            "dist": "dist",
            "pagesPath": "src/pages",
            "template": "src/common/template.html",
            "cacheDirectory": "node_modules/.cache/ferrule",
            "publicPath": "",
            "filenames": {},
            "devServer": { "host": "0.0.0.0", "port": 8080 },
            "initEntry": [],
            "ignorePages": [],
            "extractCss": true,
            "ssr": false
        })
    }

    /// Defaults of the `ssrConfig` sub-config, merged under a user `ssrConfig`.
    pub fn ssr_defaults() -> Value {
        json!({
            "entryPath": SERVER_ENTRY_DIR,
            "viewPath": SERVER_VIEW_DIR,
            "dist": "./node"
        })
    }

    /// Build the merged configuration from the file layer and environment.
    ///
    /// `root` must be absolute; every path field is resolved against it.
    pub fn layered(file: Option<Value>, env: &EnvVars, root: &Path) -> Result<Self, DomainError> {
        let mut file = match file {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(Value::Object(map)) => Value::Object(map),
            Some(other) => {
                return Err(DomainError::InvalidConfig(format!(
                    "config must be an object, found {}",
                    json_kind(&other)
                )));
            }
        };

        if let Some(obj) = file.as_object_mut() {
            if let Some(legacy) = obj.get("ssrDevServer").cloned() {
                warn!("ssrDevServer is deprecated, use ssrConfig instead");
                obj.insert("ssrConfig".into(), legacy);
            }
            if let Some(ssr) = obj.get("ssrConfig").cloned().filter(|v| !v.is_null()) {
                let mut merged = Self::ssr_defaults();
                shallow_merge(&mut merged, ssr);
                obj.insert("ssrConfig".into(), merged);
            }
        }

        let mut merged = Self::defaults();
        merge_values(&mut merged, file);

        let mut config: ProjectConfig = serde_json::from_value(merged)
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))?;

        config.apply_env_overrides(env)?;
        config.derive_paths(root);
        Ok(config)
    }

    /// `HOST` and `PORT` win over anything a config file says.
    pub fn apply_env_overrides(&mut self, env: &EnvVars) -> Result<(), DomainError> {
        if let Some(host) = env.get("HOST").filter(|h| !h.is_empty()) {
            debug!(host = %host, "devServer.host overridden by HOST");
            self.dev_server.host = host.clone();
        }
        if let Some(port) = env.get("PORT").filter(|p| !p.is_empty()) {
            self.dev_server.port = port
                .trim()
                .parse()
                .map_err(|_| DomainError::InvalidPort(port.clone()))?;
            debug!(port = self.dev_server.port, "devServer.port overridden by PORT");
        }
        Ok(())
    }

    /// Make every path field absolute and apply value fallbacks.
    pub fn derive_paths(&mut self, root: &Path) {
        self.dist = resolve_from(root, [&self.dist]);
        self.pages_path = resolve_from(root, [&self.pages_path]);
        self.template = resolve_from(root, [&self.template]);
        self.cache_directory = resolve_from(root, [&self.cache_directory]);
        self.init_entry = self
            .init_entry
            .iter()
            .map(|p| resolve_from(root, [p]))
            .collect();

        if let Some(ssr) = self.ssr_config.as_mut() {
            ssr.entry_path = resolve_from(root, [&ssr.entry_path]);
            ssr.view_path = resolve_from(root, [&ssr.view_path]);
            ssr.dist = resolve_from(root, [&ssr.dist]);
        }

        if self.public_path.is_empty() {
            self.public_path = "/".into();
        }
    }

    /// Collect `FERRULE_*` variables from the environment snapshot.
    pub fn prefixed_envs(env: &EnvVars) -> BTreeMap<String, String> {
        env.iter()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// True when `entry` is present and names at least one entry point.
    pub fn has_custom_entry(&self) -> bool {
        self.entry.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// Deep-merge `overlay` into `base`.
///
/// Objects merge key by key, recursively. Arrays and scalars in the overlay
/// replace the base value. `null` in the overlay counts as "not set" and
/// leaves the base untouched.
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None if value.is_null() => {}
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// One-level merge: top-level keys of `overlay` replace those of `base`.
fn shallow_merge(base: &mut Value, overlay: Value) {
    if let (Value::Object(base_map), Value::Object(overlay_map)) = (base, overlay) {
        for (key, value) in overlay_map {
            base_map.insert(key, value);
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
