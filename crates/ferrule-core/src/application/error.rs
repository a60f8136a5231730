//! Application layer errors.
//!
//! These errors represent failures in orchestration: loading, plugin
//! bookkeeping, hook invocation, filesystem access. Rule violations are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{ErrorCategory, Provenance};

/// Boxed source error raised by plugin or hook code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that occur during application orchestration.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A plugin specifier could not be resolved to a module.
    #[error("[{provenance}] plugin \"{name}\" not found: {reason}")]
    PluginNotFound {
        name: String,
        provenance: Provenance,
        reason: String,
    },

    /// A plugin constructor or `apply` failed.
    #[error("[{provenance}] plugin {plugin} apply error{}", location_suffix(.location))]
    PluginApply {
        plugin: String,
        provenance: Provenance,
        location: Option<String>,
        #[source]
        source: BoxError,
    },

    /// A hook callback failed; the remaining callbacks did not run.
    #[error("hook \"{hook}\" callback #{index} failed")]
    HookFailed {
        hook: String,
        index: usize,
        #[source]
        source: BoxError,
    },

    /// An explicitly requested config file does not exist.
    #[error("{path} not found")]
    ConfigFileNotFound { path: PathBuf },

    /// A config or manifest file exists but could not be parsed.
    #[error("Failed to parse {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// The global plugin list could not be read or written.
    #[error("Global plugin store error: {reason}")]
    GlobalStore { reason: String },

    /// A scaffolding action would overwrite an existing file.
    #[error("{path} already exists")]
    FileExists { path: PathBuf },

    /// Scaffolding target is a non-empty directory.
    #[error("Directory {path} is not empty")]
    DirectoryNotEmpty { path: PathBuf },
}

fn location_suffix(location: &Option<String>) -> String {
    match location {
        Some(loc) if !loc.is_empty() => format!(" ({loc})"),
        _ => String::new(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PluginNotFound { name, provenance, .. } => match provenance {
                Provenance::Global => vec![
                    format!("Install {name} into the global plugin directory"),
                    format!("Or remove it: ferrule plugin delete {name}"),
                ],
                _ => vec![
                    format!("Check the spelling of \"{name}\" in the plugins list"),
                    "Run `ferrule plugin list` to see installed global plugins".into(),
                ],
            },
            Self::PluginApply { plugin, .. } => vec![
                format!("The plugin \"{plugin}\" failed while registering itself"),
                "Re-run with --debug for the full error chain".into(),
            ],
            Self::HookFailed { hook, .. } => vec![
                format!("A plugin callback on \"{hook}\" returned an error"),
                "Re-run with -vv to see which plugins are loaded".into(),
            ],
            Self::ConfigFileNotFound { path } => vec![
                format!("Check that {} exists", path.display()),
                "Omit --config to use ferrule.config.json or package.json".into(),
            ],
            Self::ConfigParse { .. } => vec!["Fix the syntax error and try again".into()],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::GlobalStore { .. } => vec![
                "Check the global config file (FERRULE_GLOBAL_CONFIG)".into(),
            ],
            Self::FileExists { path } => vec![format!(
                "Remove or rename {} first",
                path.display()
            )],
            Self::DirectoryNotEmpty { .. } => vec![
                "Use --force to scaffold into it anyway".into(),
                "Choose a different directory".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PluginNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigFileNotFound { .. } => ErrorCategory::NotFound,
            Self::PluginApply { .. } | Self::HookFailed { .. } => ErrorCategory::Plugin,
            Self::ConfigParse { .. } | Self::GlobalStore { .. } => ErrorCategory::Configuration,
            Self::DirectoryNotEmpty { .. } | Self::FileExists { .. } => ErrorCategory::Validation,
            Self::Filesystem { .. } => ErrorCategory::Internal,
        }
    }
}
