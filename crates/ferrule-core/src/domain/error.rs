// ============================================================================
// domain/error.rs - RULE VIOLATIONS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they carry no I/O handles)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid PORT value '{0}': expected a number between 0 and 65535")]
    InvalidPort(String),

    #[error("Duplicate path in project structure: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed in project structure: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Project structure is empty")]
    EmptyStructure,

    // ========================================================================
    // Plugin Identity
    // ========================================================================
    #[error("plugin name not found\n{source_ref}")]
    MissingPluginName { source_ref: String },

    #[error("Unknown dependency scope: {0}")]
    UnknownScope(String),

    // ========================================================================
    // Entries
    // ========================================================================
    #[error("{path} entry not found, check the \"entry\" field of your config")]
    EntryNotFound { path: PathBuf },

    #[error("Not found index.{{js,ts,jsx,tsx}} in directory {dir}")]
    EntryIndexMissing { dir: PathBuf },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfig(msg) => vec![
                "Check your ferrule configuration file".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Project names must begin with a letter or '@'".into(),
                "Examples: my-app, @scope/app".into(),
            ],
            Self::InvalidPort(_) => vec![
                "Unset PORT or give it a numeric value, e.g. PORT=4000".into(),
            ],
            Self::MissingPluginName { .. } => vec![
                "Every plugin must return a non-empty name".into(),
                "Report this to the plugin author".into(),
            ],
            Self::UnknownScope(_) => vec!["Use one of: all, prod, dev".into()],
            Self::EntryNotFound { .. } => vec![
                "Check the \"entry\" and \"pagesPath\" fields of your config".into(),
                "Entry files may omit their .js/.ts/.jsx/.tsx extension".into(),
            ],
            Self::EntryIndexMissing { dir } => vec![format!(
                "Add an index.js, index.ts, index.jsx or index.tsx to {}",
                dir.display()
            )],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::UnknownScope(_) => ErrorCategory::Validation,
            Self::InvalidConfig(_) | Self::InvalidPort(_) => ErrorCategory::Configuration,
            Self::EntryNotFound { .. } | Self::EntryIndexMissing { .. } => {
                ErrorCategory::Configuration
            }
            Self::MissingPluginName { .. } => ErrorCategory::Plugin,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Plugin,
    NotFound,
    Internal,
}
