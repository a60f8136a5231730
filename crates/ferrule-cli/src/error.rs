//! Error handling for the ferrule CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use ferrule_core::error::{ErrorCategory as CoreCategory, FerruleError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A value was needed but prompting is impossible.
    #[error("Missing {what}")]
    MissingValue { what: &'static str, hint: String },

    // ── Core errors ────────────────────────────────────────────────────────
    #[error(transparent)]
    Core(#[from] FerruleError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::MissingValue { hint, .. } => vec![hint.clone()],

            Self::Core(core) => core.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::MissingValue { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Plugin | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        if matches!(self, Self::Cancelled) {
            return 0;
        }
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Error message, cause chain (verbose only) and suggestions, colored.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// [`Self::format_colored`] without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, colored: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if colored { style(text) } else { text.to_string() }
        };

        let mut out = format!(
            "\n{} {}\n",
            paint("\u{2717} Error:", |t| t.red().bold().to_string()),
            paint(&self.to_string(), |t| t.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                out.push_str(&format!(
                    "  {}\n",
                    paint(&format!("Caused by: {err}"), |t| t.dimmed().to_string())
                ));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!(
                "\n{}\n",
                paint("Suggestions:", |t| t.yellow().bold().to_string())
            ));
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!(
                "\n{}\n",
                paint("Use -v / --verbose for more details.", |t| t
                    .dimmed()
                    .to_string())
            ));
        }
        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    NotFound,
    Configuration,
    /// Internal, system or plugin error.
    Internal,
}

/// Project directory that is not empty, as a core error.
pub fn directory_not_empty(path: PathBuf) -> CliError {
    CliError::Core(ferrule_core::application::ApplicationError::DirectoryNotEmpty { path }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use ferrule_core::application::ApplicationError;
    use ferrule_core::domain::{DomainError, Provenance};

    #[test]
    fn exit_code_user_error() {
        let err: CliError = FerruleError::from(DomainError::InvalidProjectName {
            name: "1app".into(),
            reason: "name must begin with a letter or @".into(),
        })
        .into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(directory_not_empty(PathBuf::from("/tmp/x")).exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        let err: CliError = FerruleError::from(ApplicationError::PluginNotFound {
            name: "ghost".into(),
            provenance: Provenance::Global,
            reason: "Cannot find module 'ghost'".into(),
        })
        .into();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        let err: CliError = FerruleError::from(DomainError::InvalidPort("abc".into())).into();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn exit_code_internal() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("e"),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn declined_prompt_exits_cleanly() {
        assert_eq!(CliError::Cancelled.exit_code(), 0);
        assert_eq!(CliError::Cancelled.category(), ErrorCategory::UserError);
    }

    #[test]
    fn core_suggestions_pass_through() {
        let err = directory_not_empty(PathBuf::from("/tmp/x"));
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::Cancelled;
        let s = err.format_plain(false);
        assert!(s.contains("Error: Operation cancelled"));
        assert!(!s.contains('\u{1b}'));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
        assert!(!err.format_plain(true).contains("--verbose"));
    }
}
