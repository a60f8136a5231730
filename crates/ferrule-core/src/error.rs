//! Unified error handling for ferrule-core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions and a display category.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

pub use crate::domain::ErrorCategory;

/// Root error type for ferrule-core operations.
#[derive(Debug, Error)]
pub enum FerruleError {
    /// Errors from the domain layer (rule violations).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },

    /// Errors raised by user-supplied code that must reach the caller as-is.
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl FerruleError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in ferrule".into(),
                "Please report this issue at: https://github.com/cosecruz/ferrule/issues".into(),
            ],
            Self::External(_) => vec!["The error was raised by project code".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::External(_) => ErrorCategory::Plugin,
        }
    }
}

/// Convenient result type alias.
pub type FerruleResult<T> = Result<T, FerruleError>;
