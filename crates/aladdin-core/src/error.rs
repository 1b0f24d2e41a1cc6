//! Unified error handling for the component tooling.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for core operations.
///
/// Wraps every error the core can produce, so ports and services share a
/// single result type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AladdinError {
    /// Descriptor or dependency-graph problems.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl AladdinError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Inspect the effective settings: components config list".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug, please report it".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Graph => ErrorCategory::Graph,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Graph,
    NotFound,
    Configuration,
    /// The external builder or container runtime failed.
    External,
    Internal,
}

/// Convenient result type alias.
pub type AladdinResult<T> = Result<T, AladdinError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> AladdinResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> AladdinResult<T> {
        self.map_err(|e| AladdinError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

impl From<crate::domain::GraphError> for AladdinError {
    fn from(err: crate::domain::GraphError) -> Self {
        Self::Domain(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComponentName, GraphError};

    #[test]
    fn graph_errors_keep_their_category() {
        let err: AladdinError = GraphError::CyclicDependency {
            cycle: vec![ComponentName::new("a").unwrap()],
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Graph);
        assert_eq!(err.to_string(), "cyclic dependency: a -> a");
    }

    #[test]
    fn context_wraps_foreign_errors_as_internal() {
        let res: Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let err = res.context("formatting").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("formatting"));
    }
}
