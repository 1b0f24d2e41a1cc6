//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the outside
//! world (filesystem, external builder, container runtime), not descriptor
//! problems. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ComponentName;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// No directory under `components/` has this name.
    #[error("Component '{name}' does not exist")]
    ComponentNotFound { name: String },

    /// `create` target already exists.
    #[error("Component '{name}' already exists")]
    ComponentExists { name: ComponentName },

    /// Reading or writing component files failed.
    #[error("Cannot access {path}: {reason}")]
    SourceError { path: PathBuf, reason: String },

    /// The external builder reported failure. `status` is passed on verbatim.
    #[error("Build of '{component}' failed: {status}")]
    BuildFailed {
        component: ComponentName,
        status: String,
    },

    /// A container command did not complete successfully.
    #[error("Container run of {image} failed: {status}")]
    RunFailed { image: String, status: String },

    /// The image a command needs has not been built.
    #[error("Image {image} not found")]
    ImageNotFound { image: String },

    /// Lock-file inspection failed.
    #[error("Cannot read package lock of '{component}': {reason}")]
    PackageResolution {
        component: ComponentName,
        reason: String,
    },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ComponentNotFound { name } => vec![
                format!("No directory components/{name}"),
                "Try: components list".into(),
                format!("Or create it: components create {name}"),
            ],
            Self::ComponentExists { name } => vec![
                format!("components/{name} is already present"),
                "Choose a different component name".into(),
            ],
            Self::SourceError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Run the command from the project root (where lamp.json lives)".into(),
                "Check file permissions".into(),
            ],
            Self::BuildFailed { component, .. } => vec![
                format!("Inspect the builder output above for '{component}'"),
                "Re-run with -v for the exact builder invocation".into(),
            ],
            Self::RunFailed { .. } => vec![
                "Check that docker is installed and running".into(),
                "Re-run with -v for the exact docker command".into(),
            ],
            Self::ImageNotFound { image } => vec![
                format!("Build the image first: {image} is missing"),
                "Try: components build".into(),
            ],
            Self::PackageResolution { component, .. } => vec![format!(
                "Check components/{component}/poetry.lock is readable"
            )],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ComponentNotFound { .. } | Self::ImageNotFound { .. } => ErrorCategory::NotFound,
            Self::ComponentExists { .. } => ErrorCategory::Validation,
            Self::SourceError { .. } | Self::PackageResolution { .. } => ErrorCategory::Internal,
            Self::BuildFailed { .. } | Self::RunFailed { .. } => ErrorCategory::External,
        }
    }
}
