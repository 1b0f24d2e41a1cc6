//! The project file, `lamp.json`.
//!
//! Only the project name is read; it prefixes every image reference.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use aladdin_core::error::AladdinError;

pub const LAMP_FILE: &str = "lamp.json";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectFileError {
    #[error("{} not found; run the command from the project root", .path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Invalid {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl From<ProjectFileError> for AladdinError {
    fn from(err: ProjectFileError) -> Self {
        AladdinError::Configuration {
            message: err.to_string(),
        }
    }
}

/// Contents of `lamp.json` this tool relies on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LampFile {
    pub name: String,
}

impl LampFile {
    /// Read `path`.
    pub fn load(path: &Path) -> Result<Self, ProjectFileError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProjectFileError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ProjectFileError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;
        let lamp: Self = serde_json::from_str(&text).map_err(|e| ProjectFileError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if lamp.name.trim().is_empty() {
            return Err(ProjectFileError::Invalid {
                path: path.to_path_buf(),
                reason: "'name' cannot be empty".into(),
            });
        }
        Ok(lamp)
    }

    /// Read `lamp.json` in the project root.
    pub fn in_project(root: &Path) -> Result<Self, ProjectFileError> {
        Self::load(&root.join(LAMP_FILE))
    }
}
