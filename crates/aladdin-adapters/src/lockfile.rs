//! Poetry lock-file digests.
//!
//! `edit` compares the digest before and after the editor session to decide
//! whether the component's dependencies changed.

use std::io;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use aladdin_core::{
    application::{ApplicationError, ports::PackageResolver},
    domain::ComponentName,
    error::AladdinResult,
};

pub const LOCK_FILE: &str = "poetry.lock";

/// SHA-256 of `components/<name>/poetry.lock`.
#[derive(Debug, Clone)]
pub struct LockfileDigest {
    components_dir: PathBuf,
}

impl LockfileDigest {
    pub fn new(components_dir: impl Into<PathBuf>) -> Self {
        Self {
            components_dir: components_dir.into(),
        }
    }
}

impl PackageResolver for LockfileDigest {
    fn lock_digest(&self, component: &ComponentName) -> AladdinResult<Option<String>> {
        let path = self.components_dir.join(component.as_str()).join(LOCK_FILE);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(format!("{:x}", Sha256::digest(&bytes)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApplicationError::PackageResolution {
                component: component.clone(),
                reason: format!("{}: {}", path.display(), e),
            }
            .into()),
        }
    }
}
