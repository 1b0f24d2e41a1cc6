//! On-disk component source using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use aladdin_core::{
    application::{
        ApplicationError,
        ports::{ComponentEntry, ComponentFile, ComponentSource},
        services::{DESCRIPTOR_FILE, DOCKERFILE},
    },
    domain::ComponentName,
    error::{AladdinError, AladdinResult},
};

/// Production component source: every directory directly under the
/// project's `components/` directory is a component.
#[derive(Debug, Clone)]
pub struct LocalComponentSource {
    root: PathBuf,
}

impl LocalComponentSource {
    /// Create a source reading from `root` (the `components/` directory).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, name: &ComponentName) -> PathBuf {
        self.root.join(name.as_str())
    }

    fn write_all(&self, dir: &Path, files: &[ComponentFile]) -> AladdinResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| map_io_error(dir, e, "create directory"))?;
        for file in files {
            let path = dir.join(&file.name);
            std::fs::write(&path, &file.contents).map_err(|e| map_io_error(&path, e, "write file"))?;
            info!(path = %path.display(), "Created file");
        }
        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, dir: &Path) {
        if let Err(e) = std::fs::remove_dir_all(dir) {
            warn!(error = %e, path = %dir.display(), "Rollback failed");
        } else {
            info!("Rollback successful");
        }
    }
}

impl ComponentSource for LocalComponentSource {
    fn list(&self) -> AladdinResult<Vec<ComponentName>> {
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| map_io_error(&self.root, e, "read directory"))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(&self.root, e, "read directory"))?;
            if !entry.path().is_dir() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            match ComponentName::new(file_name.as_str()) {
                Ok(name) => names.push(name),
                Err(e) => debug!(directory = %file_name, reason = %e, "Skipping directory"),
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &ComponentName) -> AladdinResult<ComponentEntry> {
        let dir = self.dir(name);
        if !dir.is_dir() {
            return Err(ApplicationError::ComponentNotFound {
                name: name.to_string(),
            }
            .into());
        }

        let descriptor_path = dir.join(DESCRIPTOR_FILE);
        let descriptor = match std::fs::read_to_string(&descriptor_path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(map_io_error(&descriptor_path, e, "read file")),
        };

        Ok(ComponentEntry {
            descriptor,
            has_dockerfile: dir.join(DOCKERFILE).is_file(),
        })
    }

    fn exists(&self, name: &ComponentName) -> bool {
        self.dir(name).exists()
    }

    fn create(&self, name: &ComponentName, files: &[ComponentFile]) -> AladdinResult<()> {
        let dir = self.dir(name);
        if dir.exists() {
            return Err(ApplicationError::ComponentExists { name: name.clone() }.into());
        }

        match self.write_all(&dir, files) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(&dir);
                Err(e)
            }
        }
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> AladdinError {
    ApplicationError::SourceError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
