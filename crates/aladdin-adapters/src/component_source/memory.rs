//! In-memory component source for testing.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use aladdin_core::{
    application::{
        ApplicationError,
        ports::{ComponentEntry, ComponentFile, ComponentSource},
        services::{DESCRIPTOR_FILE, DOCKERFILE},
    },
    domain::ComponentName,
    error::{AladdinError, AladdinResult},
};

/// In-memory component source for testing.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// service.
#[derive(Debug, Clone, Default)]
pub struct MemoryComponentSource {
    inner: Arc<RwLock<BTreeMap<ComponentName, BTreeMap<String, String>>>>,
}

impl MemoryComponentSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component with a `component.yaml` (testing helper).
    pub fn with_descriptor(self, name: &str, descriptor: &str) -> AladdinResult<Self> {
        self.insert(name, DESCRIPTOR_FILE, descriptor)?;
        Ok(self)
    }

    /// Add a component with only a Dockerfile (testing helper).
    pub fn with_dockerfile(self, name: &str) -> AladdinResult<Self> {
        self.insert(name, DOCKERFILE, "")?;
        Ok(self)
    }

    /// Read a file back (testing helper).
    pub fn read_file(&self, name: &ComponentName, file: &str) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.get(name)?.get(file).cloned()
    }

    fn insert(&self, name: &str, file: &str, contents: &str) -> AladdinResult<()> {
        let name = ComponentName::new(name)?;
        let mut inner = self.inner.write().map_err(|_| lock_error())?;
        inner
            .entry(name)
            .or_default()
            .insert(file.to_string(), contents.to_string());
        Ok(())
    }
}

impl ComponentSource for MemoryComponentSource {
    fn list(&self) -> AladdinResult<Vec<ComponentName>> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        Ok(inner.keys().cloned().collect())
    }

    fn load(&self, name: &ComponentName) -> AladdinResult<ComponentEntry> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        let files = inner
            .get(name)
            .ok_or_else(|| ApplicationError::ComponentNotFound {
                name: name.to_string(),
            })?;
        Ok(ComponentEntry {
            descriptor: files.get(DESCRIPTOR_FILE).cloned(),
            has_dockerfile: files.contains_key(DOCKERFILE),
        })
    }

    fn exists(&self, name: &ComponentName) -> bool {
        self.inner
            .read()
            .map(|inner| inner.contains_key(name))
            .unwrap_or(false)
    }

    fn create(&self, name: &ComponentName, files: &[ComponentFile]) -> AladdinResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error())?;
        if inner.contains_key(name) {
            return Err(ApplicationError::ComponentExists { name: name.clone() }.into());
        }
        inner.insert(
            name.clone(),
            files
                .iter()
                .map(|f| (f.name.clone(), f.contents.clone()))
                .collect(),
        );
        Ok(())
    }
}

fn lock_error() -> AladdinError {
    AladdinError::Internal {
        message: "component source lock poisoned".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_components() {
        let source = MemoryComponentSource::new();
        let handle = source.clone();
        let name = ComponentName::new("api").unwrap();

        source
            .create(&name, &[ComponentFile::new("component.yaml", "meta: {version: 1}\n")])
            .unwrap();

        assert!(handle.exists(&name));
        assert_eq!(
            handle.read_file(&name, "component.yaml").as_deref(),
            Some("meta: {version: 1}\n")
        );
    }

    #[test]
    fn dockerfile_only_component_has_no_descriptor() {
        let source = MemoryComponentSource::new().with_dockerfile("legacy").unwrap();
        let entry = source.load(&ComponentName::new("legacy").unwrap()).unwrap();
        assert!(entry.descriptor.is_none());
        assert!(entry.has_dockerfile);
    }
}
