//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `aladdin-adapters` crate provides implementations.

use crate::domain::{BuildStep, ComponentName};
use crate::error::AladdinResult;

/// Raw files of one component directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentEntry {
    /// `component.yaml` text, if the file exists.
    pub descriptor: Option<String>,
    pub has_dockerfile: bool,
}

/// A file to place in a new component directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFile {
    /// File name relative to the component directory.
    pub name: String,
    pub contents: String,
}

impl ComponentFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Port for the project's `components/` directory.
///
/// Implemented by:
/// - `aladdin_adapters::component_source::LocalComponentSource` (production)
/// - `aladdin_adapters::component_source::MemoryComponentSource` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait ComponentSource: Send + Sync {
    /// All component names, ascending.
    fn list(&self) -> AladdinResult<Vec<ComponentName>>;

    /// Read a component's files. Fails with `ComponentNotFound` when absent.
    fn load(&self, name: &ComponentName) -> AladdinResult<ComponentEntry>;

    fn exists(&self, name: &ComponentName) -> bool;

    /// Create the component directory with `files`. Fails with
    /// `ComponentExists` when the directory is already there.
    fn create(&self, name: &ComponentName, files: &[ComponentFile]) -> AladdinResult<()>;
}

/// Port for the external image builder.
///
/// Implemented by:
/// - `aladdin_adapters::builder::ExternalBuilder`
#[cfg_attr(test, mockall::automock)]
pub trait ImageBuilder: Send + Sync {
    /// Build one component image. A failure is reported as
    /// `BuildFailed` with the builder's status unchanged.
    fn build(&self, step: &BuildStep) -> AladdinResult<()>;
}

/// A command to run inside a component image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub image: String,
    /// Container path the project's `components/` directory is mounted at.
    pub mount: String,
    /// Working directory inside the container, if not the image default.
    pub working_dir: Option<String>,
    pub command: Vec<String>,
}

/// Port for a docker-compatible container runtime.
///
/// Implemented by:
/// - `aladdin_adapters::docker::DockerRunner`
#[cfg_attr(test, mockall::automock)]
pub trait ContainerRunner: Send + Sync {
    /// Run interactively; non-zero exit is `RunFailed`.
    fn run(&self, request: &RunRequest) -> AladdinResult<()>;

    fn image_exists(&self, image: &str) -> AladdinResult<bool>;

    /// Remove an image; removing a missing image is not an error.
    fn remove_image(&self, image: &str) -> AladdinResult<()>;

    /// The working directory an image starts in.
    fn image_workdir(&self, image: &str) -> AladdinResult<String>;
}

/// Port for the component's package manager.
///
/// Implemented by:
/// - `aladdin_adapters::lockfile::LockfileDigest`
#[cfg_attr(test, mockall::automock)]
pub trait PackageResolver: Send + Sync {
    /// Digest of the component's lock file, `None` when it has none.
    fn lock_digest(&self, component: &ComponentName) -> AladdinResult<Option<String>>;
}
