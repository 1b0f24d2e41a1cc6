//! Infrastructure adapters for the components tool.
//!
//! This crate implements the ports defined in `aladdin_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builder;
pub mod component_source;
pub mod docker;
pub mod lockfile;
pub mod project;

// Re-export commonly used adapters
pub use builder::ExternalBuilder;
pub use component_source::{LocalComponentSource, MemoryComponentSource};
pub use docker::DockerRunner;
pub use lockfile::LockfileDigest;
pub use project::{LampFile, ProjectFileError};
