//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `aladdin-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ComponentSource`: component directories and their files
//!   - `ImageBuilder`: the external per-component image builder
//!   - `ContainerRunner`: docker-compatible container runtime
//!   - `PackageResolver`: package lock-file digests
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ComponentEntry, ComponentFile, ComponentSource, ContainerRunner, ImageBuilder,
    PackageResolver, RunRequest,
};

#[cfg(test)]
pub use output::{MockComponentSource, MockContainerRunner, MockImageBuilder, MockPackageResolver};
