//! Application layer for the component tooling.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ComponentService, BuildService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All descriptor and graph rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BuildService, ComponentService, EditOutcome, NewComponent, ValidationReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ComponentEntry, ComponentFile, ComponentSource, ContainerRunner, ImageBuilder,
    PackageResolver, RunRequest,
};

pub use error::ApplicationError;
