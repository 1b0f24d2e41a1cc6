//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "plan a build" or "edit a component".

pub mod build_service;
pub mod component_service;

pub use build_service::{BuildService, DEFAULT_COMMAND, EDITOR_TAG, EditOutcome};
pub use component_service::{
    ComponentService, DESCRIPTOR_FILE, DOCKERFILE, NewComponent, ValidationReport,
};
