//! Aladdin Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the `components`
//! tool: it validates component descriptors, resolves their defaults, orders
//! components by dependency and hands build steps to an external builder.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          aladdin-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ComponentService, BuildService)      │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Source, Builder, Runner, Packages)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    aladdin-adapters (Infrastructure)    │
//! │ (LocalComponentSource, DockerRunner...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Schema, Resolver, Graph, Emitter)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use aladdin_core::domain::{BuildMode, ComponentName, DescriptorSchema, resolve};
//!
//! let name = ComponentName::new("api").unwrap();
//! let raw = "meta: {version: 1}\nlanguage: {name: python}\n";
//! let descriptor = DescriptorSchema::load(&name, raw).unwrap().unwrap();
//! let config = resolve(&descriptor, BuildMode::Development);
//! assert_eq!(config.workdir(), Some("/code"));
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BuildService, ComponentService, EditOutcome, NewComponent, ValidationReport,
        ports::{ComponentSource, ContainerRunner, ImageBuilder, PackageResolver},
    };
    pub use crate::domain::{
        BuildMode, BuildPlan, BuildStep, ComponentDescriptor, ComponentGraph, ComponentName,
        DescriptorSchema, ImageMode, ImageNaming, ResolvedComponentConfig,
    };
    pub use crate::error::{AladdinError, AladdinResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
