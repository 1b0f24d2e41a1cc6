// ============================================================================
//  DESCRIPTOR → RESOLVED CONFIG → GRAPH → BUILD STEPS
// ============================================================================

//! Core domain layer for component builds.
//!
//! Pure logic, synchronous, no I/O. Raw descriptor text comes in through the
//! application layer's ports; everything here is a function of its inputs.
//!
//! ## Pipeline
//!
//! 1. [`DescriptorSchema`] validates `component.yaml` into a [`ComponentDescriptor`]
//! 2. [`resolve`] applies mode-specific defaults, giving a [`ResolvedComponentConfig`]
//! 3. [`ComponentGraph`] checks references and cycles and yields a [`BuildPlan`]
//! 4. [`BuildPlanEmitter`] pairs each planned component with its dependency artifacts
//!
pub mod entities;
pub mod error;
pub mod graph;
pub mod plan;
pub mod resolver;
pub mod schema;
pub mod value_objects;

pub use entities::{
    descriptor::{
        CompatibleImage, CompatibleUser, CompatibleWorkdir, ComponentDescriptor, ImageSpec,
        LanguageSpec, PythonSpec, SCHEMA_VERSION, StandardImage, UserSpec, WorkdirSpec,
    },
    resolved::{
        ResolvedComponentConfig, ResolvedImage, ResolvedImageConfig, ResolvedLanguage,
        ResolvedUser, ResolvedWorkdir,
    },
};

pub use error::{DomainError, ErrorCategory, GraphError, SchemaViolation};
pub use graph::{BuildPlan, ComponentGraph};
pub use plan::{ArtifactRef, BuildPlanEmitter, BuildStep, DEFAULT_TAG, ImageNaming};
pub use resolver::{DEFAULT_USER, DEFAULT_WORKDIR, resolve};
pub use schema::DescriptorSchema;
pub use value_objects::{BuildMode, ComponentName, ImageMode, Language};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    // ========================================================================
    // Whole pipeline
    // ========================================================================

    fn load(name: &str, raw: &str) -> (ComponentName, ResolvedComponentConfig) {
        let name = ComponentName::new(name).unwrap();
        let descriptor = DescriptorSchema::load(&name, raw).unwrap().unwrap();
        (name, resolve(&descriptor, BuildMode::Development))
    }

    #[test]
    fn descriptors_flow_into_ordered_build_steps() {
        let configs: BTreeMap<_, _> = [
            load("shared", "meta: {version: 1}\nlanguage: {name: python}\n"),
            load(
                "api",
                "meta: {version: 1}\nlanguage: {name: python}\ndependencies: [shared]\n",
            ),
            load(
                "worker",
                "meta: {version: 1}\nimage: {mode: traditional}\ndependencies: [shared]\n",
            ),
        ]
        .into_iter()
        .collect();

        let graph = ComponentGraph::build(&configs).unwrap();
        let plan = graph.build_order().unwrap();
        let steps =
            BuildPlanEmitter::new(ImageNaming::new("shop", DEFAULT_TAG)).emit(&plan, &configs);

        let order: Vec<&str> = steps.iter().map(|s| s.component().as_str()).collect();
        assert_eq!(order, ["shared", "api", "worker"]);
        assert_eq!(steps[1].dependencies[0].image, "shop-shared:local");
        assert_eq!(steps[2].config.mode(), ImageMode::Traditional);
        assert_eq!(
            steps[0].config.workdir(),
            Some(DEFAULT_WORKDIR),
            "standard images get the default workdir"
        );
    }

    #[test]
    fn unknown_reference_surfaces_as_domain_error() {
        let configs: BTreeMap<_, _> = [load(
            "api",
            "meta: {version: 1}\nlanguage: {name: python}\ndependencies: [ghost]\n",
        )]
        .into_iter()
        .collect();

        let err: DomainError = ComponentGraph::build(&configs).unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Graph);
        assert!(err.to_string().contains("ghost"));
    }
}
