//! Build-step emission.
//!
//! Pairs every component of a [`BuildPlan`] with the image references of its
//! direct dependencies, which is everything an external builder needs to
//! compose a multi-stage image.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::resolved::ResolvedComponentConfig, graph::BuildPlan, value_objects::ComponentName,
};

/// Image tag used for locally built images.
pub const DEFAULT_TAG: &str = "local";

/// How component images are named: `<project>-<component>:<tag>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNaming {
    project: String,
    tag: String,
}

impl ImageNaming {
    pub fn new(project: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            tag: tag.into(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn image_for(&self, component: &ComponentName) -> String {
        format!("{}-{}:{}", self.project, component, self.tag)
    }

    pub fn artifact(&self, component: &ComponentName) -> ArtifactRef {
        ArtifactRef {
            component: component.clone(),
            image: self.image_for(component),
        }
    }
}

/// A built (or to-be-built) component image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactRef {
    pub component: ComponentName,
    pub image: String,
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.image)
    }
}

/// One unit of work for the external builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStep {
    pub config: ResolvedComponentConfig,
    /// The image this step produces.
    pub artifact: ArtifactRef,
    /// Direct dependencies, in plan order.
    pub dependencies: Vec<ArtifactRef>,
}

impl BuildStep {
    pub fn component(&self) -> &ComponentName {
        &self.config.name
    }
}

/// Turns a [`BuildPlan`] into [`BuildStep`]s.
#[derive(Debug, Clone)]
pub struct BuildPlanEmitter {
    naming: ImageNaming,
}

impl BuildPlanEmitter {
    pub fn new(naming: ImageNaming) -> Self {
        Self { naming }
    }

    pub fn naming(&self) -> &ImageNaming {
        &self.naming
    }

    /// Emit one step per planned component that has a configuration.
    ///
    /// Dependencies are ordered by their position in the plan. A dependency
    /// missing from the plan is still referenced (after the planned ones, by
    /// name); the emitter never fails.
    pub fn emit(
        &self,
        plan: &BuildPlan,
        configs: &BTreeMap<ComponentName, ResolvedComponentConfig>,
    ) -> Vec<BuildStep> {
        plan.iter()
            .filter_map(|name| configs.get(name))
            .map(|config| {
                let mut dependencies: Vec<&ComponentName> = config.dependencies.iter().collect();
                dependencies.sort_by_key(|dep| (plan.position(dep).unwrap_or(usize::MAX), *dep));
                BuildStep {
                    artifact: self.naming.artifact(&config.name),
                    dependencies: dependencies
                        .into_iter()
                        .map(|dep| self.naming.artifact(dep))
                        .collect(),
                    config: config.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::resolved::ResolvedImage;

    fn name(s: &str) -> ComponentName {
        ComponentName::new(s).unwrap()
    }

    fn configs(entries: &[(&str, &[&str])]) -> BTreeMap<ComponentName, ResolvedComponentConfig> {
        entries
            .iter()
            .map(|(n, deps)| {
                (
                    name(n),
                    ResolvedComponentConfig {
                        name: name(n),
                        language: None,
                        image: ResolvedImage::Traditional,
                        dependencies: deps.iter().map(|d| name(d)).collect(),
                    },
                )
            })
            .collect()
    }

    fn emitter() -> BuildPlanEmitter {
        BuildPlanEmitter::new(ImageNaming::new("shop", DEFAULT_TAG))
    }

    #[test]
    fn image_names_follow_project_convention() {
        let naming = ImageNaming::new("shop", "local");
        assert_eq!(naming.image_for(&name("api")), "shop-api:local");
    }

    #[test]
    fn dependencies_are_ordered_by_plan_position() {
        let configs = configs(&[
            ("app", &["zeta", "alpha"]),
            ("alpha", &["zeta"]),
            ("zeta", &[]),
        ]);
        let plan = BuildPlan::new(vec![name("zeta"), name("alpha"), name("app")]);
        let steps = emitter().emit(&plan, &configs);

        assert_eq!(steps.len(), 3);
        let app = &steps[2];
        assert_eq!(app.component(), &name("app"));
        assert_eq!(app.artifact.image, "shop-app:local");
        let deps: Vec<&str> = app.dependencies.iter().map(|d| d.image.as_str()).collect();
        assert_eq!(deps, ["shop-zeta:local", "shop-alpha:local"]);
    }

    #[test]
    fn unplanned_dependency_is_still_referenced() {
        let configs = configs(&[("api", &["shared"]), ("shared", &[])]);
        let plan = BuildPlan::new(vec![name("api")]);
        let steps = emitter().emit(&plan, &configs);

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].dependencies, vec![emitter().naming().artifact(&name("shared"))]);
    }

    #[test]
    fn steps_serialize_for_machine_output() {
        let configs = configs(&[("api", &[])]);
        let plan = BuildPlan::new(vec![name("api")]);
        let json = serde_json::to_value(emitter().emit(&plan, &configs)).unwrap();
        assert_eq!(json[0]["artifact"]["image"], "shop-api:local");
        assert_eq!(json[0]["config"]["image"]["mode"], "traditional");
    }
}
