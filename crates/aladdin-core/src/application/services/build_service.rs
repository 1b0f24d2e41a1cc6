//! Build Service - image builds, container runs and the edit workflow.
//!
//! Build steps come from [`ComponentService::plan`]; nothing reaches the
//! external builder unless every descriptor is valid and the graph is
//! acyclic. Builder and runner failures are passed on unchanged and never
//! retried.

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ContainerRunner, ImageBuilder, PackageResolver, RunRequest},
        services::ComponentService,
    },
    domain::{ArtifactRef, BuildStep, ComponentName, ImageNaming},
    error::AladdinResult,
};

/// Tag of the images `run` and `edit` start.
pub const EDITOR_TAG: &str = "editor";

/// Command `run` uses when none is given.
pub const DEFAULT_COMMAND: &str = "/bin/bash";

/// Result of [`BuildService::edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The lock file did not change; nothing was rebuilt.
    Unchanged,
    /// The component and, after it, its dependents were rebuilt.
    Rebuilt {
        component: ComponentName,
        dependents: Vec<ComponentName>,
    },
}

/// Service for building and running component images.
pub struct BuildService {
    components: ComponentService,
    builder: Box<dyn ImageBuilder>,
    runner: Box<dyn ContainerRunner>,
    packages: Box<dyn PackageResolver>,
    editor_tag: String,
}

impl BuildService {
    /// Create a new build service with the given adapters.
    pub fn new(
        components: ComponentService,
        builder: Box<dyn ImageBuilder>,
        runner: Box<dyn ContainerRunner>,
        packages: Box<dyn PackageResolver>,
    ) -> Self {
        Self {
            components,
            builder,
            runner,
            packages,
            editor_tag: EDITOR_TAG.to_string(),
        }
    }

    /// Use a different tag for `run`/`edit` images.
    pub fn with_editor_tag(mut self, tag: impl Into<String>) -> Self {
        self.editor_tag = tag.into();
        self
    }

    pub fn components(&self) -> &ComponentService {
        &self.components
    }

    /// Build `selection` (every component when empty) and its dependencies.
    ///
    /// Stops at the first failing step.
    #[instrument(skip_all, fields(selected = selection.len()))]
    pub fn build(&self, selection: &[ComponentName]) -> AladdinResult<Vec<ArtifactRef>> {
        let steps = self.components.plan(selection)?;
        info!(steps = steps.len(), "Building component images");
        self.execute(&steps)
    }

    /// Run `command` in a component's editor container, with `components/`
    /// mounted at the image's working directory.
    #[instrument(skip_all, fields(component = %component))]
    pub fn run(&self, component: &ComponentName, command: &[String]) -> AladdinResult<()> {
        let request = self.run_request(component, command, false)?;
        self.runner.run(&request)
    }

    /// Open a shell in the component's editor container, starting in the
    /// component's own directory. If its package lock file changed by the time
    /// the shell exits, rebuild the component and everything depending on it.
    #[instrument(skip_all, fields(component = %component))]
    pub fn edit(&self, component: &ComponentName) -> AladdinResult<EditOutcome> {
        let image = self.editor_naming().image_for(component);
        if !self.runner.image_exists(&image)? {
            return Err(ApplicationError::ImageNotFound { image }.into());
        }

        let before = self.packages.lock_digest(component)?;
        let request = self.run_request(component, &[DEFAULT_COMMAND.to_string()], true)?;
        if let Err(err) = self.runner.run(&request) {
            warn!(error = %err, "Encountered an error when editing the component");
            return Err(err);
        }
        let after = self.packages.lock_digest(component)?;

        if before == after {
            info!("No changes detected; will not rebuild the component image");
            return Ok(EditOutcome::Unchanged);
        }

        let dependents = self.components.graph()?.dependents_of(component);
        info!(
            dependents = ?dependents,
            "Changes detected; rebuilding the component and its dependents"
        );

        let mut order = Vec::with_capacity(dependents.len() + 1);
        order.push(component.clone());
        order.extend(dependents.iter().cloned());
        self.execute(&self.components.steps_for(order)?)?;

        Ok(EditOutcome::Rebuilt {
            component: component.clone(),
            dependents,
        })
    }

    /// Remove a component's stale editor image, if present.
    pub fn discard_editor_image(&self, component: &ComponentName) -> AladdinResult<()> {
        let image = self.editor_naming().image_for(component);
        self.runner.remove_image(&image)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn execute(&self, steps: &[BuildStep]) -> AladdinResult<Vec<ArtifactRef>> {
        let mut built = Vec::with_capacity(steps.len());
        for step in steps {
            info!(
                component = %step.component(),
                image = %step.artifact,
                dependencies = step.dependencies.len(),
                "Building image"
            );
            self.builder.build(step)?;
            built.push(step.artifact.clone());
        }
        Ok(built)
    }

    fn editor_naming(&self) -> ImageNaming {
        ImageNaming::new(self.components.naming().project(), self.editor_tag.clone())
    }

    fn run_request(
        &self,
        component: &ComponentName,
        command: &[String],
        in_component_dir: bool,
    ) -> AladdinResult<RunRequest> {
        let image = self.editor_naming().image_for(component);
        let config = self.components.resolve(component)?;

        let mount = match config.workdir() {
            Some(workdir) => workdir.to_string(),
            // Traditional images: ask the image itself.
            None => self.runner.image_workdir(&image)?,
        };
        let working_dir =
            in_component_dir.then(|| format!("{}/{}", mount.trim_end_matches('/'), component));
        let command = if command.is_empty() {
            vec![DEFAULT_COMMAND.to_string()]
        } else {
            command.to_vec()
        };

        Ok(RunRequest {
            image,
            mount,
            working_dir,
            command,
        })
    }
}
