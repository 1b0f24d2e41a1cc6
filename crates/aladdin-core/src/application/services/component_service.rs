//! Component Service - descriptor loading, validation and planning.
//!
//! Reads component directories through the [`ComponentSource`] port and runs
//! them through the domain pipeline:
//! 1. Validate `component.yaml` (or fall back to a bare Dockerfile)
//! 2. Resolve defaults for the configured build mode
//! 3. Build the dependency graph and emit build steps

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ComponentFile, ComponentSource},
    },
    domain::{
        BuildMode, BuildPlan, BuildPlanEmitter, BuildStep, CompatibleImage, CompatibleUser,
        CompatibleWorkdir, ComponentDescriptor, ComponentGraph, ComponentName, DescriptorSchema,
        DomainError, ImageMode, ImageNaming, ImageSpec, Language, LanguageSpec,
        ResolvedComponentConfig, SCHEMA_VERSION, SchemaViolation, StandardImage, resolve,
    },
    error::{AladdinError, AladdinResult},
};

pub const DESCRIPTOR_FILE: &str = "component.yaml";
pub const DOCKERFILE: &str = "Dockerfile";

/// Outcome of validating a set of components.
///
/// Every reached component is checked; failures are collected rather than
/// stopping at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// The selection and its transitive dependencies, ascending.
    pub checked: Vec<ComponentName>,
    /// Every failure found, per-component errors first, then a graph error.
    pub errors: Vec<AladdinError>,
    /// Whether the dependency graph could be checked at all.
    pub graph_checked: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What `create` should write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComponent {
    pub name: ComponentName,
    pub mode: ImageMode,
    /// Language version; the language default when `None`.
    pub language_version: Option<String>,
    /// Base image: required for compatible and traditional components.
    pub base: Option<String>,
    /// Compatible images: the image's existing user and working directory.
    pub user: Option<String>,
    pub group: Option<String>,
    pub home: Option<String>,
    pub workdir: Option<String>,
    pub dependencies: Vec<ComponentName>,
    /// Also write a starter Dockerfile (always written for traditional).
    pub dockerfile: bool,
}

impl NewComponent {
    pub fn new(name: ComponentName, mode: ImageMode) -> Self {
        Self {
            name,
            mode,
            language_version: None,
            base: None,
            user: None,
            group: None,
            home: None,
            workdir: None,
            dependencies: Vec::new(),
            dockerfile: false,
        }
    }
}

/// Service for component descriptors and build plans.
pub struct ComponentService {
    source: Box<dyn ComponentSource>,
    mode: BuildMode,
    naming: ImageNaming,
}

impl ComponentService {
    /// Create a new component service.
    pub fn new(source: Box<dyn ComponentSource>, mode: BuildMode, naming: ImageNaming) -> Self {
        Self {
            source,
            mode,
            naming,
        }
    }

    pub fn build_mode(&self) -> BuildMode {
        self.mode
    }

    pub fn naming(&self) -> &ImageNaming {
        &self.naming
    }

    /// All component names, ascending.
    pub fn list(&self) -> AladdinResult<Vec<ComponentName>> {
        self.source.list()
    }

    /// Load and validate one component's descriptor.
    ///
    /// A component without `component.yaml` (or with an empty one) is a
    /// traditional component if it has a Dockerfile.
    pub fn load(&self, name: &ComponentName) -> AladdinResult<ComponentDescriptor> {
        let entry = self.source.load(name)?;
        let descriptor = match entry.descriptor.as_deref() {
            Some(raw) => DescriptorSchema::load(name, raw)?,
            None => None,
        };

        match descriptor {
            Some(d) if d.mode() == ImageMode::Traditional && !entry.has_dockerfile => {
                Err(DomainError::MissingDockerfile {
                    component: name.clone(),
                }
                .into())
            }
            Some(d) => Ok(d),
            None if entry.has_dockerfile => {
                debug!(component = %name, "No descriptor; treating as traditional component");
                Ok(ComponentDescriptor::traditional(name.clone()))
            }
            None => Err(DomainError::MissingDescriptor {
                component: name.clone(),
            }
            .into()),
        }
    }

    /// Load and resolve one component.
    pub fn resolve(&self, name: &ComponentName) -> AladdinResult<ResolvedComponentConfig> {
        Ok(resolve(&self.load(name)?, self.mode))
    }

    /// Resolve every component, stopping at the first failure.
    pub fn resolve_all(&self) -> AladdinResult<BTreeMap<ComponentName, ResolvedComponentConfig>> {
        self.source
            .list()?
            .into_iter()
            .map(|name| self.resolve(&name).map(|config| (name, config)))
            .collect()
    }

    /// Validate `selection` (every component when empty) and everything it
    /// depends on, collecting all failures.
    ///
    /// The dependency graph of those components is checked once all of them
    /// load.
    #[instrument(skip_all, fields(selected = selection.len()))]
    pub fn validate(&self, selection: &[ComponentName]) -> AladdinResult<ValidationReport> {
        let all = self.source.list()?;
        let selected = self.select(&all, selection)?;
        let reached = self.reach(&all, &selected);

        let mut report = ValidationReport {
            checked: reached.keys().cloned().collect(),
            ..ValidationReport::default()
        };
        let mut configs = BTreeMap::new();
        for (name, resolved) in reached {
            match resolved {
                Ok(config) => {
                    configs.insert(name, config);
                }
                Err(err) => {
                    info!(component = %name, error = %err, "Component is invalid");
                    report.errors.push(err);
                }
            }
        }

        if report.errors.is_empty() {
            report.graph_checked = true;
            if let Err(err) = ComponentGraph::build(&configs) {
                info!(error = %err, "Dependency graph is invalid");
                report.errors.push(err.into());
            }
        }

        info!(
            checked = report.checked.len(),
            errors = report.errors.len(),
            "Validation finished"
        );
        Ok(report)
    }

    /// Compute the build steps for `selection` (every component when empty).
    ///
    /// A non-empty selection is extended with its transitive dependencies;
    /// components outside that set are never loaded. Fails on the first
    /// invalid component, before anything is built.
    #[instrument(skip_all, fields(selected = selection.len()))]
    pub fn plan(&self, selection: &[ComponentName]) -> AladdinResult<Vec<BuildStep>> {
        let all = self.source.list()?;
        let selected = self.select(&all, selection)?;
        let configs = self
            .reach(&all, &selected)
            .into_iter()
            .map(|(name, resolved)| resolved.map(|config| (name, config)))
            .collect::<AladdinResult<BTreeMap<_, _>>>()?;

        let graph = ComponentGraph::build(&configs)?;
        let plan = if selection.is_empty() {
            graph.build_order()?
        } else {
            graph.closure(&selected)
        };
        debug!(plan = ?plan.components(), "Build order computed");

        Ok(self.emit(&plan, &configs))
    }

    /// Steps for exactly `order`, which must already be a valid build order.
    pub fn steps_for(&self, order: Vec<ComponentName>) -> AladdinResult<Vec<BuildStep>> {
        let configs = self.resolve_all()?;
        Ok(self.emit(&BuildPlan::new(order), &configs))
    }

    /// The validated dependency graph of every component.
    pub fn graph(&self) -> AladdinResult<ComponentGraph> {
        Ok(ComponentGraph::build(&self.resolve_all()?)?)
    }

    /// Write a new component directory.
    ///
    /// Returns the descriptor that was written, already validated.
    #[instrument(skip_all, fields(component = %new.name, mode = %new.mode))]
    pub fn create(&self, new: &NewComponent) -> AladdinResult<ComponentDescriptor> {
        if self.source.exists(&new.name) {
            return Err(ApplicationError::ComponentExists {
                name: new.name.clone(),
            }
            .into());
        }
        for dep in &new.dependencies {
            if !self.source.exists(dep) {
                return Err(ApplicationError::ComponentNotFound {
                    name: dep.to_string(),
                }
                .into());
            }
        }

        let descriptor = self.descriptor_for(new)?;
        let schema_error = |violation| DomainError::Schema {
            component: new.name.clone(),
            violation,
        };

        let mut files = Vec::new();
        // A traditional component without dependencies needs only its Dockerfile.
        if descriptor.mode() != ImageMode::Traditional || !descriptor.dependencies.is_empty() {
            let text = DescriptorSchema::render(&descriptor).map_err(schema_error)?;
            DescriptorSchema::validate(&new.name, &text).map_err(schema_error)?;
            files.push(ComponentFile::new(DESCRIPTOR_FILE, text));
        }
        match (&descriptor.image, &new.base) {
            (ImageSpec::Traditional, Some(base)) => {
                files.push(ComponentFile::new(DOCKERFILE, traditional_dockerfile(base)));
            }
            (ImageSpec::Standard(_), _) if new.dockerfile => {
                files.push(ComponentFile::new(DOCKERFILE, STANDARD_DOCKERFILE));
            }
            (ImageSpec::Compatible(_), _) if new.dockerfile => {
                files.push(ComponentFile::new(DOCKERFILE, COMPATIBLE_DOCKERFILE));
            }
            _ => {}
        }

        self.source.create(&new.name, &files)?;
        info!(files = files.len(), "Component created");
        Ok(descriptor)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// `selection`, or everything when it is empty; unknown names fail.
    fn select(
        &self,
        all: &[ComponentName],
        selection: &[ComponentName],
    ) -> AladdinResult<Vec<ComponentName>> {
        if selection.is_empty() {
            return Ok(all.to_vec());
        }
        let mut selected = Vec::with_capacity(selection.len());
        for name in selection {
            if all.binary_search(name).is_err() {
                return Err(ApplicationError::ComponentNotFound {
                    name: name.to_string(),
                }
                .into());
            }
            if !selected.contains(name) {
                selected.push(name.clone());
            }
        }
        selected.sort();
        Ok(selected)
    }

    /// Resolve `roots` and, transitively, every declared dependency that
    /// exists. Unknown references are left for the graph check.
    fn reach(
        &self,
        all: &[ComponentName],
        roots: &[ComponentName],
    ) -> BTreeMap<ComponentName, AladdinResult<ResolvedComponentConfig>> {
        let mut reached = BTreeMap::new();
        let mut pending: BTreeSet<ComponentName> = roots.iter().cloned().collect();
        while let Some(name) = pending.pop_first() {
            let resolved = self.resolve(&name);
            if let Ok(config) = &resolved {
                for dep in &config.dependencies {
                    if *dep != name && !reached.contains_key(dep) && all.binary_search(dep).is_ok()
                    {
                        pending.insert(dep.clone());
                    }
                }
            }
            reached.insert(name, resolved);
        }
        reached
    }

    fn emit(
        &self,
        plan: &BuildPlan,
        configs: &BTreeMap<ComponentName, ResolvedComponentConfig>,
    ) -> Vec<BuildStep> {
        BuildPlanEmitter::new(self.naming.clone()).emit(plan, configs)
    }

    fn descriptor_for(&self, new: &NewComponent) -> AladdinResult<ComponentDescriptor> {
        let missing = |field: &str| -> AladdinError {
            DomainError::Schema {
                component: new.name.clone(),
                violation: SchemaViolation::MissingRequiredField {
                    field: field.to_string(),
                },
            }
            .into()
        };
        let language = LanguageSpec {
            version: Some(
                new.language_version
                    .clone()
                    .unwrap_or_else(|| Language::Python.default_version().to_string()),
            ),
            ..LanguageSpec::new(Language::Python)
        };

        let (language, image) = match new.mode {
            ImageMode::Standard => (Some(language), ImageSpec::Standard(StandardImage::default())),
            ImageMode::Compatible => {
                let image = CompatibleImage {
                    base: new.base.clone().ok_or_else(|| missing("image.base"))?,
                    packages: None,
                    user: CompatibleUser {
                        name: new.user.clone().ok_or_else(|| missing("image.user.name"))?,
                        create: None,
                        group: new.group.clone(),
                        home: new.home.clone(),
                        sudo: None,
                    },
                    workdir: CompatibleWorkdir {
                        path: new
                            .workdir
                            .clone()
                            .ok_or_else(|| missing("image.workdir.path"))?,
                        create: None,
                    },
                };
                (Some(language), ImageSpec::Compatible(image))
            }
            ImageMode::Traditional => {
                if new.base.is_none() {
                    return Err(missing("image.base"));
                }
                (None, ImageSpec::Traditional)
            }
        };

        Ok(ComponentDescriptor {
            name: new.name.clone(),
            meta_version: SCHEMA_VERSION,
            language,
            image,
            dependencies: new.dependencies.clone(),
        })
    }
}

const STANDARD_DOCKERFILE: &str = "\
### BASIC DOCKERFILE ###########################################################
# Edit this file to further specialize your component image
################################################################################

# Warning: If you change the image USER, update component.yaml accordingly so
#          that the python packages keep working.

# Note: Do not provide any FROM instructions in this file.
";

const COMPATIBLE_DOCKERFILE: &str = "\
### BASIC DOCKERFILE ###########################################################
# Edit this file to further specialize your component image
################################################################################

# Note: Do not provide any FROM instructions in this file.
";

fn traditional_dockerfile(base: &str) -> String {
    format!(
        "\
### TRADITIONAL DOCKERFILE #####################################################
# Edit this file to further specialize your component image
################################################################################

FROM {base}
"
    )
}
