//! Fully-resolved component configuration.
//!
//! Produced by the resolver, consumed by the graph builder and the plan
//! emitter, and serialized to JSON for the external builder. Nothing here is
//! optional except what the image mode makes meaningless.

use serde::{Deserialize, Serialize};

use crate::domain::entities::descriptor::{
    CompatibleImage, CompatibleUser, CompatibleWorkdir, ComponentDescriptor, ImageSpec,
    LanguageSpec, PythonSpec, SCHEMA_VERSION, StandardImage, UserSpec, WorkdirSpec,
};
use crate::domain::value_objects::{ComponentName, ImageMode, Language};

/// A component configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedComponentConfig {
    pub name: ComponentName,
    /// `None` for traditional images.
    pub language: Option<ResolvedLanguage>,
    pub image: ResolvedImage,
    pub dependencies: Vec<ComponentName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLanguage {
    pub name: Language,
    pub version: String,
    pub interpreter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResolvedImage {
    Standard(ResolvedImageConfig),
    Compatible {
        base: String,
        #[serde(flatten)]
        config: ResolvedImageConfig,
    },
    Traditional,
}

/// Conventions applied on top of the base image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImageConfig {
    pub packages: Vec<String>,
    pub user: ResolvedUser,
    pub workdir: ResolvedWorkdir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUser {
    pub create: bool,
    pub name: String,
    pub group: String,
    pub home: String,
    pub sudo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWorkdir {
    pub create: bool,
    pub path: String,
}

impl ResolvedComponentConfig {
    pub const fn mode(&self) -> ImageMode {
        match self.image {
            ResolvedImage::Standard(_) => ImageMode::Standard,
            ResolvedImage::Compatible { .. } => ImageMode::Compatible,
            ResolvedImage::Traditional => ImageMode::Traditional,
        }
    }

    /// User and workdir conventions, absent for traditional images.
    pub fn conventions(&self) -> Option<&ResolvedImageConfig> {
        match &self.image {
            ResolvedImage::Standard(config) | ResolvedImage::Compatible { config, .. } => {
                Some(config)
            }
            ResolvedImage::Traditional => None,
        }
    }

    /// Container working directory, when the configuration defines one.
    pub fn workdir(&self) -> Option<&str> {
        self.conventions().map(|c| c.workdir.path.as_str())
    }

    /// The equivalent descriptor with every field spelled out.
    ///
    /// Resolving the returned descriptor yields `self` again.
    pub fn to_explicit_descriptor(&self) -> ComponentDescriptor {
        let language = self.language.as_ref().map(|l| LanguageSpec {
            name: l.name,
            version: Some(l.version.clone()),
            spec: PythonSpec {
                interpreter: Some(l.interpreter.clone()),
            },
        });

        let image = match &self.image {
            ResolvedImage::Standard(c) => ImageSpec::Standard(StandardImage {
                packages: Some(c.packages.clone()),
                user: UserSpec {
                    create: Some(c.user.create),
                    name: Some(c.user.name.clone()),
                    group: Some(c.user.group.clone()),
                    home: Some(c.user.home.clone()),
                    sudo: Some(c.user.sudo),
                },
                workdir: WorkdirSpec {
                    create: Some(c.workdir.create),
                    path: Some(c.workdir.path.clone()),
                },
            }),
            ResolvedImage::Compatible { base, config: c } => ImageSpec::Compatible(CompatibleImage {
                base: base.clone(),
                packages: Some(c.packages.clone()),
                user: CompatibleUser {
                    name: c.user.name.clone(),
                    create: Some(c.user.create),
                    group: Some(c.user.group.clone()),
                    home: Some(c.user.home.clone()),
                    sudo: Some(c.user.sudo),
                },
                workdir: CompatibleWorkdir {
                    path: c.workdir.path.clone(),
                    create: Some(c.workdir.create),
                },
            }),
            ResolvedImage::Traditional => ImageSpec::Traditional,
        };

        ComponentDescriptor {
            name: self.name.clone(),
            meta_version: SCHEMA_VERSION,
            language,
            image,
            dependencies: self.dependencies.clone(),
        }
    }
}
