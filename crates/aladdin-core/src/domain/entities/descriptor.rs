//! The validated `component.yaml` contents.
//!
//! A [`ComponentDescriptor`] only exists once a document has passed
//! [`DescriptorSchema`](crate::domain::schema::DescriptorSchema). Fields the
//! author left out stay `None`; filling them in is the resolver's job.
//!
//! The image section is a sum type. Compatible images carry their mandatory
//! fields as plain values, so "compatible without a base image" cannot be
//! represented once validation succeeded.

use crate::domain::value_objects::{ComponentName, ImageMode, Language};

/// The only descriptor schema version understood by this crate.
pub const SCHEMA_VERSION: u64 = 1;

/// A component's validated descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub name: ComponentName,
    pub meta_version: u64,
    pub language: Option<LanguageSpec>,
    pub image: ImageSpec,
    /// Declaration order, no duplicates.
    pub dependencies: Vec<ComponentName>,
}

impl ComponentDescriptor {
    /// Descriptor used for a component that ships only a Dockerfile.
    pub fn traditional(name: ComponentName) -> Self {
        Self {
            name,
            meta_version: SCHEMA_VERSION,
            language: None,
            image: ImageSpec::Traditional,
            dependencies: Vec::new(),
        }
    }

    pub const fn mode(&self) -> ImageMode {
        self.image.mode()
    }
}

/// `language:` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSpec {
    pub name: Language,
    pub version: Option<String>,
    pub spec: PythonSpec,
}

impl LanguageSpec {
    pub fn new(name: Language) -> Self {
        Self {
            name,
            version: None,
            spec: PythonSpec::default(),
        }
    }
}

/// `language.spec:` for Python components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PythonSpec {
    /// Interpreter the image's Python packages are installed for.
    pub interpreter: Option<String>,
}

/// `image:` section, discriminated by mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSpec {
    Standard(StandardImage),
    Compatible(CompatibleImage),
    Traditional,
}

impl ImageSpec {
    pub const fn mode(&self) -> ImageMode {
        match self {
            Self::Standard(_) => ImageMode::Standard,
            Self::Compatible(_) => ImageMode::Compatible,
            Self::Traditional => ImageMode::Traditional,
        }
    }
}

/// Image built from the language's default base image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardImage {
    pub packages: Option<Vec<String>>,
    pub user: UserSpec,
    pub workdir: WorkdirSpec,
}

/// Image built on a foreign base image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibleImage {
    pub base: String,
    pub packages: Option<Vec<String>>,
    pub user: CompatibleUser,
    pub workdir: CompatibleWorkdir,
}

/// `image.user` for standard images; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSpec {
    pub create: Option<bool>,
    pub name: Option<String>,
    pub group: Option<String>,
    pub home: Option<String>,
    pub sudo: Option<bool>,
}

/// `image.user` for compatible images; the name is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibleUser {
    pub name: String,
    pub create: Option<bool>,
    pub group: Option<String>,
    pub home: Option<String>,
    pub sudo: Option<bool>,
}

/// `image.workdir` for standard images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkdirSpec {
    pub create: Option<bool>,
    pub path: Option<String>,
}

/// `image.workdir` for compatible images; the path is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibleWorkdir {
    pub path: String,
    pub create: Option<bool>,
}
