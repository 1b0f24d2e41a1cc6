//! Domain value objects: ComponentName, Language, ImageMode, BuildMode.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! `ComponentName` is the only one that carries an invariant; the enums
//! define their string representations and `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ComponentName ────────────────────────────────────────────────────────────

/// The name of a component: the name of its directory under `components/`.
///
/// Invariant: non-empty, a single path segment, never hidden (leading `.`),
/// and made of ASCII alphanumerics, `-`, `_` and `.`. Ordering is plain
/// lexicographic byte order, which is what build-plan tie-breaking relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName(String);

impl ComponentName {
    /// Validate and wrap a component name.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if let Some(reason) = Self::check(&name) {
            return Err(DomainError::InvalidComponentName { name, reason });
        }
        Ok(Self(name))
    }

    fn check(name: &str) -> Option<String> {
        if name.is_empty() {
            return Some("name cannot be empty".into());
        }
        if name.starts_with('.') {
            return Some("name cannot start with '.'".into());
        }
        if name.contains('/') || name.contains('\\') {
            return Some("name must be a file name, not a path".into());
        }
        name.chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
            .map(|c| format!("character '{c}' is not allowed"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ComponentName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ComponentName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComponentName> for String {
    fn from(name: ComponentName) -> Self {
        name.0
    }
}

impl AsRef<str> for ComponentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Language ─────────────────────────────────────────────────────────────────

/// A supported component language.
///
/// Python is the only language the default base images provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: &'static [Language] = &[Language::Python];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
        }
    }

    /// Version used when a descriptor leaves `language.version` out.
    pub const fn default_version(&self) -> &'static str {
        match self {
            Self::Python => "3.8",
        }
    }

    /// Interpreter used when `language.spec.interpreter` is left out.
    pub const fn default_interpreter(&self) -> &'static str {
        match self {
            Self::Python => "python",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Parses the exact schema spelling. The error carries the rejected name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Self::Python),
            other => Err(other.to_string()),
        }
    }
}

// ── ImageMode ────────────────────────────────────────────────────────────────

/// How a component image is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Built from the language's default base image with all conventions applied.
    Standard,
    /// Built on a caller-specified base image; conventions only where requested.
    Compatible,
    /// Built entirely from the component's own Dockerfile.
    Traditional,
}

impl ImageMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Compatible => "compatible",
            Self::Traditional => "traditional",
        }
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "compatible" => Ok(Self::Compatible),
            "traditional" => Ok(Self::Traditional),
            other => Err(other.to_string()),
        }
    }
}

// ── BuildMode ────────────────────────────────────────────────────────────────

/// Whether images are built for local development or for release.
///
/// Decided outside the resolver (configuration or a CLI flag); the resolver
/// only reads it to pick the `user.sudo` default for standard images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" | "release" => Ok(Self::Production),
            other => Err(format!(
                "unknown build mode '{other}' (expected development or production)"
            )),
        }
    }
}
