// ============================================================================
// domain/error.rs - DESCRIPTOR AND GRAPH ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::ComponentName;

/// A descriptor that does not conform to the component schema.
///
/// Every variant names the offending field (as a dotted path such as
/// `image.user.name`) or value, so a failure can be fixed without reading
/// any generated artifact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("unsupported schema version {}: meta.version must be 1", .found.as_deref().unwrap_or("(missing)"))]
    UnsupportedSchemaVersion { found: Option<String> },

    #[error("unsupported language '{name}'")]
    UnsupportedLanguage { name: String },

    #[error("ambiguous image mode: {reason}")]
    AmbiguousImageMode { reason: String },

    #[error("required field missing: {field}")]
    MissingRequiredField { field: String },

    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("dependency '{name}' is listed more than once")]
    DuplicateDependency { name: String },

    #[error("a component cannot depend on itself")]
    SelfDependency,

    #[error("field '{field}' must be {expected}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },

    #[error("descriptor is not valid YAML: {reason}")]
    MalformedDescriptor { reason: String },
}

/// Failures that need knowledge of every component at once.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("cyclic dependency: {}", render_cycle(.cycle))]
    CyclicDependency { cycle: Vec<ComponentName> },

    #[error("component '{component}' depends on unknown component '{dependency}'")]
    UnknownComponent {
        component: ComponentName,
        dependency: String,
    },
}

fn render_cycle(cycle: &[ComponentName]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(ComponentName::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

/// Root domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Per-component validation
    // ========================================================================
    #[error("invalid component.yaml for '{component}': {violation}")]
    Schema {
        component: ComponentName,
        #[source]
        violation: SchemaViolation,
    },

    #[error("invalid component name '{name}': {reason}")]
    InvalidComponentName { name: String, reason: String },

    #[error("component '{component}' must provide either component.yaml or Dockerfile")]
    MissingDescriptor { component: ComponentName },

    #[error("component '{component}' uses traditional mode but has no Dockerfile")]
    MissingDockerfile { component: ComponentName },

    // ========================================================================
    // Cross-component
    // ========================================================================
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Schema { component, violation } => {
                let mut hints = vec![format!(
                    "Edit components/{component}/component.yaml"
                )];
                hints.extend(match violation {
                    SchemaViolation::UnsupportedSchemaVersion { .. } => {
                        vec!["Set 'meta: {version: 1}'".to_string()]
                    }
                    SchemaViolation::UnsupportedLanguage { .. } => {
                        vec!["Supported languages: python".to_string()]
                    }
                    SchemaViolation::AmbiguousImageMode { .. } => vec![
                        "Standard images take no 'base'; compatible images require one".into(),
                        "Traditional images only accept 'mode: traditional'".into(),
                    ],
                    SchemaViolation::MissingRequiredField { field } => {
                        vec![format!("Add the '{field}' field")]
                    }
                    SchemaViolation::UnknownField { field } => {
                        vec![format!("Remove '{field}'; the schema allows no extra fields")]
                    }
                    SchemaViolation::DuplicateDependency { name } => {
                        vec![format!("List '{name}' only once under 'dependencies'")]
                    }
                    SchemaViolation::SelfDependency => {
                        vec![format!("Remove '{component}' from its own dependencies")]
                    }
                    _ => Vec::new(),
                });
                hints
            }
            Self::InvalidComponentName { .. } => vec![
                "Use letters, digits, '-', '_' and '.'".into(),
                "Component names cannot start with '.'".into(),
            ],
            Self::MissingDescriptor { component } => vec![
                format!("Add components/{component}/component.yaml"),
                format!("Or provide components/{component}/Dockerfile"),
            ],
            Self::MissingDockerfile { component } => {
                vec![format!("Add components/{component}/Dockerfile")]
            }
            Self::Graph(GraphError::CyclicDependency { .. }) => vec![
                "Break the cycle by removing one of the listed dependencies".into(),
            ],
            Self::Graph(GraphError::UnknownComponent { dependency, .. }) => vec![
                format!("Create the '{dependency}' component or fix the spelling"),
                "Try: components list".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Schema { .. }
            | Self::InvalidComponentName { .. }
            | Self::MissingDescriptor { .. }
            | Self::MissingDockerfile { .. } => ErrorCategory::Validation,
            Self::Graph(_) => ErrorCategory::Graph,
        }
    }

    /// The component the error is about, when there is exactly one.
    pub fn component(&self) -> Option<&ComponentName> {
        match self {
            Self::Schema { component, .. }
            | Self::MissingDescriptor { component }
            | Self::MissingDockerfile { component }
            | Self::Graph(GraphError::UnknownComponent { component, .. }) => Some(component),
            Self::InvalidComponentName { .. } | Self::Graph(GraphError::CyclicDependency { .. }) => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Graph,
}
