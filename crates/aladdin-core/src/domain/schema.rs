//! Descriptor schema validation.
//!
//! Turns the raw text of a `component.yaml` into a [`ComponentDescriptor`],
//! or a [`SchemaViolation`] naming the offending field. The schema is closed
//! at every level: a key the schema does not define is an error, never
//! silently ignored.
//!
//! # Document shape
//!
//! ```yaml
//! meta:
//!   version: 1
//! language:
//!   name: python
//!   version: "3.8"
//!   spec:
//!     interpreter: /usr/local/bin/python
//! image:
//!   mode: compatible            # optional: standard | compatible | traditional
//!   base: jupyter/minimal-notebook:latest
//!   packages: [git]
//!   user: {name: jovyan, group: users, home: /home/jovyan, create: false, sudo: false}
//!   workdir: {path: /home/jovyan/work, create: false}
//! dependencies: [shared]
//! ```
//!
//! Without an explicit `image.mode`, the presence of `image.base` selects
//! compatible mode and its absence selects standard mode.

use std::collections::HashSet;

use serde_yaml::{Mapping, Value};

use crate::domain::{
    entities::descriptor::{
        CompatibleImage, CompatibleUser, CompatibleWorkdir, ComponentDescriptor, ImageSpec,
        LanguageSpec, PythonSpec, SCHEMA_VERSION, StandardImage, UserSpec, WorkdirSpec,
    },
    error::{DomainError, SchemaViolation},
    value_objects::{ComponentName, ImageMode, Language},
};

const ROOT_FIELDS: &[&str] = &["meta", "language", "image", "dependencies"];
const META_FIELDS: &[&str] = &["version"];
const LANGUAGE_FIELDS: &[&str] = &["name", "version", "spec"];
const PYTHON_SPEC_FIELDS: &[&str] = &["interpreter"];
const IMAGE_FIELDS: &[&str] = &["mode", "base", "packages", "user", "workdir"];
const USER_FIELDS: &[&str] = &["create", "name", "group", "home", "sudo"];
const WORKDIR_FIELDS: &[&str] = &["create", "path"];

/// Validator for `component.yaml` documents.
pub struct DescriptorSchema;

impl DescriptorSchema {
    /// Validate raw descriptor text for `component`.
    ///
    /// Returns `Ok(None)` for an empty document, which counts as "no
    /// descriptor" just like a missing file.
    pub fn validate(
        component: &ComponentName,
        raw: &str,
    ) -> Result<Option<ComponentDescriptor>, SchemaViolation> {
        let value: Value =
            serde_yaml::from_str(raw).map_err(|e| SchemaViolation::MalformedDescriptor {
                reason: e.to_string(),
            })?;
        Self::validate_value(component, &value)
    }

    /// Like [`validate`](Self::validate), wrapping the violation together
    /// with the component it belongs to.
    pub fn load(
        component: &ComponentName,
        raw: &str,
    ) -> Result<Option<ComponentDescriptor>, DomainError> {
        Self::validate(component, raw).map_err(|violation| DomainError::Schema {
            component: component.clone(),
            violation,
        })
    }

    /// Validate an already-parsed document.
    pub fn validate_value(
        component: &ComponentName,
        value: &Value,
    ) -> Result<Option<ComponentDescriptor>, SchemaViolation> {
        if value.is_null() {
            return Ok(None);
        }
        let root = Object::root(value)?;

        // The version gate comes first: a future schema may legitimately use
        // fields this one does not know.
        let meta_version = check_meta(&root)?;
        root.only(ROOT_FIELDS)?;

        let language = root.object("language")?.map(check_language).transpose()?;
        let image = check_image(root.object("image")?)?;

        if image.mode() != ImageMode::Traditional && language.is_none() {
            return Err(missing("language"));
        }

        let dependencies = check_dependencies(component, &root)?;

        Ok(Some(ComponentDescriptor {
            name: component.clone(),
            meta_version,
            language,
            image,
            dependencies,
        }))
    }

    /// Render a descriptor back into `component.yaml` text.
    ///
    /// Only fields that are set are written, so rendering a freshly created
    /// standard descriptor yields the short form users would write by hand.
    pub fn render(descriptor: &ComponentDescriptor) -> Result<String, SchemaViolation> {
        serde_yaml::to_string(&to_document(descriptor)).map_err(|e| {
            SchemaViolation::MalformedDescriptor {
                reason: e.to_string(),
            }
        })
    }
}

// ── Sections ─────────────────────────────────────────────────────────────────

fn check_meta(root: &Object<'_>) -> Result<u64, SchemaViolation> {
    let Some(meta) = root.get("meta") else {
        return Err(SchemaViolation::UnsupportedSchemaVersion { found: None });
    };
    let meta = Object::at(root.field_path("meta"), meta)?;
    let version = match meta.get("version") {
        None => return Err(SchemaViolation::UnsupportedSchemaVersion { found: None }),
        Some(v) if v.as_u64() == Some(SCHEMA_VERSION) => SCHEMA_VERSION,
        Some(other) => {
            return Err(SchemaViolation::UnsupportedSchemaVersion {
                found: Some(describe(other)),
            });
        }
    };
    meta.only(META_FIELDS)?;
    Ok(version)
}

fn check_language(language: Object<'_>) -> Result<LanguageSpec, SchemaViolation> {
    language.only(LANGUAGE_FIELDS)?;

    let name = language
        .string("name")?
        .ok_or_else(|| missing("language.name"))?;
    let name = name
        .parse::<Language>()
        .map_err(|name| SchemaViolation::UnsupportedLanguage { name })?;

    let version = match language.get("version") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        // Unquoted `3.10` reads as the float 3.1.
        Some(Value::Number(_)) => {
            return Err(invalid(
                language.field_path("version"),
                "a version string (quote it)",
            ));
        }
        Some(_) => return Err(invalid(language.field_path("version"), "a version string")),
    };

    let spec = match language.object("spec")? {
        Some(spec) => {
            spec.only(PYTHON_SPEC_FIELDS)?;
            PythonSpec {
                interpreter: spec.string("interpreter")?,
            }
        }
        None => PythonSpec::default(),
    };

    Ok(LanguageSpec {
        name,
        version,
        spec,
    })
}

fn check_image(image: Option<Object<'_>>) -> Result<ImageSpec, SchemaViolation> {
    let Some(image) = image else {
        return Ok(ImageSpec::Standard(StandardImage::default()));
    };
    image.only(IMAGE_FIELDS)?;

    let explicit = image
        .string("mode")?
        .map(|mode| {
            mode.parse::<ImageMode>()
                .map_err(|mode| ambiguous(format!("unknown image mode '{mode}'")))
        })
        .transpose()?;
    let has_base = image.contains("base");

    match explicit {
        Some(ImageMode::Traditional) => {
            if let Some(key) = ["base", "packages", "user", "workdir"]
                .into_iter()
                .find(|key| image.contains(key))
            {
                return Err(ambiguous(format!(
                    "'image.{key}' has no meaning for traditional images"
                )));
            }
            Ok(ImageSpec::Traditional)
        }
        Some(ImageMode::Standard) if has_base => Err(ambiguous(
            "'image.base' is only valid for compatible images; standard images use the \
             language's default base image"
                .to_string(),
        )),
        Some(ImageMode::Standard) => check_standard(&image).map(ImageSpec::Standard),
        Some(ImageMode::Compatible) => check_compatible(&image).map(ImageSpec::Compatible),
        None if has_base => check_compatible(&image).map(ImageSpec::Compatible),
        None => check_standard(&image).map(ImageSpec::Standard),
    }
}

fn check_standard(image: &Object<'_>) -> Result<StandardImage, SchemaViolation> {
    let user = match image.object("user")? {
        Some(user) => {
            user.only(USER_FIELDS)?;
            UserSpec {
                create: user.boolean("create")?,
                name: user.string("name")?,
                group: user.string("group")?,
                home: user.string("home")?,
                sudo: user.boolean("sudo")?,
            }
        }
        None => UserSpec::default(),
    };

    let workdir = match image.object("workdir")? {
        Some(workdir) => {
            workdir.only(WORKDIR_FIELDS)?;
            WorkdirSpec {
                create: workdir.boolean("create")?,
                path: workdir.string("path")?,
            }
        }
        None => WorkdirSpec::default(),
    };

    Ok(StandardImage {
        packages: image.strings("packages")?,
        user,
        workdir,
    })
}

fn check_compatible(image: &Object<'_>) -> Result<CompatibleImage, SchemaViolation> {
    let base = image.string("base")?.ok_or_else(|| missing("image.base"))?;

    let user = image.object("user")?;
    if let Some(user) = &user {
        user.only(USER_FIELDS)?;
    }
    let user = match user {
        Some(user) => CompatibleUser {
            name: user
                .string("name")?
                .ok_or_else(|| missing("image.user.name"))?,
            create: user.boolean("create")?,
            group: user.string("group")?,
            home: user.string("home")?,
            sudo: user.boolean("sudo")?,
        },
        None => return Err(missing("image.user.name")),
    };

    let workdir = match image.object("workdir")? {
        Some(workdir) => {
            workdir.only(WORKDIR_FIELDS)?;
            CompatibleWorkdir {
                path: workdir
                    .string("path")?
                    .ok_or_else(|| missing("image.workdir.path"))?,
                create: workdir.boolean("create")?,
            }
        }
        None => return Err(missing("image.workdir.path")),
    };

    Ok(CompatibleImage {
        base,
        packages: image.strings("packages")?,
        user,
        workdir,
    })
}

fn check_dependencies(
    component: &ComponentName,
    root: &Object<'_>,
) -> Result<Vec<ComponentName>, SchemaViolation> {
    let Some(entries) = root.strings("dependencies")? else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut dependencies = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let name = ComponentName::new(entry)
            .map_err(|_| invalid(format!("dependencies[{index}]"), "a component name"))?;
        if &name == component {
            return Err(SchemaViolation::SelfDependency);
        }
        if !seen.insert(name.clone()) {
            return Err(SchemaViolation::DuplicateDependency {
                name: name.to_string(),
            });
        }
        dependencies.push(name);
    }
    Ok(dependencies)
}

// ── Rendering ────────────────────────────────────────────────────────────────

fn to_document(descriptor: &ComponentDescriptor) -> Value {
    let mut root = Mapping::new();

    let mut meta = Mapping::new();
    insert(&mut meta, "version", Some(Value::from(descriptor.meta_version)));
    insert(&mut root, "meta", Some(Value::Mapping(meta)));

    if let Some(language) = &descriptor.language {
        let mut lang = Mapping::new();
        insert(&mut lang, "name", Some(Value::from(language.name.as_str())));
        insert(&mut lang, "version", language.version.clone().map(Value::from));
        if let Some(interpreter) = &language.spec.interpreter {
            let mut spec = Mapping::new();
            insert(&mut spec, "interpreter", Some(Value::from(interpreter.as_str())));
            insert(&mut lang, "spec", Some(Value::Mapping(spec)));
        }
        insert(&mut root, "language", Some(Value::Mapping(lang)));
    }

    let image = match &descriptor.image {
        ImageSpec::Standard(image) => {
            let mut map = Mapping::new();
            insert(&mut map, "packages", image.packages.clone().map(Value::from));
            let mut user = Mapping::new();
            insert(&mut user, "create", image.user.create.map(Value::from));
            insert(&mut user, "name", image.user.name.clone().map(Value::from));
            insert(&mut user, "group", image.user.group.clone().map(Value::from));
            insert(&mut user, "home", image.user.home.clone().map(Value::from));
            insert(&mut user, "sudo", image.user.sudo.map(Value::from));
            insert_non_empty(&mut map, "user", user);
            let mut workdir = Mapping::new();
            insert(&mut workdir, "create", image.workdir.create.map(Value::from));
            insert(&mut workdir, "path", image.workdir.path.clone().map(Value::from));
            insert_non_empty(&mut map, "workdir", workdir);
            (!map.is_empty()).then_some(map)
        }
        ImageSpec::Compatible(image) => {
            let mut map = Mapping::new();
            insert(&mut map, "mode", Some(Value::from(ImageMode::Compatible.as_str())));
            insert(&mut map, "base", Some(Value::from(image.base.as_str())));
            insert(&mut map, "packages", image.packages.clone().map(Value::from));
            let mut user = Mapping::new();
            insert(&mut user, "name", Some(Value::from(image.user.name.as_str())));
            insert(&mut user, "create", image.user.create.map(Value::from));
            insert(&mut user, "group", image.user.group.clone().map(Value::from));
            insert(&mut user, "home", image.user.home.clone().map(Value::from));
            insert(&mut user, "sudo", image.user.sudo.map(Value::from));
            insert(&mut map, "user", Some(Value::Mapping(user)));
            let mut workdir = Mapping::new();
            insert(&mut workdir, "path", Some(Value::from(image.workdir.path.as_str())));
            insert(&mut workdir, "create", image.workdir.create.map(Value::from));
            insert(&mut map, "workdir", Some(Value::Mapping(workdir)));
            Some(map)
        }
        ImageSpec::Traditional => {
            let mut map = Mapping::new();
            insert(&mut map, "mode", Some(Value::from(ImageMode::Traditional.as_str())));
            Some(map)
        }
    };
    insert(&mut root, "image", image.map(Value::Mapping));

    let dependencies: Vec<Value> = descriptor
        .dependencies
        .iter()
        .map(|d| Value::from(d.as_str()))
        .collect();
    insert(&mut root, "dependencies", Some(Value::Sequence(dependencies)));

    Value::Mapping(root)
}

fn insert(map: &mut Mapping, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(Value::from(key), value);
    }
}

fn insert_non_empty(map: &mut Mapping, key: &str, section: Mapping) {
    if !section.is_empty() {
        map.insert(Value::from(key), Value::Mapping(section));
    }
}

// ── Closed-object reader ─────────────────────────────────────────────────────

/// A mapping in the document together with its dotted path.
struct Object<'a> {
    path: String,
    map: &'a Mapping,
}

impl<'a> Object<'a> {
    fn root(value: &'a Value) -> Result<Self, SchemaViolation> {
        Self::at(String::new(), value)
    }

    fn at(path: String, value: &'a Value) -> Result<Self, SchemaViolation> {
        match value {
            Value::Mapping(map) => Ok(Self { path, map }),
            _ => {
                let field = if path.is_empty() { "<root>".to_string() } else { path };
                Err(invalid(field, "a mapping"))
            }
        }
    }

    fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// Reject any key outside `allowed`.
    fn only(&self, allowed: &[&str]) -> Result<(), SchemaViolation> {
        for key in self.map.keys() {
            match key.as_str() {
                Some(k) if allowed.contains(&k) => {}
                Some(k) => return Err(unknown(self.field_path(k))),
                None => return Err(unknown(self.field_path(&describe(key)))),
            }
        }
        Ok(())
    }

    /// Explicit `null` counts as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn object(&self, key: &str) -> Result<Option<Object<'a>>, SchemaViolation> {
        self.get(key)
            .map(|v| Object::at(self.field_path(key), v))
            .transpose()
    }

    fn string(&self, key: &str) -> Result<Option<String>, SchemaViolation> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(invalid(self.field_path(key), "a string")),
        }
    }

    fn boolean(&self, key: &str) -> Result<Option<bool>, SchemaViolation> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(invalid(self.field_path(key), "true or false")),
        }
    }

    fn strings(&self, key: &str) -> Result<Option<Vec<String>>, SchemaViolation> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let Value::Sequence(items) = value else {
            return Err(invalid(self.field_path(key), "a list of strings"));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(invalid(format!("{}[{index}]", self.field_path(key)), "a string")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}

fn missing(field: &str) -> SchemaViolation {
    SchemaViolation::MissingRequiredField {
        field: field.to_string(),
    }
}

fn unknown(field: String) -> SchemaViolation {
    SchemaViolation::UnknownField { field }
}

fn invalid(field: String, expected: &'static str) -> SchemaViolation {
    SchemaViolation::InvalidFieldType { field, expected }
}

fn ambiguous(reason: String) -> SchemaViolation {
    SchemaViolation::AmbiguousImageMode { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ComponentName {
        ComponentName::new("api").unwrap()
    }

    fn check(raw: &str) -> Result<ComponentDescriptor, SchemaViolation> {
        DescriptorSchema::validate(&api(), raw).map(|d| d.expect("descriptor present"))
    }

    const MINIMAL: &str = "meta: {version: 1}\nlanguage: {name: python, version: '3.8'}\n";

    // ------------------------------------------------------------------------
    // Version gate
    // ------------------------------------------------------------------------

    #[test]
    fn minimal_standard_descriptor_is_valid() {
        let d = check(MINIMAL).unwrap();
        assert_eq!(d.mode(), ImageMode::Standard);
        assert_eq!(d.meta_version, 1);
        assert_eq!(d.language.unwrap().version.as_deref(), Some("3.8"));
        assert!(d.dependencies.is_empty());
    }

    #[test]
    fn version_two_is_unsupported() {
        let err = check("meta: {version: 2}\nlanguage: {name: python}\n").unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::UnsupportedSchemaVersion {
                found: Some("2".into())
            }
        );
    }

    #[test]
    fn missing_meta_is_unsupported_version() {
        let err = check("language: {name: python}\n").unwrap_err();
        assert_eq!(err, SchemaViolation::UnsupportedSchemaVersion { found: None });
    }

    #[test]
    fn string_version_is_unsupported() {
        let err = check("meta: {version: '1'}\nlanguage: {name: python}\n").unwrap_err();
        assert!(matches!(err, SchemaViolation::UnsupportedSchemaVersion { found: Some(_) }));
    }

    #[test]
    fn version_is_checked_before_unknown_fields() {
        let err = check("meta: {version: 3}\nfuture_field: true\n").unwrap_err();
        assert!(matches!(err, SchemaViolation::UnsupportedSchemaVersion { .. }));
    }

    #[test]
    fn empty_document_is_no_descriptor() {
        assert_eq!(DescriptorSchema::validate(&api(), "").unwrap(), None);
        assert_eq!(DescriptorSchema::validate(&api(), "~\n").unwrap(), None);
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = check("meta: [unclosed\n").unwrap_err();
        assert!(matches!(err, SchemaViolation::MalformedDescriptor { .. }));
    }

    #[test]
    fn non_mapping_root_is_invalid() {
        let err = check("- a\n- b\n").unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::InvalidFieldType {
                field: "<root>".into(),
                expected: "a mapping"
            }
        );
    }

    // ------------------------------------------------------------------------
    // Closed schema
    // ------------------------------------------------------------------------

    #[test]
    fn unknown_top_level_field() {
        let err = check(&format!("{MINIMAL}extra: 1\n")).unwrap_err();
        assert_eq!(err, SchemaViolation::UnknownField { field: "extra".into() });
    }

    #[test]
    fn unknown_nested_field_reports_dotted_path() {
        let raw = format!("{MINIMAL}image:\n  user:\n    shell: /bin/zsh\n");
        let err = check(&raw).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::UnknownField {
                field: "image.user.shell".into()
            }
        );
    }

    #[test]
    fn unknown_meta_field() {
        let err = check("meta: {version: 1, author: me}\nlanguage: {name: python}\n").unwrap_err();
        assert_eq!(err, SchemaViolation::UnknownField { field: "meta.author".into() });
    }

    #[test]
    fn unknown_language_spec_field() {
        let raw = "meta: {version: 1}\nlanguage: {name: python, spec: {venv: /opt}}\n";
        assert_eq!(
            check(raw).unwrap_err(),
            SchemaViolation::UnknownField {
                field: "language.spec.venv".into()
            }
        );
    }

    // ------------------------------------------------------------------------
    // Language
    // ------------------------------------------------------------------------

    #[test]
    fn unsupported_language() {
        let err = check("meta: {version: 1}\nlanguage: {name: ruby}\n").unwrap_err();
        assert_eq!(err, SchemaViolation::UnsupportedLanguage { name: "ruby".into() });
    }

    #[test]
    fn language_required_for_standard() {
        let err = check("meta: {version: 1}\n").unwrap_err();
        assert_eq!(err, SchemaViolation::MissingRequiredField { field: "language".into() });
    }

    #[test]
    fn unquoted_language_version_is_rejected() {
        let err = check("meta: {version: 1}\nlanguage: {name: python, version: 3.10}\n").unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::InvalidFieldType {
                field: "language.version".into(),
                expected: "a version string (quote it)",
            }
        );

        let d = check("meta: {version: 1}\nlanguage: {name: python, version: '3.10'}\n").unwrap();
        assert_eq!(d.language.unwrap().version.as_deref(), Some("3.10"));
    }

    #[test]
    fn interpreter_is_read_from_spec() {
        let raw = "meta: {version: 1}\nlanguage:\n  name: python\n  spec: {interpreter: /opt/conda/bin/python}\n";
        let d = check(raw).unwrap();
        assert_eq!(
            d.language.unwrap().spec.interpreter.as_deref(),
            Some("/opt/conda/bin/python")
        );
    }

    // ------------------------------------------------------------------------
    // Image modes
    // ------------------------------------------------------------------------

    #[test]
    fn base_selects_compatible_mode() {
        let raw = format!(
            "{MINIMAL}image:\n  base: jupyter/minimal-notebook:latest\n  user: {{name: jovyan}}\n  workdir: {{path: /home/jovyan/work}}\n"
        );
        let d = check(&raw).unwrap();
        match d.image {
            ImageSpec::Compatible(image) => {
                assert_eq!(image.base, "jupyter/minimal-notebook:latest");
                assert_eq!(image.user.name, "jovyan");
                assert_eq!(image.workdir.path, "/home/jovyan/work");
            }
            other => panic!("expected compatible, got {other:?}"),
        }
    }

    #[test]
    fn compatible_requires_base() {
        let raw = format!(
            "{MINIMAL}image:\n  mode: compatible\n  user: {{name: jovyan}}\n  workdir: {{path: /work}}\n"
        );
        assert_eq!(
            check(&raw).unwrap_err(),
            SchemaViolation::MissingRequiredField { field: "image.base".into() }
        );
    }

    #[test]
    fn compatible_requires_user_name() {
        let raw = format!(
            "{MINIMAL}image:\n  base: img\n  user: {{group: users}}\n  workdir: {{path: /work}}\n"
        );
        assert_eq!(
            check(&raw).unwrap_err(),
            SchemaViolation::MissingRequiredField { field: "image.user.name".into() }
        );

        let no_user = format!("{MINIMAL}image:\n  base: img\n  workdir: {{path: /work}}\n");
        assert_eq!(
            check(&no_user).unwrap_err(),
            SchemaViolation::MissingRequiredField { field: "image.user.name".into() }
        );
    }

    #[test]
    fn compatible_requires_workdir_path() {
        let raw = format!(
            "{MINIMAL}image:\n  base: img\n  user: {{name: jovyan}}\n  workdir: {{create: true}}\n"
        );
        assert_eq!(
            check(&raw).unwrap_err(),
            SchemaViolation::MissingRequiredField { field: "image.workdir.path".into() }
        );
    }

    #[test]
    fn standard_mode_with_base_is_ambiguous() {
        let raw = format!("{MINIMAL}image:\n  mode: standard\n  base: img\n");
        assert!(matches!(
            check(&raw).unwrap_err(),
            SchemaViolation::AmbiguousImageMode { .. }
        ));
    }

    #[test]
    fn traditional_mode_with_conventions_is_ambiguous() {
        let raw = "meta: {version: 1}\nimage:\n  mode: traditional\n  workdir: {path: /code}\n";
        let err = check(raw).unwrap_err();
        match err {
            SchemaViolation::AmbiguousImageMode { reason } => assert!(reason.contains("workdir")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_mode_is_ambiguous() {
        let raw = format!("{MINIMAL}image: {{mode: hybrid}}\n");
        assert!(matches!(
            check(&raw).unwrap_err(),
            SchemaViolation::AmbiguousImageMode { .. }
        ));
    }

    #[test]
    fn traditional_needs_no_language() {
        let d = check("meta: {version: 1}\nimage: {mode: traditional}\ndependencies: [shared]\n")
            .unwrap();
        assert_eq!(d.mode(), ImageMode::Traditional);
        assert_eq!(d.dependencies.len(), 1);
    }

    #[test]
    fn wrong_types_are_reported_with_expected_shape() {
        let raw = format!("{MINIMAL}image:\n  user: {{create: 'yes'}}\n");
        assert_eq!(
            check(&raw).unwrap_err(),
            SchemaViolation::InvalidFieldType {
                field: "image.user.create".into(),
                expected: "true or false"
            }
        );

        let raw = format!("{MINIMAL}image:\n  packages: [git, 3]\n");
        assert_eq!(
            check(&raw).unwrap_err(),
            SchemaViolation::InvalidFieldType {
                field: "image.packages[1]".into(),
                expected: "a string"
            }
        );
    }

    #[test]
    fn null_fields_count_as_absent() {
        let raw = format!("{MINIMAL}image:\n  user: {{name: null, group: null}}\n");
        let d = check(&raw).unwrap();
        match d.image {
            ImageSpec::Standard(image) => assert_eq!(image.user, UserSpec::default()),
            other => panic!("unexpected {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Dependencies
    // ------------------------------------------------------------------------

    #[test]
    fn dependencies_keep_declaration_order() {
        let d = check(&format!("{MINIMAL}dependencies: [shared, models]\n")).unwrap();
        let names: Vec<&str> = d.dependencies.iter().map(ComponentName::as_str).collect();
        assert_eq!(names, ["shared", "models"]);
    }

    #[test]
    fn duplicate_dependency() {
        let err = check(&format!("{MINIMAL}dependencies: [shared, shared]\n")).unwrap_err();
        assert_eq!(err, SchemaViolation::DuplicateDependency { name: "shared".into() });
    }

    #[test]
    fn self_dependency() {
        let err = check(&format!("{MINIMAL}dependencies: [api]\n")).unwrap_err();
        assert_eq!(err, SchemaViolation::SelfDependency);
    }

    #[test]
    fn dependency_must_be_component_name() {
        let err = check(&format!("{MINIMAL}dependencies: ['../etc']\n")).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::InvalidFieldType {
                field: "dependencies[0]".into(),
                expected: "a component name"
            }
        );
    }

    // ------------------------------------------------------------------------
    // Wrapping and rendering
    // ------------------------------------------------------------------------

    #[test]
    fn load_wraps_violation_with_component() {
        let err = DescriptorSchema::load(&api(), "meta: {version: 2}\n").unwrap_err();
        assert!(matches!(err, DomainError::Schema { ref component, .. } if component == &api()));
    }

    #[test]
    fn rendered_descriptor_validates_to_itself() {
        let raw = "meta: {version: 1}\nlanguage: {name: python, version: '3.9'}\nimage:\n  base: img:1\n  packages: [git]\n  user: {name: app, home: /srv/app}\n  workdir: {path: /srv/app/code}\ndependencies: [shared]\n";
        let original = check(raw).unwrap();
        let rendered = DescriptorSchema::render(&original).unwrap();
        assert_eq!(check(&rendered).unwrap(), original);
    }

    #[test]
    fn rendered_minimal_standard_stays_short() {
        let d = check(MINIMAL).unwrap();
        let rendered = DescriptorSchema::render(&d).unwrap();
        assert!(!rendered.contains("image"));
        assert!(rendered.contains("python"));
    }
}
