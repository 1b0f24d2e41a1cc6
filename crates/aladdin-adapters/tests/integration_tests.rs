//! End-to-end tests of the core services over the component source adapters.

use std::fs;
use std::path::Path;

use aladdin_adapters::{LampFile, LocalComponentSource, LockfileDigest, MemoryComponentSource};
use aladdin_core::{
    application::{ComponentService, NewComponent, PackageResolver},
    domain::{BuildMode, ComponentName, ImageMode, ImageNaming},
    error::AladdinError,
};
use tempfile::TempDir;

const PY: &str = "meta: {version: 1}\nlanguage: {name: python}\n";

fn name(s: &str) -> ComponentName {
    ComponentName::new(s).unwrap()
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("lamp.json"), r#"{"name": "shop"}"#).unwrap();
    fs::create_dir(temp.path().join("components")).unwrap();
    temp
}

fn component(root: &Path, component: &str, files: &[(&str, &str)]) {
    let dir = root.join("components").join(component);
    fs::create_dir_all(&dir).unwrap();
    for (file, contents) in files {
        fs::write(dir.join(file), contents).unwrap();
    }
}

fn service(root: &Path) -> ComponentService {
    let lamp = LampFile::in_project(root).unwrap();
    ComponentService::new(
        Box::new(LocalComponentSource::new(root.join("components"))),
        BuildMode::Development,
        ImageNaming::new(lamp.name, "local"),
    )
}

#[test]
fn test_plan_over_directory_tree() {
    let temp = project();
    component(temp.path(), "shared", &[("component.yaml", PY)]);
    component(
        temp.path(),
        "api",
        &[("component.yaml", &format!("{PY}dependencies: [shared]\n"))],
    );
    component(temp.path(), "legacy", &[("Dockerfile", "FROM busybox\n")]);

    let steps = service(temp.path()).plan(&[]).unwrap();
    let images: Vec<&str> = steps.iter().map(|s| s.artifact.image.as_str()).collect();
    assert_eq!(images, ["shop-legacy:local", "shop-shared:local", "shop-api:local"]);
}

#[test]
fn test_validate_reports_every_broken_component() {
    let temp = project();
    component(temp.path(), "empty", &[]);
    component(temp.path(), "v2", &[("component.yaml", "meta: {version: 2}\n")]);
    component(temp.path(), "ok", &[("component.yaml", PY)]);

    let report = service(temp.path()).validate(&[]).unwrap();
    assert!(!report.is_valid());
    assert!(!report.graph_checked);
    assert_eq!(report.errors.len(), 2);
}

#[test]
fn test_created_component_is_written_and_planned() {
    let temp = project();
    component(temp.path(), "shared", &[("component.yaml", PY)]);
    let svc = service(temp.path());

    let mut new = NewComponent::new(name("api"), ImageMode::Standard);
    new.dependencies = vec![name("shared")];
    svc.create(&new).unwrap();

    let written = fs::read_to_string(temp.path().join("components/api/component.yaml")).unwrap();
    assert!(written.contains("shared"));

    let steps = svc.plan(&[name("api")]).unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].dependencies[0].image, "shop-shared:local");
}

#[test]
fn test_create_refuses_existing_directory() {
    let temp = project();
    component(temp.path(), "api", &[("component.yaml", PY)]);

    let err = service(temp.path())
        .create(&NewComponent::new(name("api"), ImageMode::Standard))
        .unwrap_err();
    assert!(matches!(err, AladdinError::Application(_)));
}

#[test]
fn test_lock_digest_reads_component_directory() {
    let temp = project();
    component(temp.path(), "api", &[("poetry.lock", "[[package]]\n")]);
    let resolver = LockfileDigest::new(temp.path().join("components"));
    assert!(resolver.lock_digest(&name("api")).unwrap().is_some());
    assert!(resolver.lock_digest(&name("worker")).unwrap().is_none());
}

#[test]
fn test_memory_source_backs_the_same_workflow() {
    let source = MemoryComponentSource::new()
        .with_descriptor("shared", PY)
        .unwrap()
        .with_dockerfile("legacy")
        .unwrap();
    let svc = ComponentService::new(
        Box::new(source.clone()),
        BuildMode::Production,
        ImageNaming::new("shop", "local"),
    );

    let mut new = NewComponent::new(name("api"), ImageMode::Standard);
    new.dependencies = vec![name("shared"), name("legacy")];
    svc.create(&new).unwrap();
    assert!(source.read_file(&name("api"), "component.yaml").is_some());

    let steps = svc.plan(&[]).unwrap();
    let order: Vec<&str> = steps.iter().map(|s| s.component().as_str()).collect();
    assert_eq!(order, ["legacy", "shared", "api"]);
    assert_eq!(
        steps[2].dependencies.iter().map(|d| d.image.as_str()).collect::<Vec<_>>(),
        ["shop-legacy:local", "shop-shared:local"]
    );
}
