//! Integration tests for the `components` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PY: &str = "meta: {version: 1}\nlanguage: {name: python}\n";

/// A project directory with `lamp.json` and an empty `components/`.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lamp.json"), r#"{"name": "shop"}"#).unwrap();
        fs::create_dir(dir.path().join("components")).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn component(self, name: &str, descriptor: &str) -> Self {
        let dir = self.path().join("components").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("component.yaml"), descriptor).unwrap();
        self
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("components").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

fn shop() -> Project {
    Project::new()
        .component("shared", PY)
        .component("api", &format!("{PY}dependencies: [shared]\n"))
        .component("worker", &format!("{PY}dependencies: [shared]\n"))
}

// ── general ───────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("components")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("edit"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("components")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    Command::cargo_bin("components")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .code(2);
}

#[test]
fn test_missing_project_file_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("components")
        .unwrap()
        .current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("list")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("lamp.json"));
}

// ── list ──────────────────────────────────────────────────────────────────────

#[test]
fn test_list_shows_components_and_dependencies() {
    shop()
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Components of 'shop'"))
        .stdout(predicate::str::contains("depends on shared"));
}

#[test]
fn test_list_names_only() {
    shop()
        .cmd()
        .args(["list", "--names"])
        .assert()
        .success()
        .stdout("api\nshared\nworker\n");
}

// ── validate ──────────────────────────────────────────────────────────────────

#[test]
fn test_validate_success() {
    shop()
        .cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 component(s) valid"));
}

#[test]
fn test_validate_reports_every_error() {
    Project::new()
        .component("old", "meta: {version: 2}\n")
        .component("nb", &format!("{PY}image:\n  base: jupyter\n  workdir: {{path: /w}}\n"))
        .component("ok", PY)
        .cmd()
        .arg("validate")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("unsupported schema version 2"))
        .stdout(predicate::str::contains("required field missing: image.user.name"))
        .stderr(predicate::str::contains("2 component error(s) found"));
}

#[test]
fn test_validate_unknown_dependency_is_graph_error() {
    Project::new()
        .component("api", &format!("{PY}dependencies: [ghost]\n"))
        .cmd()
        .arg("validate")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("unknown component 'ghost'"));
}

#[test]
fn test_validate_selection_includes_dependencies() {
    Project::new()
        .component("shared", "meta: {version: 2}\n")
        .component("api", &format!("{PY}dependencies: [shared]\n"))
        .component("docs", PY)
        .cmd()
        .args(["validate", "api"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("unsupported schema version 2"));
}

#[test]
fn test_plan_selection_skips_unrelated_components() {
    shop()
        .component("old", "meta: {version: 2}\n")
        .cmd()
        .args(["plan", "api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. shop-shared:local"))
        .stdout(predicate::str::contains("2. shop-api:local"))
        .stdout(predicate::str::contains("worker").not());
}

// ── plan ──────────────────────────────────────────────────────────────────────

#[test]
fn test_plan_orders_dependencies_first() {
    shop()
        .cmd()
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. shop-shared:local"))
        .stdout(predicate::str::contains("2. shop-api:local  (from shop-shared:local)"))
        .stdout(predicate::str::contains("3. shop-worker:local"));
}

#[test]
fn test_plan_json_output() {
    let output = shop()
        .cmd()
        .args(["plan", "api", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let images: Vec<&str> = steps
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["artifact"]["image"].as_str().unwrap())
        .collect();
    assert_eq!(images, ["shop-shared:local", "shop-api:local"]);
    assert_eq!(steps[1]["dependencies"][0]["image"], "shop-shared:local");
}

#[test]
fn test_plan_cycle_exits_with_graph_code() {
    Project::new()
        .component("a", &format!("{PY}dependencies: [b]\n"))
        .component("b", &format!("{PY}dependencies: [c]\n"))
        .component("c", &format!("{PY}dependencies: [a]\n"))
        .cmd()
        .arg("plan")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("cyclic dependency"));
}

#[test]
fn test_plan_unknown_component_is_not_found() {
    shop()
        .cmd()
        .args(["plan", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Component 'ghost' does not exist"));
}

#[test]
fn test_production_mode_flag_is_reported() {
    shop()
        .cmd()
        .args(["plan", "--mode", "production"])
        .assert()
        .success()
        .stdout(predicate::str::contains("production mode"));
}

// ── create ────────────────────────────────────────────────────────────────────

#[test]
fn test_create_without_build_writes_descriptor() {
    let project = shop();
    project
        .cmd()
        .args(["create", "reports", "--depends-on", "shared", "--no-build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created standard component 'reports'"));

    let descriptor =
        fs::read_to_string(project.path().join("components/reports/component.yaml")).unwrap();
    assert!(descriptor.contains("shared"));

    project
        .cmd()
        .args(["plan", "reports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2. shop-reports:local"));
}

#[test]
fn test_create_traditional_writes_dockerfile() {
    let project = Project::new();
    project
        .cmd()
        .args(["create", "legacy", "--type", "traditional", "--base", "busybox", "--no-build"])
        .assert()
        .success();

    let dockerfile = fs::read_to_string(project.path().join("components/legacy/Dockerfile")).unwrap();
    assert!(dockerfile.contains("FROM busybox"));
}

#[test]
fn test_create_existing_component_fails() {
    shop()
        .cmd()
        .args(["create", "api", "--no-build"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_create_with_missing_dependency_fails() {
    Project::new()
        .cmd()
        .args(["create", "api", "--depends-on", "ghost", "--no-build"])
        .assert()
        .code(3);
}

// ── build / run / edit (external programs stubbed with true/false) ────────────

#[cfg(unix)]
#[test]
fn test_build_invokes_builder_per_component() {
    shop()
        .cmd()
        .env("ALADDIN__BUILD__BUILDER", "true")
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built shop-shared:local"))
        .stdout(predicate::str::contains("Built shop-worker:local"));
}

#[cfg(unix)]
#[test]
fn test_failing_builder_exits_with_external_code() {
    shop()
        .cmd()
        .env("ALADDIN__BUILD__BUILDER", "false")
        .args(["build", "api"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Build of 'shared' failed"));
}

#[cfg(unix)]
#[test]
fn test_build_never_starts_with_invalid_descriptor() {
    // `false` would fail the build; validation must stop it first.
    Project::new()
        .component("api", "meta: {version: 2}\n")
        .cmd()
        .env("ALADDIN__BUILD__BUILDER", "false")
        .arg("build")
        .assert()
        .code(2);
}

#[cfg(unix)]
#[test]
fn test_run_uses_container_runtime() {
    shop()
        .cmd()
        .env("ALADDIN__BUILD__RUNTIME", "true")
        .args(["run", "api", "--", "pytest", "-q"])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_edit_without_lock_change_does_not_rebuild() {
    shop()
        .cmd()
        .env("ALADDIN__BUILD__RUNTIME", "true")
        .env("ALADDIN__BUILD__BUILDER", "false")
        .args(["edit", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not rebuilt"));
}

#[cfg(unix)]
#[test]
fn test_edit_requires_editor_image() {
    shop()
        .cmd()
        .env("ALADDIN__BUILD__RUNTIME", "false")
        .args(["edit", "api"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("shop-api:editor"));
}

// ── config / completions ──────────────────────────────────────────────────────

#[test]
fn test_config_get_default_and_env_override() {
    let project = Project::new();
    project
        .cmd()
        .args(["config", "get", "build.tag"])
        .assert()
        .success()
        .stdout("local\n");

    project
        .cmd()
        .env("ALADDIN__BUILD__TAG", "nightly")
        .args(["config", "get", "build.tag"])
        .assert()
        .success()
        .stdout("nightly\n");
}

#[test]
fn test_local_config_file_is_used() {
    let project = shop();
    fs::write(project.path().join("components.toml"), "[build]\ntag = \"ci\"\n").unwrap();
    project
        .cmd()
        .args(["plan", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shop-shared:ci"));
}

#[test]
fn test_project_dir_config_file_is_used() {
    let project = shop();
    fs::write(project.path().join("components.toml"), "[build]\ntag = \"ci\"\n").unwrap();
    let elsewhere = TempDir::new().unwrap();
    project
        .cmd()
        .current_dir(elsewhere.path())
        .arg("-C")
        .arg(project.path())
        .args(["plan", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shop-shared:ci"));
}

#[test]
fn test_config_unknown_key() {
    Project::new()
        .cmd()
        .args(["config", "get", "nope.nothing"])
        .assert()
        .code(4);
}

#[test]
fn test_completions_bash() {
    Command::cargo_bin("components")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("components"));
}
