//! External image builder.
//!
//! Each build step is handed to a separate program (by default
//! `aladdin build <component>`). The resolved configuration travels in the
//! environment so the builder needs no access to `component.yaml`.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, instrument};

use aladdin_core::{
    application::{ApplicationError, ports::ImageBuilder},
    domain::BuildStep,
    error::{AladdinResult, Context},
};

/// Name of the component being built.
pub const ENV_COMPONENT_NAME: &str = "COMPONENT_NAME";
/// Resolved component configuration, as JSON.
pub const ENV_COMPONENT_CONFIG: &str = "COMPONENT_CONFIG";
/// Comma-separated image references of the direct dependencies, in plan order.
pub const ENV_COMPONENT_DEPENDENCIES: &str = "COMPONENT_DEPENDENCIES";

/// Runs an external program once per build step.
#[derive(Debug, Clone)]
pub struct ExternalBuilder {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ExternalBuilder {
    /// `program args... <component>` for every step.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    /// Run the builder from the project root.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The command for `step`, ready to run.
    pub fn command(&self, step: &BuildStep) -> AladdinResult<Command> {
        let config = serde_json::to_string(&step.config).context("serialize component config")?;
        let dependencies = step
            .dependencies
            .iter()
            .map(|d| d.image.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(step.component().as_str())
            .env(ENV_COMPONENT_NAME, step.component().as_str())
            .env(ENV_COMPONENT_CONFIG, config)
            .env(ENV_COMPONENT_DEPENDENCIES, dependencies);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }
}

impl Default for ExternalBuilder {
    fn default() -> Self {
        Self::new("aladdin", vec!["build".to_string()])
    }
}

impl ImageBuilder for ExternalBuilder {
    #[instrument(skip_all, fields(component = %step.component()))]
    fn build(&self, step: &BuildStep) -> AladdinResult<()> {
        let mut cmd = self.command(step)?;
        debug!(program = %self.program, args = ?self.args, "Invoking builder");

        let status = cmd.status().map_err(|e| ApplicationError::BuildFailed {
            component: step.component().clone(),
            status: format!("failed to start '{}': {}", self.program, e),
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::BuildFailed {
                component: step.component().clone(),
                status: status.to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aladdin_core::domain::{
        ComponentName, ImageNaming, ResolvedComponentConfig, ResolvedImage,
    };
    use std::ffi::OsStr;

    fn step() -> BuildStep {
        let naming = ImageNaming::new("shop", "local");
        let api = ComponentName::new("api").unwrap();
        let shared = ComponentName::new("shared").unwrap();
        BuildStep {
            config: ResolvedComponentConfig {
                name: api.clone(),
                language: None,
                image: ResolvedImage::Traditional,
                dependencies: vec![shared.clone()],
            },
            artifact: naming.artifact(&api),
            dependencies: vec![naming.artifact(&shared)],
        }
    }

    #[test]
    fn command_passes_component_and_environment() {
        let cmd = ExternalBuilder::default().command(&step()).unwrap();
        assert_eq!(cmd.get_program(), "aladdin");
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, ["build", "api"]);

        let env: Vec<(&OsStr, Option<&OsStr>)> = cmd.get_envs().collect();
        let lookup = |key: &str| {
            env.iter()
                .find(|(k, _)| *k == key)
                .and_then(|(_, v)| *v)
                .and_then(OsStr::to_str)
                .map(str::to_string)
        };
        assert_eq!(lookup(ENV_COMPONENT_NAME).as_deref(), Some("api"));
        assert_eq!(
            lookup(ENV_COMPONENT_DEPENDENCIES).as_deref(),
            Some("shop-shared:local")
        );
        let config: serde_json::Value =
            serde_json::from_str(&lookup(ENV_COMPONENT_CONFIG).unwrap()).unwrap();
        assert_eq!(config["image"]["mode"], "traditional");
    }

    #[cfg(unix)]
    #[test]
    fn successful_builder_exit_is_ok() {
        let builder = ExternalBuilder::new(
            "sh",
            vec!["-c".into(), "test \"$COMPONENT_NAME\" = \"$1\"".into(), "sh".into()],
        );
        builder.build(&step()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn failing_builder_status_is_reported_verbatim() {
        let builder = ExternalBuilder::new("sh", vec!["-c".into(), "exit 3".into(), "sh".into()]);
        let err = builder.build(&step()).unwrap_err();
        assert_eq!(err.to_string(), "Build of 'api' failed: exit status: 3");
    }

    #[test]
    fn missing_builder_program_is_a_build_failure() {
        let builder = ExternalBuilder::new("definitely-not-an-installed-builder", Vec::new());
        let err = builder.build(&step()).unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }
}
