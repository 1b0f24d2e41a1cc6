//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into service calls and render the results;
//! [`Project`] wires the adapters the services run on.

use std::path::{Path, PathBuf};

use tracing::debug;

use aladdin_adapters::{DockerRunner, ExternalBuilder, LampFile, LocalComponentSource, LockfileDigest};
use aladdin_core::{
    application::{BuildService, ComponentService},
    domain::{BuildMode, ComponentName, ImageNaming},
};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

pub mod build;
pub mod completions;
pub mod config;
pub mod create;
pub mod edit;
pub mod list;
pub mod plan;
pub mod run;
pub mod validate;

/// The project a command works on.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    name: String,
    components_dir: PathBuf,
    mode: BuildMode,
}

impl Project {
    /// Locate the project (`--project-dir` or the current directory) and
    /// read its name.
    pub fn open(global: &GlobalArgs, config: &AppConfig) -> CliResult<Self> {
        let root = match &global.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .with_cli_context(|| "Cannot determine the current directory")?,
        };
        let root = root
            .canonicalize()
            .with_cli_context(|| format!("Project directory '{}' is not accessible", root.display()))?;

        let name = match &config.project.name {
            Some(name) => name.clone(),
            None => LampFile::in_project(&root)?.name,
        };
        let mode = match global.mode {
            Some(mode) => mode,
            None => config.build_mode().map_err(|message| CliError::ConfigError {
                message: format!("build.mode: {message}"),
                source: None,
            })?,
        };
        let components_dir = root.join(&config.project.components_dir);

        debug!(root = %root.display(), project = %name, %mode, "Project opened");
        Ok(Self {
            root,
            name,
            components_dir,
            mode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn components_dir(&self) -> &Path {
        &self.components_dir
    }

    pub fn component_service(&self, config: &AppConfig) -> ComponentService {
        ComponentService::new(
            Box::new(LocalComponentSource::new(&self.components_dir)),
            self.mode,
            ImageNaming::new(&self.name, &config.build.tag),
        )
    }

    pub fn build_service(&self, config: &AppConfig) -> BuildService {
        BuildService::new(
            self.component_service(config),
            Box::new(
                ExternalBuilder::new(&config.build.builder, config.build.builder_args.clone())
                    .with_working_dir(&self.root),
            ),
            Box::new(
                DockerRunner::new(&self.components_dir).with_program(&config.build.runtime),
            ),
            Box::new(LockfileDigest::new(&self.components_dir)),
        )
        .with_editor_tag(&config.build.editor_tag)
    }
}

/// Parse component names given on the command line.
pub fn component_names(raw: &[String]) -> CliResult<Vec<ComponentName>> {
    raw.iter().map(|name| component_name(name)).collect()
}

pub fn component_name(raw: &str) -> CliResult<ComponentName> {
    ComponentName::new(raw).map_err(|e| CliError::Core(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_names_are_validated() {
        let names = component_names(&["api".into(), "shared".into()]).unwrap();
        assert_eq!(names.len(), 2);

        let err = component_names(&["api".into(), "../etc".into()]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
