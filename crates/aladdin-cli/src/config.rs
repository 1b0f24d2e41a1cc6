//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `ALADDIN__<SECTION>__<KEY>`
//! 3. Config file: `--config`, else `./components.toml`, else the user config
//!    file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use aladdin_core::{
    application::services::EDITOR_TAG,
    domain::{BuildMode, DEFAULT_TAG},
};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "components.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ALADDIN";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub project: ProjectConfig,
    pub build: BuildConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory holding one sub-directory per component, relative to the
    /// project root.
    pub components_dir: PathBuf,
    /// Overrides the name read from `lamp.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// `development` or `production`.
    pub mode: String,
    /// Tag of the images `build` produces.
    pub tag: String,
    /// Tag of the images `run` and `edit` use.
    pub editor_tag: String,
    /// Program invoked once per build step.
    pub builder: String,
    pub builder_args: Vec<String>,
    /// Docker-compatible container CLI.
    pub runtime: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                components_dir: PathBuf::from("components"),
                name: None,
            },
            build: BuildConfig {
                mode: BuildMode::default().to_string(),
                tag: DEFAULT_TAG.into(),
                editor_tag: EDITOR_TAG.into(),
                builder: "aladdin".into(),
                builder_args: vec!["build".into()],
                runtime: "docker".into(),
            },
            output: OutputConfig { no_color: false },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// `config_file` is the path passed via `--config`; it must exist. The
    /// fallback locations are optional and the local one is looked up in
    /// `project_dir`.
    pub fn load(config_file: Option<&PathBuf>, project_dir: Option<&Path>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let file = match config_file {
            Some(path) => File::from(path.as_path()).format(FileFormat::Toml).required(true),
            None => File::from(Self::config_path(project_dir).as_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("build.builder_args")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path of the configuration file consulted when `--config` is absent.
    ///
    /// `components.toml` in the project directory (the current one when
    /// `None`) if it exists, otherwise the per-user file from
    /// `directories::ProjectDirs`.
    pub fn config_path(project_dir: Option<&Path>) -> PathBuf {
        let local = project_dir.unwrap_or(Path::new(".")).join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return local;
        }
        directories::ProjectDirs::from("io", "aladdin", "components")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The configured build mode.
    pub fn build_mode(&self) -> Result<BuildMode, String> {
        self.build.mode.parse()
    }
}
