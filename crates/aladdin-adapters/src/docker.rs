//! Docker CLI container runner.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use aladdin_core::{
    application::{
        ApplicationError,
        ports::{ContainerRunner, RunRequest},
    },
    error::AladdinResult,
};

/// Container runner backed by the `docker` command line.
#[derive(Debug, Clone)]
pub struct DockerRunner {
    program: String,
    /// Host path of the project's `components/` directory.
    components_dir: PathBuf,
}

impl DockerRunner {
    pub fn new(components_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: "docker".to_string(),
            components_dir: components_dir.into(),
        }
    }

    /// Use a docker-compatible CLI other than `docker` (e.g. `podman`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments of the `docker run` invocation for `request`.
    pub fn run_args(&self, request: &RunRequest) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "-it".to_string(),
            "-v".to_string(),
            format!("{}:{}", host_path(&self.components_dir), request.mount),
        ];
        if let Some(dir) = &request.working_dir {
            args.push("-w".to_string());
            args.push(dir.clone());
        }
        args.push(request.image.clone());
        args.extend(request.command.iter().cloned());
        args
    }

    fn quiet(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).stdin(Stdio::null()).stderr(Stdio::null());
        cmd
    }

    fn failed(&self, image: &str, status: String) -> ApplicationError {
        ApplicationError::RunFailed {
            image: image.to_string(),
            status,
        }
    }
}

/// Mount source as the docker daemon sees it; Cygwin paths lose their
/// `/cygdrive` prefix.
fn host_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    text.strip_prefix("/cygdrive").unwrap_or(&text).to_string()
}

impl ContainerRunner for DockerRunner {
    #[instrument(skip_all, fields(image = %request.image))]
    fn run(&self, request: &RunRequest) -> AladdinResult<()> {
        let args = self.run_args(request);
        debug!(command = %format!("{} {}", self.program, args.join(" ")), "Running docker container");

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| self.failed(&request.image, format!("failed to start '{}': {}", self.program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(self.failed(&request.image, status.to_string()).into())
        }
    }

    fn image_exists(&self, image: &str) -> AladdinResult<bool> {
        let status = self
            .quiet(&["inspect", image])
            .stdout(Stdio::null())
            .status()
            .map_err(|e| self.failed(image, format!("failed to start '{}': {}", self.program, e)))?;
        Ok(status.success())
    }

    fn remove_image(&self, image: &str) -> AladdinResult<()> {
        let status = self
            .quiet(&["rmi", "-f", image])
            .stdout(Stdio::null())
            .status()
            .map_err(|e| self.failed(image, format!("failed to start '{}': {}", self.program, e)))?;
        if !status.success() {
            debug!(image, %status, "Image was not removed");
        }
        Ok(())
    }

    fn image_workdir(&self, image: &str) -> AladdinResult<String> {
        let output = self
            .quiet(&["run", "--rm", image, "pwd"])
            .output()
            .map_err(|e| self.failed(image, format!("failed to start '{}': {}", self.program, e)))?;
        if !output.status.success() {
            return Err(self.failed(image, output.status.to_string()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(working_dir: Option<&str>) -> RunRequest {
        RunRequest {
            image: "shop-api:editor".into(),
            mount: "/code".into(),
            working_dir: working_dir.map(str::to_string),
            command: vec!["pytest".into(), "-q".into()],
        }
    }

    #[test]
    fn run_mounts_components_and_appends_command() {
        let runner = DockerRunner::new("/home/dev/shop/components");
        assert_eq!(
            runner.run_args(&request(None)),
            [
                "run",
                "--rm",
                "-it",
                "-v",
                "/home/dev/shop/components:/code",
                "shop-api:editor",
                "pytest",
                "-q"
            ]
        );
    }

    #[test]
    fn working_dir_is_set_before_image() {
        let runner = DockerRunner::new("/p/components");
        let args = runner.run_args(&request(Some("/code/api")));
        let w = args.iter().position(|a| a == "-w").unwrap();
        assert_eq!(args[w + 1], "/code/api");
        assert!(w < args.iter().position(|a| a == "shop-api:editor").unwrap());
    }

    #[test]
    fn cygwin_prefix_is_stripped() {
        let runner = DockerRunner::new("/cygdrive/c/shop/components");
        assert!(runner.run_args(&request(None)).contains(&"/c/shop/components:/code".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn inspect_exit_status_decides_existence() {
        let present = DockerRunner::new("/p").with_program("true");
        let absent = DockerRunner::new("/p").with_program("false");
        assert!(present.image_exists("img").unwrap());
        assert!(!absent.image_exists("img").unwrap());
    }

    #[test]
    fn missing_runtime_is_a_run_failure() {
        let runner = DockerRunner::new("/p").with_program("definitely-not-docker");
        let err = runner.image_exists("img").unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }
}
