//! Implementation of the `components run` command.

use crate::{
    cli::{GlobalArgs, RunArgs},
    commands::{Project, component_name},
    config::AppConfig,
    error::CliResult,
};

/// Run a command (a shell by default) in the component's editor container.
pub fn execute(args: RunArgs, global: GlobalArgs, config: AppConfig) -> CliResult<()> {
    let component = component_name(&args.component)?;
    let project = Project::open(&global, &config)?;
    project
        .build_service(&config)
        .run(&component, &args.command)?;
    Ok(())
}
