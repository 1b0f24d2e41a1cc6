//! Implementation of the `components build` command.

use tracing::{info, instrument};

use crate::{
    cli::{GlobalArgs, SelectionArgs},
    commands::{Project, component_names},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Build the selection and its dependencies, in plan order.
#[instrument(skip_all, fields(selected = args.components.len()))]
pub fn execute(
    args: SelectionArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let selection = component_names(&args.components)?;
    let project = Project::open(&global, &config)?;
    let service = project.build_service(&config);

    if !output.is_json() {
        output.header(&format!(
            "Building '{}' images ({} mode)...",
            project.name(),
            project.mode()
        ))?;
    }
    let built = service.build(&selection)?;
    info!(images = built.len(), "Build finished");

    if output.is_json() {
        output.json(&built)?;
        return Ok(());
    }
    for artifact in &built {
        output.success(&format!("Built {artifact}"))?;
    }
    Ok(())
}
