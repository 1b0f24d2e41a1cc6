//! Implementation of the `components plan` command.

use aladdin_core::domain::ArtifactRef;

use crate::{
    cli::{GlobalArgs, SelectionArgs},
    commands::{Project, component_names},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Print the build steps in order; nothing is built.
pub fn execute(
    args: SelectionArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let selection = component_names(&args.components)?;
    let project = Project::open(&global, &config)?;
    let steps = project.component_service(&config).plan(&selection)?;

    if output.is_json() {
        output.json(&steps)?;
        return Ok(());
    }

    output.header(&format!(
        "Build plan for '{}' ({} mode):",
        project.name(),
        project.mode()
    ))?;
    for (position, step) in steps.iter().enumerate() {
        let line = format!("  {:>2}. {}", position + 1, step.artifact);
        if step.dependencies.is_empty() {
            output.print(&line)?;
        } else {
            let from: Vec<String> = step.dependencies.iter().map(ArtifactRef::to_string).collect();
            output.print(&format!("{line}  (from {})", from.join(", ")))?;
        }
    }

    Ok(())
}
