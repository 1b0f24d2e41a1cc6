//! Implementation of the `components edit` command.

use aladdin_core::application::EditOutcome;

use crate::{
    cli::{EditArgs, GlobalArgs},
    commands::{Project, component_name},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: EditArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let component = component_name(&args.component)?;
    let project = Project::open(&global, &config)?;

    match project.build_service(&config).edit(&component)? {
        EditOutcome::Unchanged => {
            output.info("No dependency changes; the image was not rebuilt")?;
        }
        EditOutcome::Rebuilt {
            component,
            dependents,
        } => {
            output.success(&format!("Rebuilt '{component}'"))?;
            if !dependents.is_empty() {
                let names: Vec<&str> = dependents.iter().map(|d| d.as_str()).collect();
                output.success(&format!("Rebuilt dependents: {}", names.join(", ")))?;
            }
        }
    }
    Ok(())
}
