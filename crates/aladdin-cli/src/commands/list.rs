//! Implementation of the `components list` command.

use serde::Serialize;

use aladdin_core::{
    application::ComponentService,
    domain::{ComponentName, ImageMode},
};

use crate::{
    cli::{GlobalArgs, ListArgs},
    commands::Project,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// One row of the listing.
#[derive(Debug, Serialize)]
struct ComponentSummary {
    name: ComponentName,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<ImageMode>,
    dependencies: Vec<ComponentName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentSummary {
    fn load(service: &ComponentService, name: &ComponentName) -> Self {
        match service.load(name) {
            Ok(descriptor) => Self {
                name: name.clone(),
                mode: Some(descriptor.mode()),
                dependencies: descriptor.dependencies,
                error: None,
            },
            Err(e) => Self {
                name: name.clone(),
                mode: None,
                dependencies: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = Project::open(&global, &config)?;
    let service = project.component_service(&config);
    let names = service.list()?;

    if args.names {
        for name in &names {
            output.print(name.as_str())?;
        }
        return Ok(());
    }

    let rows: Vec<ComponentSummary> = names
        .iter()
        .map(|name| ComponentSummary::load(&service, name))
        .collect();

    if output.is_json() {
        output.json(&rows)?;
        return Ok(());
    }

    if rows.is_empty() {
        output.info(&format!(
            "No components in {}",
            project.components_dir().display()
        ))?;
        return Ok(());
    }

    output.header(&format!("Components of '{}':", project.name()))?;
    for row in &rows {
        match (&row.mode, &row.error) {
            (Some(mode), _) if row.dependencies.is_empty() => {
                output.print(&format!("  {:<24} {}", row.name, mode))?;
            }
            (Some(mode), _) => {
                let deps: Vec<&str> = row.dependencies.iter().map(ComponentName::as_str).collect();
                output.print(&format!(
                    "  {:<24} {:<12} depends on {}",
                    row.name,
                    mode,
                    deps.join(", ")
                ))?;
            }
            (None, error) => {
                output.warning(&format!(
                    "{} (invalid: {})",
                    row.name,
                    error.as_deref().unwrap_or("unknown error")
                ))?;
            }
        }
    }

    Ok(())
}
