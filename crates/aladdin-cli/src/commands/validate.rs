//! Implementation of the `components validate` command.

use serde_json::json;
use tracing::instrument;

use aladdin_core::error::ErrorCategory;

use crate::{
    cli::{GlobalArgs, SelectionArgs},
    commands::{Project, component_names},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Validate the selected descriptors and, when they all load, the graph.
///
/// Every problem is printed before the command fails.
#[instrument(skip_all, fields(selected = args.components.len()))]
pub fn execute(
    args: SelectionArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let selection = component_names(&args.components)?;
    let project = Project::open(&global, &config)?;
    let report = project.component_service(&config).validate(&selection)?;

    if output.is_json() {
        output.json(&json!({
            "valid": report.is_valid(),
            "checked": report.checked,
            "graph_checked": report.graph_checked,
            "errors": report.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }))?;
    } else {
        for err in &report.errors {
            output.error(&err.to_string())?;
        }
        if report.is_valid() {
            output.success(&format!(
                "{} component(s) valid",
                report.checked.len()
            ))?;
        }
    }

    if report.is_valid() {
        return Ok(());
    }
    Err(CliError::ValidationFailed {
        count: report.errors.len(),
        graph_only: report
            .errors
            .iter()
            .all(|e| e.category() == ErrorCategory::Graph),
    })
}
