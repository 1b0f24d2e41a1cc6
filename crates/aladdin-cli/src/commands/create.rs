//! Implementation of the `components create` command.
//!
//! Responsibility: translate CLI arguments into a [`NewComponent`], write it
//! through the component service and, unless `--no-build`, build it.

use tracing::{info, instrument};

use aladdin_core::{
    application::NewComponent,
    domain::{ComponentDescriptor, ImageMode},
};

use crate::{
    cli::{CreateArgs, GlobalArgs},
    commands::{Project, component_name, component_names},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(component = %args.name))]
pub fn execute(
    args: CreateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let new = new_component(&args)?;
    let project = Project::open(&global, &config)?;
    let service = project.build_service(&config);

    let descriptor = service.components().create(&new)?;
    output.success(&format!(
        "Created {} component '{}' in {}",
        descriptor.mode(),
        new.name,
        project.components_dir().join(new.name.as_str()).display()
    ))?;
    describe(&descriptor, &output)?;

    if args.no_build {
        return Ok(());
    }

    // A stale editor image from an earlier component of the same name would
    // shadow the new one in `run` and `edit`.
    service.discard_editor_image(&new.name)?;
    info!("Building new component");
    for artifact in service.build(std::slice::from_ref(&new.name))? {
        output.success(&format!("Built {artifact}"))?;
    }
    Ok(())
}

/// Check flag combinations that clap cannot express and collect the request.
fn new_component(args: &CreateArgs) -> CliResult<NewComponent> {
    let mode = ImageMode::from(args.kind);
    let name = component_name(&args.name)?;

    let reject = |flag: &str| {
        Err(CliError::InvalidInput {
            message: format!("{flag} cannot be used with --type {mode}"),
        })
    };
    match mode {
        ImageMode::Standard if args.base.is_some() => return reject("--base"),
        ImageMode::Traditional => {
            if args.base.is_none() {
                return Err(CliError::InvalidInput {
                    message: "traditional components need --base for their Dockerfile".into(),
                });
            }
            for (flag, set) in [
                ("--user", args.user.is_some()),
                ("--group", args.group.is_some()),
                ("--home", args.home.is_some()),
                ("--workdir", args.workdir.is_some()),
                ("--language-version", args.language_version.is_some()),
                ("--dockerfile", args.dockerfile),
            ] {
                if set {
                    return reject(flag);
                }
            }
        }
        ImageMode::Compatible => {
            for (flag, value) in [
                ("--base", &args.base),
                ("--user", &args.user),
                ("--workdir", &args.workdir),
            ] {
                if value.is_none() {
                    return Err(CliError::InvalidInput {
                        message: format!("compatible components need {flag}"),
                    });
                }
            }
        }
        ImageMode::Standard => {}
    }

    let mut new = NewComponent::new(name, mode);
    new.language_version = args.language_version.clone();
    new.base = args.base.clone();
    new.user = args.user.clone();
    new.group = args.group.clone();
    new.home = args.home.clone();
    new.workdir = args.workdir.clone();
    new.dependencies = component_names(&args.depends_on)?;
    new.dockerfile = args.dockerfile;
    Ok(new)
}

fn describe(descriptor: &ComponentDescriptor, output: &OutputManager) -> CliResult<()> {
    if descriptor.dependencies.is_empty() {
        return Ok(());
    }
    let deps: Vec<&str> = descriptor.dependencies.iter().map(|d| d.as_str()).collect();
    output.info(&format!("Composed from: {}", deps.join(", ")))?;
    Ok(())
}
