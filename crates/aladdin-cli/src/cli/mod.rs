//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use aladdin_core::domain::ImageMode;

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "components",
    bin_name = "components",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Work with the project's components",
    long_about = "Validate component descriptors, plan and run image builds in \
                  dependency order, and work inside component containers.",
    after_help = "EXAMPLES:\n\
        \x20 components validate\n\
        \x20 components plan api --output-format json\n\
        \x20 components create worker --depends-on shared\n\
        \x20 components run api -- pytest -q",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the project's components.
    #[command(visible_alias = "ls", about = "List components")]
    List(ListArgs),

    /// Validate component descriptors and the dependency graph.
    #[command(
        about = "Validate component descriptors",
        after_help = "EXAMPLES:\n\
            \x20 components validate\n\
            \x20 components validate api worker"
    )]
    Validate(SelectionArgs),

    /// Show the build order without building anything.
    #[command(
        about = "Show the build plan",
        after_help = "EXAMPLES:\n\
            \x20 components plan\n\
            \x20 components plan api --output-format json"
    )]
    Plan(SelectionArgs),

    /// Build component images in dependency order.
    #[command(
        about = "Build component images",
        after_help = "EXAMPLES:\n\
            \x20 components build\n\
            \x20 components build api --mode production"
    )]
    Build(SelectionArgs),

    /// Add a new component to the project.
    #[command(
        about = "Create a component",
        after_help = "EXAMPLES:\n\
            \x20 components create api\n\
            \x20 components create notebook --type compatible --base jupyter/base-notebook \\\n\
            \x20     --user jovyan --workdir /home/jovyan/work\n\
            \x20 components create legacy --type traditional --base python:3.11-slim"
    )]
    Create(CreateArgs),

    /// Run a command in a component's editor container.
    #[command(
        about = "Run a command in a component container",
        after_help = "EXAMPLES:\n\
            \x20 components run api\n\
            \x20 components run pipeline -- python -m pipeline --dry-run"
    )]
    Run(RunArgs),

    /// Open a shell in a component's container; rebuild if its lock file changed.
    #[command(about = "Edit a component inside its container")]
    Edit(EditArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 components completions bash > ~/.local/share/bash-completion/completions/components\n\
            \x20 components completions zsh  > ~/.zfunc/_components"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 components config get build.tag\n\
            \x20 components config list"
    )]
    Config(ConfigCommands),
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `components list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Names only, one per line.
    #[arg(long = "names", help = "Print only component names")]
    pub names: bool,
}

// ── validate / plan / build ───────────────────────────────────────────────────

/// Components to act on; all of them when empty.
#[derive(Debug, Args)]
pub struct SelectionArgs {
    #[arg(value_name = "COMPONENT", help = "Components to act on (default: all)")]
    pub components: Vec<String>,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `components create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Directory name of the new component.
    #[arg(value_name = "NAME", help = "Component name")]
    pub name: String,

    /// Kind of image the component builds.
    #[arg(
        short = 't',
        long = "type",
        value_enum,
        default_value = "standard",
        help = "Component type"
    )]
    pub kind: ComponentKind,

    /// Base image (compatible and traditional components).
    #[arg(long = "base", value_name = "IMAGE", help = "Base image")]
    pub base: Option<String>,

    /// Python version to record in the descriptor.
    #[arg(long = "language-version", value_name = "VERSION", help = "Python version")]
    pub language_version: Option<String>,

    #[arg(long = "user", value_name = "NAME", help = "Image user name")]
    pub user: Option<String>,

    #[arg(long = "group", value_name = "GROUP", help = "Image user group")]
    pub group: Option<String>,

    #[arg(long = "home", value_name = "DIR", help = "Image user home directory")]
    pub home: Option<String>,

    #[arg(long = "workdir", value_name = "DIR", help = "Working directory in the image")]
    pub workdir: Option<String>,

    /// Components the new one is composed from.
    #[arg(
        short = 'd',
        long = "depends-on",
        value_name = "COMPONENT",
        value_delimiter = ',',
        help = "Dependencies (repeat or comma-separate)"
    )]
    pub depends_on: Vec<String>,

    /// Also write a Dockerfile with extra build steps.
    #[arg(long = "dockerfile", help = "Add a Dockerfile for extra build steps")]
    pub dockerfile: bool,

    /// Only write the files; do not build the image.
    #[arg(long = "no-build", help = "Skip building the new component")]
    pub no_build: bool,
}

/// Kinds of component `create` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComponentKind {
    /// Default base image with every convention applied.
    Standard,
    /// Alternative python base image.
    Compatible,
    /// Own Dockerfile, no special handling.
    Traditional,
}

impl From<ComponentKind> for ImageMode {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Standard => ImageMode::Standard,
            ComponentKind::Compatible => ImageMode::Compatible,
            ComponentKind::Traditional => ImageMode::Traditional,
        }
    }
}

// ── run / edit ────────────────────────────────────────────────────────────────

/// Arguments for `components run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(value_name = "COMPONENT", help = "Component to run")]
    pub component: String,

    /// Command for the container; prefix with `--` when it has flags.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Command to run (default: /bin/bash)"
    )]
    pub command: Vec<String>,
}

/// Arguments for `components edit`.
#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(value_name = "COMPONENT", help = "Component to edit")]
    pub component: String,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `components completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `components config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `build.tag`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path of the configuration file in use.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
