//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use ferrule_core::prelude::{BuildMode, BuildTarget};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "ferrule",
    bin_name = "ferrule",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Plugin-driven scaffolding and build orchestration for front-end projects",
    long_about = "ferrule creates front-end projects, pages and components, and resolves \
                  bundler configuration through a plugin and hook pipeline.",
    after_help = "EXAMPLES:\n\
        \x20 ferrule create my-shop react\n\
        \x20 ferrule page user-profile\n\
        \x20 ferrule plugin add ferrule-plugin-sass\n\
        \x20 ferrule inspect --target node --mode production",
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
    /// Create a new project.
    #[command(
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 ferrule create                  # prompt for everything\n\
            \x20 ferrule create my-shop react\n\
            \x20 ferrule create . typescript-sample --name @acme/site --force"
    )]
    Create(CreateArgs),

    /// Add a page to the current project.
    #[command(visible_alias = "p", about = "Add a page")]
    Page(ScaffoldArgs),

    /// Add a component to the current project.
    #[command(visible_alias = "c", about = "Add a component")]
    Component(ScaffoldArgs),

    /// Manage globally installed plugins.
    #[command(
        about = "Manage global plugins",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 ferrule plugin add ferrule-plugin-sass\n\
            \x20 ferrule plugin delete ferrule-plugin-sass\n\
            \x20 ferrule plugin ls"
    )]
    Plugin(PluginCommands),

    /// Print the resolved bundler configuration.
    #[command(
        about = "Print the resolved bundler configuration",
        after_help = "EXAMPLES:\n\
            \x20 ferrule inspect\n\
            \x20 ferrule inspect --target node --mode production\n\
            \x20 ferrule inspect --write    # also append an inspection file"
    )]
    Inspect(InspectArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 ferrule completions bash > ~/.local/share/bash-completion/completions/ferrule\n\
            \x20 ferrule completions zsh  > ~/.zfunc/_ferrule\n\
            \x20 ferrule completions fish > ~/.config/fish/completions/ferrule.fish"
    )]
    Completions(CompletionsArgs),
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `ferrule create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Directory to create the project in.
    #[arg(value_name = "DIR", help = "Project directory (default: .)")]
    pub dir: Option<String>,

    /// Create type registered by a plugin, e.g. `react`.
    #[arg(value_name = "TYPE", help = "Project type")]
    pub kind: Option<String>,

    /// Package name; defaults to the directory name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Skip every prompt and use defaults.
    #[arg(short = 'y', long = "yes", help = "Do not prompt")]
    pub yes: bool,

    /// Scaffold into a non-empty directory.
    #[arg(long = "force", help = "Allow a non-empty target directory")]
    pub force: bool,
}

// ── page / component ──────────────────────────────────────────────────────────

/// Arguments for `ferrule page` and `ferrule component`.
#[derive(Debug, Args)]
pub struct ScaffoldArgs {
    /// Name of the page or component.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Fail instead of prompting for a missing name.
    #[arg(short = 'y', long = "yes", help = "Do not prompt")]
    pub yes: bool,
}

// ── plugin ────────────────────────────────────────────────────────────────────

/// Subcommands for `ferrule plugin`.
#[derive(Debug, Subcommand)]
pub enum PluginCommands {
    /// Install a plugin for every project on this machine.
    Add {
        #[arg(value_name = "PLUGIN")]
        name: String,
    },
    /// Remove a global plugin.
    #[command(visible_alias = "remove")]
    Delete {
        #[arg(value_name = "PLUGIN")]
        name: String,
    },
    /// List global plugins.
    #[command(visible_alias = "ls")]
    List {
        /// Print a JSON array instead of a listing.
        #[arg(long = "json")]
        json: bool,
    },
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `ferrule inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    #[arg(
        short = 't',
        long = "target",
        value_enum,
        default_value = "web",
        help = "Build target"
    )]
    pub target: TargetArg,

    #[arg(
        short = 'm',
        long = "mode",
        value_enum,
        default_value = "development",
        help = "Build mode"
    )]
    pub mode: ModeArg,

    /// Resolve as for a server-side-rendering development session.
    #[arg(long = "ssr", help = "Enable SSR for this build")]
    pub ssr: bool,

    /// Also append the inspection file to the project root.
    #[arg(long = "write", help = "Write an inspection file")]
    pub write: bool,
}

/// Build targets accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Web,
    Node,
    Storybook,
}

impl From<TargetArg> for BuildTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Web => Self::Web,
            TargetArg::Node => Self::Node,
            TargetArg::Storybook => Self::Storybook,
        }
    }
}

/// Build modes accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl From<ModeArg> for BuildMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Development => Self::Development,
            ModeArg::Production => Self::Production,
        }
    }
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `ferrule completions`.
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

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_takes_dir_and_type() {
        let cli = Cli::parse_from(["ferrule", "create", "my-shop", "react", "--force"]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.dir.as_deref(), Some("my-shop"));
        assert_eq!(args.kind.as_deref(), Some("react"));
        assert!(args.force);
    }

    #[test]
    fn page_and_component_aliases() {
        let cli = Cli::parse_from(["ferrule", "p", "home"]);
        assert!(matches!(cli.command, Commands::Page(ScaffoldArgs { name: Some(ref n), .. }) if n == "home"));

        let cli = Cli::parse_from(["ferrule", "c", "NavBar"]);
        assert!(matches!(cli.command, Commands::Component(_)));
    }

    #[test]
    fn plugin_ls_alias() {
        let cli = Cli::parse_from(["ferrule", "plugin", "ls"]);
        assert!(matches!(
            cli.command,
            Commands::Plugin(PluginCommands::List { json: false })
        ));
    }

    #[test]
    fn inspect_defaults_and_aliases() {
        let cli = Cli::parse_from(["ferrule", "inspect"]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.target, TargetArg::Web);
        assert_eq!(args.mode, ModeArg::Development);

        let cli = Cli::parse_from(["ferrule", "inspect", "-t", "node", "-m", "prod"]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(BuildTarget::from(args.target), BuildTarget::Node);
        assert_eq!(BuildMode::from(args.mode), BuildMode::Production);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["ferrule", "--quiet", "--verbose", "plugin", "ls"]);
        assert!(result.is_err());
    }
}
