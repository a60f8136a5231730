//! Flags accepted before or after any subcommand.

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Log more: info, then debug, then trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    /// Only errors are printed.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with_all = ["verbose", "debug"],
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Shorthand for `-vv`.
    #[arg(long = "debug", global = true, help = "Print debug logs")]
    pub debug: bool,

    /// Also set through `NO_COLOR`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Project configuration file, instead of `ferrule.config.json`.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Project configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Run as if started in this directory.
    #[arg(
        short = 'C',
        long = "cwd",
        global = true,
        value_name = "DIR",
        help = "Project directory (default: current directory)"
    )]
    pub cwd: Option<PathBuf>,
}
