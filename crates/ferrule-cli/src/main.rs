//! # ferrule CLI
//!
//! Front-end project scaffolding and bundler configuration, driven by plugins.
//!
//! ## Startup sequence
//!
//! 1. Load `.env` and parse CLI arguments.
//! 2. Initialise the tracing subscriber.
//! 3. Load tool settings (global plugin list location).
//! 4. Build the [`OutputManager`] and an async runtime.
//! 5. Dispatch to the command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / plugin error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    commands::scaffold::Kind,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here and exit 0.
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load settings: {e:#}");
            return ExitCode::from(4);
        }
    };

    let output = OutputManager::new(&cli.global);
    let verbose = cli.global.verbose > 0 || cli.global.debug;

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(run(cli, config, output)) {
        Ok(()) => {
            info!("ferrule completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

#[instrument(skip_all)]
async fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Create(args) => commands::create::execute(args, global, &config, &output).await,
        Commands::Page(args) => {
            commands::scaffold::execute(Kind::Page, args, global, &config, &output).await
        }
        Commands::Component(args) => {
            commands::scaffold::execute(Kind::Component, args, global, &config, &output).await
        }
        Commands::Plugin(cmd) => commands::plugin::execute(cmd, &config, &output),
        Commands::Inspect(args) => commands::inspect::execute(args, global, &config, &output).await,
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Log the error, print it on stderr and map it to an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    if matches!(err, CliError::Cancelled) {
        eprintln!("{err}");
        return ExitCode::SUCCESS;
    }
    err.log();

    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }
}
