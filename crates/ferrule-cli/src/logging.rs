//! Tracing subscriber initialisation.
//!
//! Only the CLI crate is allowed to call [`init_logging`]; the library crates
//! only *emit* spans and events.
//!
//! # Verbosity mapping
//!
//! | Flag(s)          | Filter level |
//! |------------------|--------------|
//! | (none)           | WARN         |
//! | `-v`             | INFO         |
//! | `-vv`, `--debug` | DEBUG        |
//! | `-vvv`           | TRACE        |
//! | `--quiet`        | ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Initialise the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros fire.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = derive_level(args);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ferrule={level},ferrule_core={level},ferrule_adapters={level}"
        ))
    });

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Translate the verbosity counter and flags to a level string.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    let verbose = if args.debug {
        args.verbose.max(2)
    } else {
        args.verbose
    };
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(verbose: u8, quiet: bool, debug: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            debug,
            no_color: true,
            ..Default::default()
        }
    }

    #[test]
    fn level_default() {
        assert_eq!(derive_level(&args_with(0, false, false)), "warn");
    }

    #[test]
    fn level_follows_verbose_count() {
        assert_eq!(derive_level(&args_with(1, false, false)), "info");
        assert_eq!(derive_level(&args_with(2, false, false)), "debug");
        assert_eq!(derive_level(&args_with(3, false, false)), "trace");
        assert_eq!(derive_level(&args_with(10, false, false)), "trace");
    }

    #[test]
    fn debug_flag_is_at_least_debug() {
        assert_eq!(derive_level(&args_with(0, false, true)), "debug");
        assert_eq!(derive_level(&args_with(3, false, true)), "trace");
    }

    // quiet takes precedence over verbose
    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(derive_level(&args_with(3, true, false)), "error");
    }
}
