//! Command handlers.
//!
//! Each handler turns parsed arguments into host calls and prints the
//! outcome. Plugin behaviour lives in `ferrule-core` and the built-in
//! plugins.

use std::ffi::OsString;
use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use ferrule_adapters::{FileProjectLoader, JsonGlobalStore, LocalFilesystem, StaticCatalog, builtin_plugins};
use ferrule_core::application::services::{PluginSources, prepare};
use ferrule_core::domain::EnvVars;
use ferrule_core::prelude::{Host, HostOptions};

use crate::{cli::GlobalArgs, config::AppConfig, error::CliResult};

pub mod completions;
pub mod create;
pub mod inspect;
pub mod plugin;
mod prompt;
pub mod scaffold;

/// Directory the command runs in: `--cwd`, else the process directory.
pub fn working_dir(global: &GlobalArgs) -> CliResult<PathBuf> {
    let current = std::env::current_dir()?;
    Ok(match &global.cwd {
        Some(dir) => current.join(dir),
        None => current,
    })
}

/// Compiled-in plugins that named specifiers may resolve to.
pub fn plugin_catalog() -> StaticCatalog {
    StaticCatalog::new()
}

/// Load the project at the working directory and apply every plugin tier.
#[instrument(skip_all)]
pub async fn open_host(
    global: &GlobalArgs,
    config: &AppConfig,
    inspect: bool,
) -> CliResult<Host> {
    let cwd = working_dir(global)?;
    let env = utf8_env(std::env::vars_os());

    let mut options = HostOptions::new(&cwd).env(env);
    if let Some(file) = &global.config {
        options = options.config_file(file);
    }
    if inspect {
        options = options.inspect_dir(&cwd);
    }

    let filesystem = Arc::new(LocalFilesystem::new());
    let mut host = Host::load(options, &FileProjectLoader::new(), filesystem)?;
    debug!(?host, "host loaded");

    let catalog = plugin_catalog();
    let store = JsonGlobalStore::new(&config.global_config);
    prepare(
        &mut host,
        PluginSources {
            builtins: builtin_plugins::all(),
            catalog: &catalog,
            global_store: &store,
            global_dir: config.global_dir.clone(),
        },
    )
    .await?;

    Ok(host)
}

/// Environment snapshot; variables that are not UTF-8 are skipped.
pub fn utf8_env(vars: impl IntoIterator<Item = (OsString, OsString)>) -> EnvVars {
    vars.into_iter()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Prompts are allowed: the feature is on, stdin is a terminal and
/// neither `--yes` nor `--quiet` was given.
pub fn can_prompt(global: &GlobalArgs, yes: bool) -> bool {
    cfg!(feature = "interactive") && !yes && !global.quiet && std::io::stdin().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cwd_flag_is_joined_to_the_process_directory() {
        let global = GlobalArgs {
            cwd: Some(PathBuf::from("apps/web")),
            ..Default::default()
        };
        let dir = working_dir(&global).unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("apps/web"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_variables_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let env = utf8_env([
            (OsString::from("PORT"), OsString::from("4000")),
            (OsString::from("RAW"), OsString::from_vec(vec![0xff, 0xfe])),
            (OsString::from_vec(vec![0xff]), OsString::from("x")),
        ]);
        assert_eq!(env.len(), 1);
        assert_eq!(env["PORT"], "4000");
    }

    #[test]
    fn yes_and_quiet_disable_prompts() {
        assert!(!can_prompt(&GlobalArgs::default(), true));
        let quiet = GlobalArgs {
            quiet: true,
            ..Default::default()
        };
        assert!(!can_prompt(&quiet, false));
    }
}
