//! Implementation of the `ferrule create` command.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use ferrule_core::domain::common::normalize;
use ferrule_core::domain::validation::validate_project_name;
use ferrule_core::error::FerruleError;
use ferrule_core::prelude::{CreateRequest, DispatchOutcome};

use super::{can_prompt, open_host, prompt, working_dir};
use crate::{
    cli::{CreateArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, directory_not_empty},
    output::OutputManager,
};

/// Execute `ferrule create`.
///
/// 1. Resolve the target directory and project name
/// 2. Refuse a non-empty directory unless `--force` or confirmed
/// 3. Pick a create type registered by the plugins
/// 4. Dispatch to that type's action
#[instrument(skip_all)]
pub async fn execute(
    args: CreateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let interactive = can_prompt(global, args.yes);
    let cwd = working_dir(global)?;

    let dir = args.dir.as_deref().unwrap_or(".");
    let project_dir = normalize(&cwd.join(dir));

    let name = match args.name {
        Some(name) => name,
        None => {
            let default = default_name(&project_dir);
            if interactive {
                prompt::text("Project name", default.as_deref())?
            } else {
                default.ok_or(CliError::MissingValue {
                    what: "project name",
                    hint: "Pass --name <NAME>".into(),
                })?
            }
        }
    };
    validate_project_name(&name).map_err(FerruleError::from)?;

    check_target_dir(&project_dir, args.force, interactive, || {
        prompt::confirm(&format!(
            "{} is not empty. Continue?",
            project_dir.display()
        ))
    })?;

    let mut host = open_host(global, config, false).await?;
    let types = host.create_types();

    let kind = match args.kind {
        Some(kind) => kind,
        None if interactive && !types.is_empty() => {
            let items: Vec<String> = types
                .iter()
                .map(|t| format!("{} - {}", t.kind, t.description))
                .collect();
            let index = prompt::select("Project type", &items)?;
            types[index].kind.clone()
        }
        None => {
            let available: Vec<&str> = types.iter().map(|t| t.kind.as_str()).collect();
            return Err(CliError::MissingValue {
                what: "project type",
                hint: format!("Available types: {}", available.join(", ")),
            });
        }
    };

    output.header(&format!("Creating '{name}'..."))?;
    info!(%name, %kind, dir = %project_dir.display(), "create started");

    let request = CreateRequest {
        name: name.clone(),
        project_dir: project_dir.clone(),
        kind,
    };
    match host.create_project(request).await? {
        DispatchOutcome::Handled => {
            output.success(&format!("Project '{name}' created!"))?;
            output.print("")?;
            output.print("Next steps:")?;
            if project_dir != cwd {
                output.print(&format!("  cd {dir}"))?;
            }
            output.print("  npm install")?;
            output.print("  ferrule page <name>")?;
        }
        DispatchOutcome::Unsupported { reason } => output.warning(&reason)?,
    }

    Ok(())
}

fn default_name(dir: &Path) -> Option<String> {
    dir.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

/// A non-empty target needs `--force` or a confirmation; declining cancels.
fn check_target_dir(
    dir: &Path,
    force: bool,
    interactive: bool,
    confirm: impl FnOnce() -> CliResult<bool>,
) -> CliResult<()> {
    if force || is_empty_dir(dir)? {
        return Ok(());
    }
    if !interactive {
        return Err(directory_not_empty(dir.to_path_buf()));
    }
    if confirm()? {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

fn is_empty_dir(dir: &Path) -> CliResult<bool> {
    if !dir.exists() {
        return Ok(true);
    }
    Ok(std::fs::read_dir(dir)?.next().is_none())
}
