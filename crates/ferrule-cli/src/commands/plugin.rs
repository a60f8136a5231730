//! `ferrule plugin add | delete | list`.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::instrument;

use ferrule_adapters::JsonGlobalStore;
use ferrule_core::application::services::{AddOutcome, GlobalPlugins};

use super::plugin_catalog;
use crate::{
    cli::PluginCommands,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(cmd: PluginCommands, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let store = JsonGlobalStore::new(&config.global_config);
    let catalog = plugin_catalog();
    let plugins = GlobalPlugins::new(&store, &catalog, &config.global_dir);

    match cmd {
        PluginCommands::Add { name } => {
            let spinner = spinner(output, &format!("Adding {name}..."));
            let outcome = plugins.add(&name);
            spinner.finish_and_clear();

            match outcome? {
                AddOutcome::Added => output.success(&format!("Added global plugin '{name}'"))?,
                AddOutcome::AlreadyPresent => {
                    output.info(&format!("'{name}' is already installed"))?
                }
            }
        }
        PluginCommands::Delete { name } => {
            if plugins.delete(&name)? {
                output.success(&format!("Removed global plugin '{name}'"))?;
            } else {
                output.warning(&format!("'{name}' is not a global plugin"))?;
            }
        }
        PluginCommands::List { json } => {
            let names = plugins.list()?;
            if json {
                let text = serde_json::to_string_pretty(&names).map_err(std::io::Error::from)?;
                output.data(&text)?;
            } else {
                output.header("Global plugins:")?;
                for name in &names {
                    output.data(&format!("  {name}"))?;
                }
                output.print(&format!("total: {}", names.len()))?;
            }
        }
    }
    Ok(())
}

fn spinner(output: &OutputManager, message: &str) -> ProgressBar {
    if output.is_quiet() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
