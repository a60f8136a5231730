//! `ferrule inspect`: print the resolved bundler configuration.

use tracing::instrument;

use ferrule_core::prelude::{BuildMode, BuildOptions, BuildTarget};

use super::open_host;
use crate::{
    cli::{GlobalArgs, InspectArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(target = ?args.target, mode = ?args.mode))]
pub async fn execute(
    args: InspectArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let mut host = open_host(global, config, args.write).await?;
    host.set_mode(BuildMode::from(args.mode));

    let options = BuildOptions::new(BuildTarget::from(args.target)).ssr(args.ssr);
    let resolved = host.resolve_configuration(options).await?;

    let text = serde_json::to_string_pretty(&resolved).map_err(std::io::Error::from)?;
    output.data(&text)?;
    Ok(())
}
