//! `ferrule page` and `ferrule component`.

use tracing::instrument;

use ferrule_core::prelude::{DispatchOutcome, ScaffoldRequest};

use super::{can_prompt, open_host, prompt};
use crate::{
    cli::{GlobalArgs, ScaffoldArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Page,
    Component,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Component => "component",
        }
    }
}

#[instrument(skip_all, fields(kind = kind.label()))]
pub async fn execute(
    kind: Kind,
    args: ScaffoldArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let name = match args.name {
        Some(name) => name,
        None if can_prompt(global, args.yes) => {
            prompt::text(&format!("{} name", kind.label()), None)?
        }
        None => {
            return Err(CliError::MissingValue {
                what: "name",
                hint: format!("Usage: ferrule {} <NAME>", kind.label()),
            });
        }
    };
    if name.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("{} name cannot be empty", kind.label()),
            source: None,
        });
    }

    let mut host = open_host(global, config, false).await?;
    let request = ScaffoldRequest { name: name.clone() };
    let outcome = match kind {
        Kind::Page => host.add_page(request).await?,
        Kind::Component => host.add_component(request).await?,
    };

    match outcome {
        DispatchOutcome::Handled => {
            output.success(&format!("Added {} '{name}'", kind.label()))?
        }
        DispatchOutcome::Unsupported { reason } => output.warning(&reason)?,
    }
    Ok(())
}
