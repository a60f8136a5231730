//! Interactive prompts.
//!
//! Callers check [`super::can_prompt`] first. Without the `interactive`
//! feature every prompt reports the value as missing.

use crate::error::{CliError, CliResult};

#[cfg(feature = "interactive")]
fn prompt_error(e: dialoguer::Error) -> CliError {
    CliError::InvalidInput {
        message: "prompt failed".into(),
        source: Some(Box::new(e)),
    }
}

/// Ask for a line of text.
#[cfg(feature = "interactive")]
pub fn text(prompt: &str, default: Option<&str>) -> CliResult<String> {
    let mut input = dialoguer::Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    input.interact_text().map_err(prompt_error)
}

/// Pick one of `items`; returns its index.
#[cfg(feature = "interactive")]
pub fn select(prompt: &str, items: &[String]) -> CliResult<usize> {
    dialoguer::FuzzySelect::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(prompt_error)
}

#[cfg(feature = "interactive")]
pub fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(prompt_error)
}

#[cfg(not(feature = "interactive"))]
pub fn text(prompt: &str, _default: Option<&str>) -> CliResult<String> {
    Err(unavailable(prompt))
}

#[cfg(not(feature = "interactive"))]
pub fn select(prompt: &str, _items: &[String]) -> CliResult<usize> {
    Err(unavailable(prompt))
}

#[cfg(not(feature = "interactive"))]
pub fn confirm(prompt: &str) -> CliResult<bool> {
    Err(unavailable(prompt))
}

#[cfg(not(feature = "interactive"))]
fn unavailable(prompt: &str) -> CliError {
    CliError::MissingValue {
        what: "value",
        hint: format!("Pass \"{prompt}\" on the command line; prompts are disabled in this build"),
    }
}
