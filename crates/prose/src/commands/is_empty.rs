//! `prose is-empty` command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use prose_config::Config;
use prose_model::is_empty_value;

use super::read_document;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the is-empty command.
#[derive(Args)]
pub(crate) struct IsEmptyArgs {
    /// JSON document file (default: stdin).
    input: Option<PathBuf>,
}

impl IsEmptyArgs {
    /// Execute the is-empty command.
    ///
    /// Prints `true` or `false`; the exit code is 0 for an empty document.
    pub(crate) fn execute(
        self,
        config_path: Option<&Path>,
        output: &Output,
    ) -> Result<ExitCode, CliError> {
        // Emptiness has no settings, but a bad --config still fails
        Config::load(config_path, None)?;
        let document = read_document(self.input.as_deref())?;

        let empty = is_empty_value(&document);
        output.result(if empty { "true" } else { "false" })?;
        Ok(if empty {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
