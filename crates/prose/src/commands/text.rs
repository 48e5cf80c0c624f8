//! `prose text` command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use prose_config::{CliSettings, Config};
use prose_model::{TextOptions, extract_plain_text_value};
use serde_json::Value;

use super::read_document;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the text command.
#[derive(Args)]
pub(crate) struct TextArgs {
    /// JSON document file (default: stdin).
    input: Option<PathBuf>,

    /// Separator inserted between blocks (overrides config).
    #[arg(long)]
    separator: Option<String>,
}

impl TextArgs {
    /// Execute the text command.
    pub(crate) fn execute(
        self,
        config_path: Option<&Path>,
        output: &Output,
    ) -> Result<ExitCode, CliError> {
        let cli_settings = CliSettings {
            block_separator: self.separator,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let document = read_document(self.input.as_deref())?;

        output.result(&extract(&document, &config))?;
        Ok(ExitCode::SUCCESS)
    }
}

fn extract(document: &Value, config: &Config) -> String {
    let options =
        TextOptions::default().with_block_separator(config.text.block_separator.as_str());
    extract_plain_text_value(document, &options)
}
