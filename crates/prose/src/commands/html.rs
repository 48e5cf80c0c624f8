//! `prose html` command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use prose_config::{CliSettings, Config};
use prose_html::MarkupGenerator;
use serde_json::Value;

use super::read_document;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the html command.
#[derive(Args)]
pub(crate) struct HtmlArgs {
    /// JSON document file (default: stdin).
    input: Option<PathBuf>,

    /// Wrap the output in a div with this CSS class (overrides config).
    #[arg(long)]
    class: Option<String>,
}

impl HtmlArgs {
    /// Execute the html command.
    pub(crate) fn execute(
        self,
        config_path: Option<&Path>,
        output: &Output,
    ) -> Result<ExitCode, CliError> {
        let cli_settings = CliSettings {
            css_class: self.class,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let document = read_document(self.input.as_deref())?;

        output.result(&render(&document, &config))?;
        Ok(ExitCode::SUCCESS)
    }
}

fn render(document: &Value, config: &Config) -> String {
    tracing::info!(max_depth = config.render.max_depth, "Rendering document");
    MarkupGenerator::new()
        .with_max_depth(config.render.max_depth)
        .render_with_class_value(document, config.render.css_class.as_deref())
}
