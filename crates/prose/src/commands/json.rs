//! `prose json` command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use prose_config::{CliSettings, Config};
use prose_html::{MarkupParser, WhitespaceMode};
use prose_model::Node;

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the json command.
#[derive(Args)]
pub(crate) struct JsonArgs {
    /// HTML file (default: stdin).
    input: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Keep whitespace in text verbatim instead of collapsing it.
    #[arg(long)]
    preserve_whitespace: bool,
}

impl JsonArgs {
    /// Execute the json command.
    pub(crate) fn execute(
        self,
        config_path: Option<&Path>,
        output: &Output,
    ) -> Result<ExitCode, CliError> {
        let cli_settings = CliSettings {
            preserve_whitespace: self.preserve_whitespace.then_some(true),
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let html = read_input(self.input.as_deref())?;

        let document = parse(&html, &config);
        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        output.result(&json)?;
        Ok(ExitCode::SUCCESS)
    }
}

fn parse(html: &str, config: &Config) -> Node {
    let whitespace = if config.parse.preserve_whitespace {
        WhitespaceMode::Preserve
    } else {
        WhitespaceMode::Collapse
    };
    MarkupParser::new()
        .with_max_depth(config.parse.max_depth)
        .with_whitespace(whitespace)
        .parse(Some(html))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use prose_model::default_document;

    use super::*;

    #[test]
    fn test_parse_default_config() {
        assert_eq!(
            parse("<p>Hello, world!</p>", &Config::default()),
            Node::doc(vec![Node::paragraph(vec![Node::text("Hello, world!")])])
        );
    }

    #[test]
    fn test_parse_preserving_whitespace() {
        let mut config = Config::default();
        config.parse.preserve_whitespace = true;
        assert_eq!(
            parse("<p>a  b</p>", &config),
            Node::doc(vec![Node::paragraph(vec![Node::text("a  b")])])
        );
    }

    #[test]
    fn test_parse_depth_limit_falls_back() {
        let mut config = Config::default();
        config.parse.max_depth = 2;
        assert_eq!(
            parse("<div><div><div><p>deep</p></div></div></div>", &config),
            default_document()
        );
    }
}
