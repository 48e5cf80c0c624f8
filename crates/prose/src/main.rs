//! Prose CLI - rich-text document conversion.
//!
//! Provides commands for:
//! - `html`: Render a JSON document as HTML
//! - `json`: Parse HTML into a JSON document
//! - `text`: Extract plain text from a JSON document
//! - `is-empty`: Check whether a JSON document has content

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{HtmlArgs, IsEmptyArgs, JsonArgs, TextArgs};
use output::Output;

/// Prose - rich-text document conversion.
#[derive(Parser)]
#[command(name = "prose", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover prose.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (shows INFO level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON document as HTML.
    Html(HtmlArgs),
    /// Parse HTML into a JSON document.
    Json(JsonArgs),
    /// Extract plain text from a JSON document.
    Text(TextArgs),
    /// Check whether a JSON document is empty (exit code 0 if empty, 1 if not).
    IsEmpty(IsEmptyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Html(args) => args.execute(config_path, &output),
        Commands::Json(args) => args.execute(config_path, &output),
        Commands::Text(args) => args.execute(config_path, &output),
        Commands::IsEmpty(args) => args.execute(config_path, &output),
    };

    result.unwrap_or_else(|err| {
        output.error(&format!("Error: {err}"));
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["prose", "html", "doc.json", "--verbose", "-c", "p.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Commands::Html(_)));
    }

    #[test]
    fn test_is_empty_subcommand_name() {
        let cli = Cli::try_parse_from(["prose", "is-empty"]).unwrap();
        assert!(matches!(cli.command, Commands::IsEmpty(_)));
    }
}
