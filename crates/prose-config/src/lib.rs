//! Configuration management for prose.
//!
//! Parses `prose.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.css_class`
//! - `text.block_separator`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the wrapping CSS class.
    pub css_class: Option<String>,
    /// Override the plain-text block separator.
    pub block_separator: Option<String>,
    /// Override whitespace preservation in the parser.
    pub preserve_whitespace: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "prose.toml";

/// Upper bound for configurable nesting limits.
///
/// Generation recurses once per level; 1024 levels fit the main-thread
/// stack in debug builds.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTML generation configuration.
    pub render: RenderConfig,
    /// HTML parsing configuration.
    pub parse: ParseConfig,
    /// Plain-text extraction configuration.
    pub text: TextConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// HTML generation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Class of the `div` wrapping rendered output. Unset means no wrapper.
    pub css_class: Option<String>,
    /// Maximum document nesting depth.
    ///
    /// The CLI reads documents with `serde_json`, which rejects JSON nested
    /// more than 128 levels. Each node level takes two (object and `content`
    /// array), so through `prose html` values above 64 have no effect.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            css_class: None,
            max_depth: 256,
        }
    }
}

/// HTML parsing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum element nesting depth.
    pub max_depth: usize,
    /// Keep text whitespace verbatim instead of collapsing it.
    pub preserve_whitespace: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            preserve_whitespace: false,
        }
    }
}

/// Plain-text extraction configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Separator inserted between blocks.
    pub block_separator: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            block_separator: "\n\n".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.css_class`").
        field: String,
        /// Error message (e.g., "${`PROSE_CLASS`} not set").
        message: String,
    },
}

/// Require a depth limit to be within `1..=MAX_DEPTH_LIMIT`.
fn require_depth(value: usize, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    if value > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "{field} cannot exceed {MAX_DEPTH_LIMIT}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `prose.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(css_class) = &settings.css_class {
            self.render.css_class = Some(css_class.clone());
        }
        if let Some(separator) = &settings.block_separator {
            self.text.block_separator.clone_from(separator);
        }
        if let Some(preserve) = settings.preserve_whitespace {
            self.parse.preserve_whitespace = preserve;
        }
    }

    /// Search for a config file in `start` and its parents.
    #[must_use]
    pub fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and expansion
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_depth(self.render.max_depth, "render.max_depth")?;
        require_depth(self.parse.max_depth, "parse.max_depth")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref class) = self.render.css_class {
            self.render.css_class = Some(expand::expand_env(class, "render.css_class")?);
        }
        self.text.block_separator =
            expand::expand_env(&self.text.block_separator, "text.block_separator")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.css_class, None);
        assert_eq!(config.render.max_depth, 256);
        assert_eq!(config.parse.max_depth, 256);
        assert!(!config.parse.preserve_whitespace);
        assert_eq!(config.text.block_separator, "\n\n");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.max_depth, 256);
        assert_eq!(config.text.block_separator, "\n\n");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[render]
css_class = "prose-content"
max_depth = 64

[parse]
max_depth = 128
preserve_whitespace = true

[text]
block_separator = " "
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.css_class.as_deref(), Some("prose-content"));
        assert_eq!(config.render.max_depth, 64);
        assert_eq!(config.parse.max_depth, 128);
        assert!(config.parse.preserve_whitespace);
        assert_eq!(config.text.block_separator, " ");
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            css_class: Some("cli".to_owned()),
            block_separator: Some("\n".to_owned()),
            preserve_whitespace: Some(true),
        });
        assert_eq!(config.render.css_class.as_deref(), Some("cli"));
        assert_eq!(config.text.block_separator, "\n");
        assert!(config.parse.preserve_whitespace);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config: Config = toml::from_str("[render]\ncss_class = \"file\"").unwrap();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.render.css_class.as_deref(), Some("file"));
        assert_eq!(config.text.block_separator, "\n\n");
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PROSE_TEST_CLASS", "from-env");
        }

        let toml = r#"
[render]
css_class = "${PROSE_TEST_CLASS}"

[text]
block_separator = "${PROSE_TEST_SEPARATOR_UNSET:-|}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.render.css_class.as_deref(), Some("from-env"));
        assert_eq!(config.text.block_separator, "|");

        unsafe {
            std::env::remove_var("PROSE_TEST_CLASS");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let toml = r#"
[render]
css_class = "${PROSE_TEST_MISSING_CLASS}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("render.css_class"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_render_depth_zero() {
        let mut config = Config::default();
        config.render.max_depth = 0;
        assert_validation_error(&config, &["render.max_depth", "greater than 0"]);
    }

    #[test]
    fn test_validate_parse_depth_too_high() {
        let mut config = Config::default();
        config.parse.max_depth = MAX_DEPTH_LIMIT + 1;
        assert_validation_error(&config, &["parse.max_depth", "1024"]);
    }

    #[test]
    fn test_validate_depth_at_limit_passes() {
        let mut config = Config::default();
        config.render.max_depth = MAX_DEPTH_LIMIT;
        config.parse.max_depth = MAX_DEPTH_LIMIT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[render]\ncss_class = \"from-file\"\n").unwrap();

        let settings = CliSettings {
            block_separator: Some(" ".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.render.css_class.as_deref(), Some("from-file"));
        assert_eq!(config.text.block_separator, " ");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[parse]\nmax_depth = 0\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));

        fs::write(&path, "[parse\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }
}
