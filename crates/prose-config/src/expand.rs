//! Environment variable expansion for string settings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the setting in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("plain", "f").unwrap(), "plain");
    }

    #[test]
    fn test_default_used_when_unset() {
        assert_eq!(
            expand_env("${PROSE_EXPAND_UNSET_VAR:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_missing_var_names_field() {
        let err = expand_env("${PROSE_EXPAND_MISSING_VAR}", "render.css_class").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("render.css_class"));
        assert!(msg.contains("PROSE_EXPAND_MISSING_VAR"));
    }
}
