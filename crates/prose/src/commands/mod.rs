//! CLI command implementations.

pub(crate) mod html;
pub(crate) mod is_empty;
pub(crate) mod json;
pub(crate) mod text;

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::CliError;

pub(crate) use html::HtmlArgs;
pub(crate) use is_empty::IsEmptyArgs;
pub(crate) use json::JsonArgs;
pub(crate) use text::TextArgs;

/// Read command input from `path`, or stdin when absent or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::Input {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Read a JSON document from `path`, or stdin when absent or `-`.
pub(crate) fn read_document(path: Option<&Path>) -> Result<Value, CliError> {
    let input = read_input(path)?;
    Ok(serde_json::from_str(&input)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_read_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"type": "doc", "content": []}"#).unwrap();

        assert_eq!(
            read_document(Some(&path)).unwrap(),
            json!({"type": "doc", "content": []})
        );
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = read_input(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Input { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_read_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(read_document(Some(&path)), Err(CliError::Json(_))));
    }

    #[test]
    fn test_read_document_beyond_json_nesting_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.json");
        let open = r#"{"type": "blockquote", "content": ["#.repeat(100);
        let close = "]}".repeat(100);
        std::fs::write(&path, format!("{open}{close}")).unwrap();

        assert!(matches!(read_document(Some(&path)), Err(CliError::Json(_))));
    }
}
