//! Error types for the document model.

/// Error reading a document model value.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The value is an object but not a well-formed node.
    #[error("malformed document node")]
    Json(#[from] serde_json::Error),
}
