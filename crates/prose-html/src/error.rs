//! Error types for markup conversion.
//!
//! These never escape the infallible entry points (`generate`, `parse`); they
//! are logged there and replaced by a default value. The `try_*` methods
//! return them to callers that want to react.

/// Error while generating markup from a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// The JSON value is an object but not a well-formed document.
    #[error("malformed document")]
    Model(#[from] prose_model::ModelError),

    /// The root node is not a document.
    #[error("root node has type `{found}`, expected `doc`")]
    NotADocument {
        /// Type of the root node.
        found: String,
    },

    /// The tree is nested deeper than the configured limit.
    #[error("document nesting exceeds {limit} levels")]
    DepthExceeded {
        /// Configured depth limit.
        limit: usize,
    },

    /// A registered node renderer failed.
    #[error("renderer for `{node_type}` failed: {message}")]
    Renderer {
        /// Node type being rendered.
        node_type: String,
        /// Failure description.
        message: String,
    },

    /// Writing to the output buffer failed.
    #[error("formatting error")]
    Fmt(#[from] std::fmt::Error),
}

/// Error while parsing markup into a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Markup tokenizing error.
    #[error("markup parse error")]
    Xml(#[from] quick_xml::Error),

    /// Encoding error during tokenizing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Elements are nested deeper than the configured limit.
    #[error("markup nesting exceeds {limit} levels")]
    DepthExceeded {
        /// Configured depth limit.
        limit: usize,
    },
}
