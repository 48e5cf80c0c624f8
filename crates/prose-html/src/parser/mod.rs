//! HTML to document model.
//!
//! Parsing runs in two passes. The tokenizer builds a lenient element tree
//! from the markup, then the builder maps recognized elements to document
//! nodes, treating anything else as a transparent wrapper around its
//! content.

mod builder;
pub(crate) mod entities;
mod tokenizer;
mod tree;

use std::sync::LazyLock;

use prose_model::{Node, default_document};
use serde_json::Value;

use crate::error::ParseError;
use crate::generator::DEFAULT_MAX_DEPTH;
use builder::ModelBuilder;

static DEFAULT_PARSER: LazyLock<MarkupParser> = LazyLock::new(MarkupParser::new);

/// Treatment of whitespace in text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespaceMode {
    /// Collapse whitespace runs to a single space and trim block edges, as a
    /// browser renders them.
    #[default]
    Collapse,
    /// Keep text exactly as written.
    Preserve,
}

/// HTML parser producing document trees.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    max_depth: usize,
    whitespace: WhitespaceMode,
}

impl MarkupParser {
    /// Create a parser with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            whitespace: WhitespaceMode::default(),
        }
    }

    /// Set the maximum element nesting accepted before parsing fails.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set how whitespace in text is handled.
    #[must_use]
    pub fn with_whitespace(mut self, whitespace: WhitespaceMode) -> Self {
        self.whitespace = whitespace;
        self
    }

    /// Parse markup, falling back to the default document.
    ///
    /// `None` and empty input yield the default document. Parse errors are
    /// logged and also yield the default document.
    pub fn parse(&self, html: Option<&str>) -> Node {
        let Some(html) = html else {
            return default_document();
        };
        self.try_parse(html).unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to parse markup into document");
            default_document()
        })
    }

    /// Parse markup held in a JSON value.
    ///
    /// Values other than strings yield the default document.
    pub fn parse_value(&self, value: &Value) -> Node {
        self.parse(value.as_str())
    }

    /// Parse markup.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be tokenized or nests deeper
    /// than the configured limit.
    pub fn try_parse(&self, html: &str) -> Result<Node, ParseError> {
        if html.trim().is_empty() {
            return Ok(default_document());
        }
        let root = tokenizer::tokenize(html, self.max_depth)?;
        Ok(ModelBuilder::new(self.whitespace).build(&root))
    }
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse markup with the default parser.
///
/// # Example
///
/// ```
/// use prose_html::parse;
/// use prose_model::{Node, default_document};
///
/// assert_eq!(
///     parse(Some("<p>Hello, world!</p>")),
///     Node::doc(vec![Node::paragraph(vec![Node::text("Hello, world!")])])
/// );
/// assert_eq!(parse(None), default_document());
/// ```
pub fn parse(html: Option<&str>) -> Node {
    DEFAULT_PARSER.parse(html)
}

/// Parse markup held in a JSON value with the default parser.
pub fn parse_value(value: &Value) -> Node {
    DEFAULT_PARSER.parse_value(value)
}
