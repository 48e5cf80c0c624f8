//! Plain-text projection of a document.

use serde_json::Value;

use crate::node::{Node, NodeKind};

/// Options for [`extract_plain_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// Inserted before a block node when text was emitted since the previous
    /// separator. Empty means plain concatenation.
    pub block_separator: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            block_separator: "\n\n".to_owned(),
        }
    }
}

impl TextOptions {
    /// Options that concatenate text with nothing between blocks.
    #[must_use]
    pub fn concatenated() -> Self {
        Self {
            block_separator: String::new(),
        }
    }

    /// Set the block separator.
    #[must_use]
    pub fn with_block_separator(mut self, separator: impl Into<String>) -> Self {
        self.block_separator = separator.into();
        self
    }
}

/// Concatenate the text of every text leaf in document order.
///
/// Marks are ignored and hard breaks contribute a newline. `None` yields an
/// empty string.
///
/// # Example
///
/// ```
/// use prose_model::{Node, TextOptions, extract_plain_text};
///
/// let doc = Node::doc(vec![
///     Node::paragraph(vec![Node::text("One")]),
///     Node::paragraph(vec![Node::text("Two")]),
/// ]);
/// assert_eq!(extract_plain_text(Some(&doc), &TextOptions::default()), "One\n\nTwo");
/// ```
pub fn extract_plain_text(doc: Option<&Node>, options: &TextOptions) -> String {
    let Some(doc) = doc else {
        return String::new();
    };

    let mut collector = TextCollector::new(&options.block_separator);
    // The root itself never emits a separator; start from its children.
    let mut stack: Vec<&Node> = doc.children().iter().rev().collect();
    while let Some(node) = stack.pop() {
        collector.visit(node);
        stack.extend(node.children().iter().rev());
    }
    collector.out
}

/// Plain text of a raw JSON document.
///
/// Non-objects yield an empty string. Objects that are not valid nodes are
/// reported through `tracing` and also yield an empty string.
pub fn extract_plain_text_value(value: &Value, options: &TextOptions) -> String {
    match Node::from_json(value) {
        Ok(doc) => extract_plain_text(doc.as_ref(), options),
        Err(err) => {
            tracing::error!(error = %err, "Failed to extract text from document");
            String::new()
        }
    }
}

struct TextCollector<'a> {
    out: String,
    separator: &'a str,
    separated: bool,
}

impl<'a> TextCollector<'a> {
    fn new(separator: &'a str) -> Self {
        Self {
            out: String::new(),
            separator,
            separated: true,
        }
    }

    fn visit(&mut self, node: &Node) {
        match node.kind() {
            Some(NodeKind::Text) => self.emit(node.text.as_deref().unwrap_or_default()),
            Some(NodeKind::HardBreak) => self.emit("\n"),
            Some(_) => {
                if !self.separated {
                    self.out.push_str(self.separator);
                    self.separated = true;
                }
            }
            // Unrecognized nodes are transparent
            None => {}
        }
    }

    fn emit(&mut self, text: &str) {
        if !text.is_empty() {
            self.out.push_str(text);
            self.separated = false;
        }
    }
}
