//! Document model to HTML.
//!
//! Each node kind maps to a fixed HTML rule; unrecognized node types render
//! their children only, so content is never dropped. Text leaves are escaped
//! and wrapped by their marks in declaration order, the first mark being the
//! outermost element. Adjacent text leaves sharing leading marks share the
//! wrapping elements, so `[bold]` followed by `[bold, italic]` renders as
//! `<strong>a<em>b</em></strong>`.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::LazyLock;

use prose_model::{Mark, MarkKind, Node, NodeKind};
use serde_json::Value;

use crate::error::GenerateError;
use crate::escape::push_escaped;

/// Default nesting limit for [`MarkupGenerator`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

static DEFAULT_GENERATOR: LazyLock<MarkupGenerator> = LazyLock::new(MarkupGenerator::new);

/// Custom rendering rule for one node type.
///
/// Registered with [`MarkupGenerator::with_node_renderer`], it replaces the
/// built-in rule for that type.
///
/// # Example
///
/// ```
/// use prose_html::{GenerateError, MarkupGenerator, NodeRenderer, RenderContext};
/// use prose_model::Node;
///
/// struct Mention;
///
/// impl NodeRenderer for Mention {
///     fn render(&self, node: &Node, cx: &mut RenderContext<'_>) -> Result<(), GenerateError> {
///         cx.push_str(r#"<span class="mention">@"#);
///         cx.push_text(node.attr_str("id").unwrap_or_default());
///         cx.push_str("</span>");
///         Ok(())
///     }
/// }
///
/// let generator = MarkupGenerator::new().with_node_renderer("mention", Mention);
/// let doc = Node::doc(vec![Node::paragraph(vec![Node::new("mention").with_attr("id", "ann")])]);
/// assert_eq!(
///     generator.generate(Some(&doc)),
///     r#"<p><span class="mention">@ann</span></p>"#
/// );
/// ```
pub trait NodeRenderer: Send + Sync {
    /// Append the markup for `node` to the context.
    fn render(&self, node: &Node, cx: &mut RenderContext<'_>) -> Result<(), GenerateError>;
}

/// Output handle passed to [`NodeRenderer`]s.
pub struct RenderContext<'a> {
    generator: &'a MarkupGenerator,
    out: &'a mut String,
    depth: usize,
}

impl RenderContext<'_> {
    /// Append raw markup.
    pub fn push_str(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    /// Append text, escaped.
    pub fn push_text(&mut self, text: &str) {
        push_escaped(self.out, text);
    }

    /// Render the children of `node` with the generator's rules.
    pub fn render_children(&mut self, node: &Node) -> Result<(), GenerateError> {
        self.generator.render_children(node, self.out, self.depth)
    }
}

/// HTML generator with an extensible rule table.
pub struct MarkupGenerator {
    renderers: HashMap<String, Box<dyn NodeRenderer>>,
    max_depth: usize,
}

impl MarkupGenerator {
    /// Create a generator with the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth accepted before generation fails.
    ///
    /// The root is at depth 0 and text leaves count as one level. Rendering
    /// recurses once per level, so limits above 1024 need a larger stack
    /// than the 8 MiB main thread provides in debug builds.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register a renderer for `node_type`, replacing any built-in rule.
    #[must_use]
    pub fn with_node_renderer<R: NodeRenderer + 'static>(
        mut self,
        node_type: impl Into<String>,
        renderer: R,
    ) -> Self {
        self.renderers.insert(node_type.into(), Box::new(renderer));
        self
    }

    /// Generate markup, falling back to an empty string.
    ///
    /// `None` yields an empty string. Generation errors are logged and also
    /// yield an empty string.
    pub fn generate(&self, doc: Option<&Node>) -> String {
        let Some(doc) = doc else {
            return String::new();
        };
        self.try_generate(doc).unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to generate markup from document");
            String::new()
        })
    }

    /// Generate markup from raw JSON, falling back to an empty string.
    ///
    /// Non-object values (null, strings, numbers, arrays) yield an empty
    /// string without logging.
    pub fn generate_value(&self, value: &Value) -> String {
        self.try_generate_value(value).unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to generate markup from document");
            String::new()
        })
    }

    /// Generate markup.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a document, the tree is nested
    /// too deeply, or a registered renderer fails.
    pub fn try_generate(&self, doc: &Node) -> Result<String, GenerateError> {
        if !doc.is(NodeKind::Doc) {
            return Err(GenerateError::NotADocument {
                found: doc.node_type.clone(),
            });
        }
        let mut out = String::with_capacity(1024);
        self.render_node(doc, &mut out, 0)?;
        Ok(out)
    }

    /// Generate markup from raw JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is an object that is not a valid
    /// document, or for any [`try_generate`](Self::try_generate) failure.
    pub fn try_generate_value(&self, value: &Value) -> Result<String, GenerateError> {
        match Node::from_json(value)? {
            Some(doc) => self.try_generate(&doc),
            None => Ok(String::new()),
        }
    }

    fn render_node(
        &self,
        node: &Node,
        out: &mut String,
        depth: usize,
    ) -> Result<(), GenerateError> {
        if depth > self.max_depth {
            return Err(GenerateError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        if let Some(renderer) = self.renderers.get(&node.node_type) {
            let mut cx = RenderContext {
                generator: self,
                out,
                depth,
            };
            return renderer.render(node, &mut cx);
        }

        let Some(kind) = node.kind() else {
            tracing::debug!(node_type = %node.node_type, "Rendering children of unknown node type");
            return self.render_children(node, out, depth);
        };

        match kind {
            NodeKind::Doc => self.render_children(node, out, depth)?,
            NodeKind::Paragraph => self.wrap("p", node, out, depth)?,
            NodeKind::Heading => {
                let level = heading_level(node);
                write!(out, "<h{level}>")?;
                self.render_children(node, out, depth)?;
                write!(out, "</h{level}>")?;
            }
            NodeKind::BulletList => self.wrap("ul", node, out, depth)?,
            NodeKind::OrderedList => {
                match node.attr_u64("start") {
                    Some(start) if start != 1 => write!(out, r#"<ol start="{start}">"#)?,
                    _ => out.push_str("<ol>"),
                }
                self.render_children(node, out, depth)?;
                out.push_str("</ol>");
            }
            NodeKind::ListItem => self.wrap("li", node, out, depth)?,
            NodeKind::Blockquote => self.wrap("blockquote", node, out, depth)?,
            NodeKind::CodeBlock => code_block(node, out),
            NodeKind::HorizontalRule => out.push_str("<hr>"),
            NodeKind::HardBreak => out.push_str("<br>"),
            // Marks are opened by the parent, shared across adjacent leaves
            NodeKind::Text => push_escaped(out, node.text.as_deref().unwrap_or_default()),
        }
        Ok(())
    }

    fn wrap(
        &self,
        tag: &str,
        node: &Node,
        out: &mut String,
        depth: usize,
    ) -> Result<(), GenerateError> {
        write!(out, "<{tag}>")?;
        self.render_children(node, out, depth)?;
        write!(out, "</{tag}>")?;
        Ok(())
    }

    /// Render children, sharing mark elements between adjacent text leaves.
    fn render_children(
        &self,
        node: &Node,
        out: &mut String,
        depth: usize,
    ) -> Result<(), GenerateError> {
        let custom_text = self.renderers.contains_key(NodeKind::Text.as_str());
        let mut open: Vec<&Mark> = Vec::new();

        for child in node.children() {
            if child.is(NodeKind::Text) && !custom_text {
                sync_marks(&mut open, child.marks(), out);
            } else {
                close_marks(&mut open, 0, out);
            }
            self.render_node(child, out, depth + 1)?;
        }
        close_marks(&mut open, 0, out);
        Ok(())
    }
}

impl Default for MarkupGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate markup with the built-in rules.
///
/// # Example
///
/// ```
/// use prose_html::generate;
/// use prose_model::Node;
///
/// let doc = Node::doc(vec![Node::paragraph(vec![Node::text("Hello, world!")])]);
/// assert_eq!(generate(Some(&doc)), "<p>Hello, world!</p>");
/// assert_eq!(generate(None), "");
/// ```
pub fn generate(doc: Option<&Node>) -> String {
    DEFAULT_GENERATOR.generate(doc)
}

/// Generate markup from raw JSON with the built-in rules.
pub fn generate_value(value: &Value) -> String {
    DEFAULT_GENERATOR.generate_value(value)
}

/// Heading level from `attrs.level`, clamped to 1-6.
fn heading_level(node: &Node) -> u64 {
    node.attr_u64("level").map_or(1, |level| level.clamp(1, 6))
}

fn code_block(node: &Node, out: &mut String) {
    out.push_str("<pre><code");
    if let Some(language) = node.attr_str("language").filter(|l| !l.is_empty()) {
        out.push_str(r#" class="language-"#);
        push_escaped(out, language);
        out.push('"');
    }
    out.push('>');
    for child in node.children() {
        push_escaped(out, child.text.as_deref().unwrap_or_default());
    }
    out.push_str("</code></pre>");
}

/// Element name for a mark, or `None` if the mark renders no element.
fn mark_tag(mark: &Mark) -> Option<&'static str> {
    match mark.kind()? {
        MarkKind::Bold => Some("strong"),
        MarkKind::Italic => Some("em"),
        MarkKind::Code => Some("code"),
        MarkKind::Strike => Some("s"),
        MarkKind::Underline => Some("u"),
        MarkKind::Link => mark.attr_str("href").map(|_| "a"),
    }
}

/// Close open marks that `marks` does not share, then open the rest.
fn sync_marks<'m>(open: &mut Vec<&'m Mark>, marks: &'m [Mark], out: &mut String) {
    let shared = open
        .iter()
        .zip(marks)
        .take_while(|(current, next)| **current == *next)
        .count();
    close_marks(open, shared, out);

    for mark in &marks[shared..] {
        open_mark(mark, out);
        open.push(mark);
    }
}

/// Close open marks until `keep` remain.
fn close_marks(open: &mut Vec<&Mark>, keep: usize, out: &mut String) {
    while open.len() > keep {
        let Some(mark) = open.pop() else {
            break;
        };
        if let Some(tag) = mark_tag(mark) {
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn open_mark(mark: &Mark, out: &mut String) {
    let Some(tag) = mark_tag(mark) else {
        return;
    };
    out.push('<');
    out.push_str(tag);
    if tag == "a" {
        for key in ["href", "target", "rel"] {
            if let Some(value) = mark.attr_str(key) {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                push_escaped(out, value);
                out.push('"');
            }
        }
    }
    out.push('>');
}
