//! Document tree types.
//!
//! The JSON shape mirrors the editor's stored document format:
//!
//! ```json
//! {"type": "doc", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Hi"}]}]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModelError;

/// Node or mark attributes.
pub type Attrs = Map<String, Value>;

/// Node kinds with built-in conversion rules.
///
/// Any other discriminant is still a valid [`Node`]; consumers fall back to
/// treating it as a transparent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Blockquote,
    HorizontalRule,
    HardBreak,
    Text,
}

impl NodeKind {
    /// Look up a kind by its stored discriminant.
    #[must_use]
    pub fn from_type(name: &str) -> Option<Self> {
        Some(match name {
            "doc" => Self::Doc,
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "bulletList" => Self::BulletList,
            "orderedList" => Self::OrderedList,
            "listItem" => Self::ListItem,
            "codeBlock" => Self::CodeBlock,
            "blockquote" => Self::Blockquote,
            "horizontalRule" => Self::HorizontalRule,
            "hardBreak" => Self::HardBreak,
            "text" => Self::Text,
            _ => return None,
        })
    }

    /// Stored discriminant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::BulletList => "bulletList",
            Self::OrderedList => "orderedList",
            Self::ListItem => "listItem",
            Self::CodeBlock => "codeBlock",
            Self::Blockquote => "blockquote",
            Self::HorizontalRule => "horizontalRule",
            Self::HardBreak => "hardBreak",
            Self::Text => "text",
        }
    }

    /// Whether nodes of this kind live inside paragraphs and headings.
    #[must_use]
    pub const fn is_inline(self) -> bool {
        matches!(self, Self::Text | Self::HardBreak)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// Mark kinds with built-in conversion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    Code,
    Strike,
    Underline,
    Link,
}

impl MarkKind {
    /// Look up a kind by its stored discriminant.
    #[must_use]
    pub fn from_type(name: &str) -> Option<Self> {
        Some(match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "code" => Self::Code,
            "strike" => Self::Strike,
            "underline" => Self::Underline,
            "link" => Self::Link,
            _ => return None,
        })
    }

    /// Stored discriminant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Code => "code",
            Self::Strike => "strike",
            Self::Underline => "underline",
            Self::Link => "link",
        }
    }
}

impl From<MarkKind> for String {
    fn from(kind: MarkKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// Inline formatting applied to a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// Mark discriminant (`bold`, `italic`, `link`, ...).
    #[serde(rename = "type")]
    pub mark_type: String,
    /// Mark-specific parameters, e.g. `href` for links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl Mark {
    /// Create a mark without attributes.
    #[must_use]
    pub fn new(mark_type: impl Into<String>) -> Self {
        Self {
            mark_type: mark_type.into(),
            attrs: None,
        }
    }

    #[must_use]
    pub fn bold() -> Self {
        Self::new(MarkKind::Bold)
    }

    #[must_use]
    pub fn italic() -> Self {
        Self::new(MarkKind::Italic)
    }

    #[must_use]
    pub fn code() -> Self {
        Self::new(MarkKind::Code)
    }

    #[must_use]
    pub fn strike() -> Self {
        Self::new(MarkKind::Strike)
    }

    #[must_use]
    pub fn underline() -> Self {
        Self::new(MarkKind::Underline)
    }

    /// Create a link mark pointing at `href`.
    #[must_use]
    pub fn link(href: impl Into<String>) -> Self {
        Self::new(MarkKind::Link).with_attr("href", href.into())
    }

    /// Set a single attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Built-in kind, or `None` for an unrecognized discriminant.
    #[must_use]
    pub fn kind(&self) -> Option<MarkKind> {
        MarkKind::from_type(&self.mark_type)
    }

    /// String attribute value. `null` and non-string values read as absent.
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(key)?.as_str()
    }
}

/// One element of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node discriminant (`doc`, `paragraph`, `text`, ...).
    #[serde(rename = "type")]
    pub node_type: String,
    /// Node-specific parameters, e.g. `level` for headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    /// Child nodes. Absent on leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    /// Text payload of text leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Formatting of text leaves, outermost first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
}

impl Node {
    /// Create a bare node of the given type.
    #[must_use]
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: None,
            content: None,
            text: None,
            marks: None,
        }
    }

    /// Document root.
    #[must_use]
    pub fn doc(content: Vec<Node>) -> Self {
        Self::new(NodeKind::Doc).with_content(content)
    }

    #[must_use]
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph).with_content(content)
    }

    #[must_use]
    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Self::new(NodeKind::Heading)
            .with_attr("level", level)
            .with_content(content)
    }

    #[must_use]
    pub fn bullet_list(items: Vec<Node>) -> Self {
        Self::new(NodeKind::BulletList).with_content(items)
    }

    #[must_use]
    pub fn ordered_list(start: u64, items: Vec<Node>) -> Self {
        Self::new(NodeKind::OrderedList)
            .with_attr("start", start)
            .with_content(items)
    }

    #[must_use]
    pub fn list_item(content: Vec<Node>) -> Self {
        Self::new(NodeKind::ListItem).with_content(content)
    }

    /// Code block holding `code` verbatim.
    #[must_use]
    pub fn code_block(language: Option<&str>, code: impl Into<String>) -> Self {
        let code = code.into();
        let content = if code.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(code)]
        };
        Self::new(NodeKind::CodeBlock)
            .with_attr("language", language.map_or(Value::Null, Value::from))
            .with_content(content)
    }

    #[must_use]
    pub fn blockquote(content: Vec<Node>) -> Self {
        Self::new(NodeKind::Blockquote).with_content(content)
    }

    #[must_use]
    pub fn horizontal_rule() -> Self {
        Self::new(NodeKind::HorizontalRule)
    }

    #[must_use]
    pub fn hard_break() -> Self {
        Self::new(NodeKind::HardBreak)
    }

    /// Text leaf without marks.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeKind::Text)
        }
    }

    /// Set a single attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = Some(content);
        self
    }

    /// Set marks, outermost first.
    #[must_use]
    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = Some(marks);
        self
    }

    /// Read a node from arbitrary JSON.
    ///
    /// Returns `Ok(None)` for values that are not objects (null, strings,
    /// numbers, arrays), which callers treat as an absent document.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is an object that is not a valid node.
    pub fn from_json(value: &Value) -> Result<Option<Self>, ModelError> {
        if !value.is_object() {
            return Ok(None);
        }
        Ok(Some(Self::deserialize(value)?))
    }

    /// Built-in kind, or `None` for an unrecognized discriminant.
    #[must_use]
    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::from_type(&self.node_type)
    }

    /// Whether this node has the given built-in kind.
    #[must_use]
    pub fn is(&self, kind: NodeKind) -> bool {
        self.node_type == kind.as_str()
    }

    /// Children, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Marks, empty when absent.
    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or_default()
    }

    /// Raw attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(key)
    }

    /// String attribute value. `null` and non-string values read as absent.
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)?.as_str()
    }

    /// Unsigned integer attribute value, also accepting numeric strings.
    #[must_use]
    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        match self.attr(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// The document used whenever no usable input exists: a root holding one
/// empty paragraph.
#[must_use]
pub fn default_document() -> Node {
    Node::doc(vec![Node::paragraph(Vec::new())])
}
