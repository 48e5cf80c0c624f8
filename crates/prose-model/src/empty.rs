//! Emptiness test for stored documents.
//!
//! A document is empty when it has no blocks, or exactly one paragraph with no
//! content. Two or more blocks are never empty, even when every block is an
//! empty paragraph.

use serde_json::Value;

use crate::node::{Node, NodeKind};

/// Check whether a document holds no user content.
///
/// `None` and documents without children are empty.
pub fn is_empty(doc: Option<&Node>) -> bool {
    let Some(doc) = doc else {
        return true;
    };
    match doc.content.as_deref() {
        None | Some([]) => true,
        Some([only]) if only.is(NodeKind::Paragraph) => only.children().is_empty(),
        Some(_) => false,
    }
}

/// Check whether a raw JSON document holds no user content.
///
/// Works on the JSON shape directly, so values that would not deserialize
/// into a [`Node`] still get an answer: non-objects and objects without a
/// `content` array are empty.
pub fn is_empty_value(value: &Value) -> bool {
    let Some(content) = value
        .as_object()
        .and_then(|doc| doc.get("content"))
        .and_then(Value::as_array)
    else {
        return true;
    };

    match content.as_slice() {
        [] => true,
        [only] if is_paragraph(only) => blank(only.get("content")),
        _ => false,
    }
}

fn is_paragraph(node: &Value) -> bool {
    node.get("type").and_then(Value::as_str) == Some(NodeKind::Paragraph.as_str())
}

/// Missing, null, or zero-length `content`.
fn blank(content: Option<&Value>) -> bool {
    match content {
        None | Some(Value::Null | Value::Bool(false)) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::node::default_document;

    #[test]
    fn test_absent_document_is_empty() {
        assert!(is_empty(None));
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("not an object")));
        assert!(is_empty_value(&json!(42)));
    }

    #[test]
    fn test_document_without_content_array() {
        assert!(is_empty(Some(&Node::new(NodeKind::Doc))));
        assert!(is_empty_value(&json!({"type": "doc"})));
        assert!(is_empty_value(&json!({"type": "doc", "content": "x"})));
    }

    #[test]
    fn test_empty_content_array() {
        assert!(is_empty(Some(&Node::doc(Vec::new()))));
        assert!(is_empty_value(&json!({"type": "doc", "content": []})));
    }

    #[test]
    fn test_single_empty_paragraph() {
        assert!(is_empty(Some(&default_document())));
        assert!(is_empty_value(&json!({
            "type": "doc",
            "content": [{"type": "paragraph", "content": []}]
        })));
        assert!(is_empty_value(&json!({
            "type": "doc",
            "content": [{"type": "paragraph"}]
        })));
    }

    #[test]
    fn test_paragraph_with_text_is_not_empty() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("hi")])]);
        assert!(!is_empty(Some(&doc)));
        assert!(!is_empty_value(&json!({
            "type": "doc",
            "content": [{"type": "paragraph", "content": [{"type": "text", "text": "hi"}]}]
        })));
    }

    #[test]
    fn test_multiple_paragraphs_are_not_empty() {
        let doc = Node::doc(vec![
            Node::paragraph(Vec::new()),
            Node::paragraph(vec![Node::text("Hello")]),
        ]);
        assert!(!is_empty(Some(&doc)));
    }

    #[test]
    fn test_multiple_empty_paragraphs_are_not_empty() {
        let doc = Node::doc(vec![Node::paragraph(Vec::new()), Node::paragraph(Vec::new())]);
        assert!(!is_empty(Some(&doc)));
        assert!(!is_empty_value(&json!({
            "type": "doc",
            "content": [{"type": "paragraph"}, {"type": "paragraph"}]
        })));
    }

    #[test]
    fn test_single_non_paragraph_block_is_not_empty() {
        let doc = Node::doc(vec![Node::horizontal_rule()]);
        assert!(!is_empty(Some(&doc)));
        assert!(!is_empty_value(&json!({"type": "doc", "content": [{"type": "heading"}]})));
    }
}
