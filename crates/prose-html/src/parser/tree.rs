//! Element tree produced by the tokenizer.

use std::collections::HashMap;

/// Element in the parsed markup tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes, values unescaped.
    pub attrs: HashMap<String, String>,
    /// Child elements and text, in document order.
    pub children: Vec<Markup>,
}

/// Content of an element.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Markup {
    Element(Element),
    Text(String),
}

impl Element {
    /// Create an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Append text, merging with a preceding text child.
    pub fn push_text(&mut self, text: &str) {
        if let Some(Markup::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Markup::Text(text.to_owned()));
        }
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Suffix of the first class starting with `prefix`.
    pub fn class_suffix(&self, prefix: &str) -> Option<&str> {
        self.attr("class")?
            .split_ascii_whitespace()
            .find_map(|class| class.strip_prefix(prefix))
            .filter(|suffix| !suffix.is_empty())
    }
}

fn collect_text(children: &[Markup], out: &mut String) {
    for child in children {
        match child {
            Markup::Text(text) => out.push_str(text),
            Markup::Element(element) => collect_text(&element.children, out),
        }
    }
}
