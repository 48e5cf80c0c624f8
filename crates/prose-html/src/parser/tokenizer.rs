//! Lenient HTML tokenizer built on `quick-xml`.
//!
//! The reader runs with end-name checks disabled and the tree is assembled
//! with an explicit stack, so the usual HTML shortcuts are accepted: void
//! elements without a slash, end tags closing several open elements, an
//! implicit `</p>` before a block, an implicit `</li>` before the next item,
//! and unclosed elements at the end of input.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::entities::{decode_entity, normalize_markup};
use super::tree::{Element, Markup};
use crate::error::ParseError;

/// Tag of the synthetic root wrapping the input.
const ROOT_TAG: &str = "prose-root";

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose start tag closes an open `p`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p",
    "pre", "section", "table", "ul",
];

/// Parse markup into an element tree rooted at a synthetic element.
pub(crate) fn tokenize(html: &str, max_depth: usize) -> Result<Element, ParseError> {
    let html = normalize_markup(html);
    let wrapped = format!("<{ROOT_TAG}>{html}</{ROOT_TAG}>");

    let mut reader = Reader::from_str(&wrapped);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut builder = TreeBuilder::new(max_depth);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let element = start_element(&reader, &e);
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    builder.append(element);
                } else {
                    builder.open(element)?;
                }
            }
            Event::Empty(e) => {
                let element = start_element(&reader, &e);
                builder.append(element);
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                builder.text(&text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                builder.text(&decode_entity(&entity));
            }
            Event::CData(e) => {
                builder.text(&String::from_utf8_lossy(&e));
            }
            Event::End(e) => {
                let tag = decode_name(&reader, e.name().as_ref());
                builder.close(&tag);
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    Ok(builder.finish())
}

fn start_element<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> Element {
    Element {
        tag: decode_name(reader, e.name().as_ref()),
        attrs: decode_attrs(reader, e),
        children: Vec::new(),
    }
}

/// Decode a tag or attribute name, lowercased.
fn decode_name<R: BufRead>(reader: &Reader<R>, name: &[u8]) -> String {
    let name = reader.decoder().decode(name).map_or_else(
        |_| String::from_utf8_lossy(name).into_owned(),
        std::borrow::Cow::into_owned,
    );
    name.to_ascii_lowercase()
}

fn decode_attrs<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for attr in e.html_attributes().flatten() {
        let key = decode_name(reader, attr.key.as_ref());
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.insert(key, value);
    }
    attrs
}

/// Stack of open elements; index 0 is the synthetic root.
struct TreeBuilder {
    stack: Vec<Element>,
    max_depth: usize,
}

impl TreeBuilder {
    fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    fn open(&mut self, element: Element) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            // First element is the synthetic root
            self.stack.push(element);
            return Ok(());
        }

        self.close_implied(&element.tag);
        if self.stack.len() > self.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.stack.push(element);
        Ok(())
    }

    fn append(&mut self, element: Element) {
        self.close_implied(&element.tag);
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Markup::Element(element));
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(parent) = self.stack.last_mut() {
            parent.push_text(text);
        }
    }

    /// Close the innermost open element named `tag` and everything inside it.
    ///
    /// End tags without a matching open element are ignored.
    fn close(&mut self, tag: &str) {
        if let Some(pos) = self.position(tag) {
            self.pop_to(pos);
        }
    }

    /// Close elements that the start of `tag` implicitly ends.
    fn close_implied(&mut self, tag: &str) {
        if CLOSES_PARAGRAPH.contains(&tag)
            && self.stack.last().is_some_and(|open| open.tag == "p")
        {
            self.pop_to(self.stack.len() - 1);
        }

        if tag == "li"
            && let Some(item) = self.position("li")
        {
            let list = self.position_any(&["ul", "ol"]).unwrap_or(0);
            if item > list {
                self.pop_to(item);
            }
        }
    }

    /// Position of the innermost open element named `tag`, excluding the root.
    fn position(&self, tag: &str) -> Option<usize> {
        self.stack
            .iter()
            .rposition(|open| open.tag == tag)
            .filter(|&pos| pos > 0)
    }

    fn position_any(&self, tags: &[&str]) -> Option<usize> {
        self.stack
            .iter()
            .rposition(|open| tags.contains(&open.tag.as_str()))
    }

    /// Pop elements until the stack has `len` entries, attaching each to its
    /// parent.
    fn pop_to(&mut self, len: usize) {
        while self.stack.len() > len.max(1) {
            let Some(element) = self.stack.pop() else {
                break;
            };
            if let Some(parent) = self.stack.last_mut() {
                parent.children.push(Markup::Element(element));
            }
        }
    }

    fn finish(mut self) -> Element {
        self.pop_to(1);
        self.stack.pop().unwrap_or_else(|| Element::new(ROOT_TAG))
    }
}
