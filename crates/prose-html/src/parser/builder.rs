//! Element tree to document model.

use prose_model::{Mark, Node, NodeKind, default_document};

use super::WhitespaceMode;
use super::tree::{Element, Markup};

/// Elements whose content is dropped entirely.
const IGNORED_ELEMENTS: &[&str] = &["head", "script", "style", "template", "title"];

/// Unknown elements that still separate the inline content around them.
const BLOCK_BOUNDARIES: &[&str] = &[
    "address", "article", "aside", "body", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "header", "html", "main", "nav", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Maps element trees to document nodes.
pub(crate) struct ModelBuilder {
    whitespace: WhitespaceMode,
}

impl ModelBuilder {
    pub fn new(whitespace: WhitespaceMode) -> Self {
        Self { whitespace }
    }

    /// Build a document from the synthetic root element.
    pub fn build(&self, root: &Element) -> Node {
        let blocks = self.blocks(&root.children);
        if blocks.is_empty() {
            default_document()
        } else {
            Node::doc(blocks)
        }
    }

    /// Block content of a container; loose inline content becomes paragraphs.
    fn blocks<'m>(&self, children: impl IntoIterator<Item = &'m Markup>) -> Vec<Node> {
        let mut blocks = Vec::new();
        let mut run = InlineRun::new(self.whitespace);
        for child in children {
            self.block_child(child, &mut blocks, &mut run);
        }
        run.flush_paragraph(&mut blocks);
        blocks
    }

    fn block_child(&self, child: &Markup, blocks: &mut Vec<Node>, run: &mut InlineRun) {
        let element = match child {
            Markup::Text(text) => {
                run.push_text(text, &[]);
                return;
            }
            Markup::Element(element) => element,
        };
        let tag = element.tag.as_str();

        if IGNORED_ELEMENTS.contains(&tag) {
            return;
        }

        if let Some(block) = self.block(element) {
            run.flush_paragraph(blocks);
            blocks.push(block);
            return;
        }

        if tag == "br" || mark_for(element).is_some() {
            self.inline(element, &[], run);
            return;
        }

        // Unknown element: transparent, but block-level ones end the current paragraph
        let boundary = BLOCK_BOUNDARIES.contains(&tag);
        if boundary {
            run.flush_paragraph(blocks);
        }
        for grandchild in &element.children {
            self.block_child(grandchild, blocks, run);
        }
        if boundary {
            run.flush_paragraph(blocks);
        }
    }

    /// Block node for a recognized block element.
    fn block(&self, element: &Element) -> Option<Node> {
        let node = match element.tag.as_str() {
            "p" => Node::paragraph(self.inline_content(&element.children)),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = element.tag[1..].parse().unwrap_or(1);
                Node::heading(level, self.inline_content(&element.children))
            }
            "ul" => Node::bullet_list(self.list_items(element)),
            "ol" => {
                let start = element
                    .attr("start")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(1);
                Node::ordered_list(start, self.list_items(element))
            }
            // A list item outside any list gets a list of its own
            "li" => Node::bullet_list(vec![self.list_item(&element.children)]),
            "blockquote" => Node::blockquote(non_empty(self.blocks(&element.children))),
            "pre" => code_block(element),
            "hr" => Node::horizontal_rule(),
            _ => return None,
        };
        Some(node)
    }

    fn list_items(&self, list: &Element) -> Vec<Node> {
        let mut items = Vec::new();
        let mut loose: Vec<&Markup> = Vec::new();

        for child in &list.children {
            match child {
                Markup::Element(element) if element.tag == "li" => {
                    self.flush_loose_item(&mut loose, &mut items);
                    items.push(self.list_item(&element.children));
                }
                other => loose.push(other),
            }
        }
        self.flush_loose_item(&mut loose, &mut items);
        items
    }

    /// Wrap content found directly inside a list into an item of its own.
    fn flush_loose_item(&self, loose: &mut Vec<&Markup>, items: &mut Vec<Node>) {
        if loose.is_empty() {
            return;
        }
        let blocks = self.blocks(loose.drain(..));
        if !blocks.is_empty() {
            items.push(Node::list_item(blocks));
        }
    }

    fn list_item(&self, children: &[Markup]) -> Node {
        Node::list_item(non_empty(self.blocks(children)))
    }

    fn inline_content(&self, children: &[Markup]) -> Vec<Node> {
        let mut run = InlineRun::new(self.whitespace);
        for child in children {
            match child {
                Markup::Text(text) => run.push_text(text, &[]),
                Markup::Element(element) => self.inline(element, &[], &mut run),
            }
        }
        run.finish()
    }

    /// Inline content of `element` under the enclosing `marks`.
    ///
    /// Any element that is neither a mark nor a hard break is transparent
    /// here, block elements included.
    fn inline(&self, element: &Element, marks: &[Mark], run: &mut InlineRun) {
        let tag = element.tag.as_str();
        if IGNORED_ELEMENTS.contains(&tag) {
            return;
        }
        if tag == "br" {
            run.push_node(Node::hard_break());
            return;
        }

        let nested: Vec<Mark>;
        let marks = match mark_for(element) {
            Some(mark) if !marks.iter().any(|m| m.mark_type == mark.mark_type) => {
                nested = marks.iter().cloned().chain([mark]).collect();
                nested.as_slice()
            }
            _ => marks,
        };

        for child in &element.children {
            match child {
                Markup::Text(text) => run.push_text(text, marks),
                Markup::Element(child) => self.inline(child, marks, run),
            }
        }
    }
}

/// Mark applied by an inline element, if any.
fn mark_for(element: &Element) -> Option<Mark> {
    match element.tag.as_str() {
        "strong" | "b" => Some(Mark::bold()),
        "em" | "i" => Some(Mark::italic()),
        "code" => Some(Mark::code()),
        "s" | "strike" | "del" => Some(Mark::strike()),
        "u" => Some(Mark::underline()),
        "a" => {
            let href = element.attr("href")?;
            let mut mark = Mark::link(href);
            for key in ["target", "rel"] {
                if let Some(value) = element.attr(key) {
                    mark = mark.with_attr(key, value);
                }
            }
            Some(mark)
        }
        _ => None,
    }
}

/// Code block from a `pre` element. Content is taken verbatim.
fn code_block(pre: &Element) -> Node {
    let language = pre.class_suffix("language-").or_else(|| {
        pre.children.iter().find_map(|child| match child {
            Markup::Element(code) if code.tag == "code" => code.class_suffix("language-"),
            _ => None,
        })
    });

    let mut text = pre.text_content();
    // Only a newline directly after the `<pre>` start tag is not content
    if matches!(pre.children.first(), Some(Markup::Text(first)) if first.starts_with('\n')) {
        text.remove(0);
    }
    Node::code_block(language, text)
}

/// Containers must hold at least one block.
fn non_empty(blocks: Vec<Node>) -> Vec<Node> {
    if blocks.is_empty() {
        vec![Node::paragraph(Vec::new())]
    } else {
        blocks
    }
}

/// Accumulates inline nodes, applying whitespace rules and merging adjacent
/// text with identical marks.
struct InlineRun {
    nodes: Vec<Node>,
    whitespace: WhitespaceMode,
    /// Whether the last emitted character was collapsible space, or nothing
    /// has been emitted on this line yet.
    after_space: bool,
}

impl InlineRun {
    fn new(whitespace: WhitespaceMode) -> Self {
        Self {
            nodes: Vec::new(),
            whitespace,
            after_space: true,
        }
    }

    fn push_text(&mut self, raw: &str, marks: &[Mark]) {
        let text = match self.whitespace {
            WhitespaceMode::Preserve => raw.to_owned(),
            WhitespaceMode::Collapse => self.collapse(raw),
        };
        if text.is_empty() {
            return;
        }

        if let Some(last) = self.nodes.last_mut()
            && last.is(NodeKind::Text)
            && last.marks() == marks
            && let Some(existing) = last.text.as_mut()
        {
            existing.push_str(&text);
            return;
        }

        let node = Node::text(text);
        self.nodes.push(if marks.is_empty() {
            node
        } else {
            node.with_marks(marks.to_vec())
        });
    }

    fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
        self.after_space = true;
    }

    /// Collapse whitespace runs to one space, dropping space at line start.
    fn collapse(&mut self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            if matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000c}') {
                if !self.after_space {
                    out.push(' ');
                    self.after_space = true;
                }
            } else {
                out.push(c);
                self.after_space = false;
            }
        }
        out
    }

    /// Take the accumulated nodes, trimming trailing collapsed space.
    fn finish(&mut self) -> Vec<Node> {
        if self.whitespace == WhitespaceMode::Collapse
            && let Some(last) = self.nodes.last_mut()
            && let Some(text) = last.text.as_mut()
            && text.ends_with(' ')
        {
            text.pop();
            if text.is_empty() {
                self.nodes.pop();
            }
        }
        self.after_space = true;
        std::mem::take(&mut self.nodes)
    }

    /// Wrap accumulated content in a paragraph, unless it is only whitespace.
    fn flush_paragraph(&mut self, blocks: &mut Vec<Node>) {
        let nodes = self.finish();
        let blank = nodes.iter().all(|node| {
            node.is(NodeKind::Text) && node.text.as_deref().is_none_or(|t| t.trim().is_empty())
        });
        if !blank {
            blocks.push(Node::paragraph(nodes));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::tokenizer::tokenize;

    fn build(html: &str) -> Node {
        let root = tokenize(html, 64).unwrap();
        ModelBuilder::new(WhitespaceMode::Collapse).build(&root)
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(
            build("<p>Hello, world!</p>"),
            Node::doc(vec![Node::paragraph(vec![Node::text("Hello, world!")])])
        );
    }

    #[test]
    fn test_nested_marks_keep_order() {
        assert_eq!(
            build("<p><strong><em>x</em></strong></p>"),
            Node::doc(vec![Node::paragraph(vec![
                Node::text("x").with_marks(vec![Mark::bold(), Mark::italic()]),
            ])])
        );
    }

    #[test]
    fn test_mark_aliases() {
        let doc = build("<p><b>1</b><i>2</i><del>3</del><strike>4</strike></p>");
        let marks: Vec<&str> = doc.children()[0]
            .children()
            .iter()
            .map(|node| node.marks()[0].mark_type.as_str())
            .collect();
        assert_eq!(marks, ["bold", "italic", "strike", "strike"]);
    }

    #[test]
    fn test_adjacent_text_with_same_marks_merges() {
        assert_eq!(
            build("<p><strong>a</strong><b>b</b>c</p>"),
            Node::doc(vec![Node::paragraph(vec![
                Node::text("ab").with_marks(vec![Mark::bold()]),
                Node::text("c"),
            ])])
        );
    }

    #[test]
    fn test_repeated_mark_applied_once() {
        assert_eq!(
            build("<p><strong><b>x</b></strong></p>"),
            Node::doc(vec![Node::paragraph(vec![
                Node::text("x").with_marks(vec![Mark::bold()]),
            ])])
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            build(r#"<p><a href="/docs" target="_blank">docs</a> <a>plain</a></p>"#),
            Node::doc(vec![Node::paragraph(vec![
                Node::text("docs")
                    .with_marks(vec![Mark::link("/docs").with_attr("target", "_blank")]),
                Node::text(" plain"),
            ])])
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(
            build("\n  <p>\n   a   <em>b</em>\n  c  </p>\n"),
            Node::doc(vec![Node::paragraph(vec![
                Node::text("a "),
                Node::text("b").with_marks(vec![Mark::italic()]),
                Node::text(" c"),
            ])])
        );
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(
            build("<p>a<br> b</p>"),
            Node::doc(vec![Node::paragraph(vec![
                Node::text("a"),
                Node::hard_break(),
                Node::text("b"),
            ])])
        );
    }

    #[test]
    fn test_loose_text_becomes_paragraph() {
        assert_eq!(
            build("plain <strong>text</strong>"),
            Node::doc(vec![Node::paragraph(vec![
                Node::text("plain "),
                Node::text("text").with_marks(vec![Mark::bold()]),
            ])])
        );
    }

    #[test]
    fn test_divs_separate_paragraphs() {
        assert_eq!(
            build("<div>one</div><div>two</div>"),
            Node::doc(vec![
                Node::paragraph(vec![Node::text("one")]),
                Node::paragraph(vec![Node::text("two")]),
            ])
        );
    }

    #[test]
    fn test_span_is_transparent() {
        assert_eq!(
            build(r#"<p>a<span class="x">b</span>c</p>"#),
            Node::doc(vec![Node::paragraph(vec![Node::text("abc")])])
        );
    }

    #[test]
    fn test_script_and_style_dropped() {
        assert_eq!(
            build("<style>p{}</style><p>x</p><script>alert(1)</script>"),
            Node::doc(vec![Node::paragraph(vec![Node::text("x")])])
        );
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            build("<h1>A</h1><h3>B</h3>"),
            Node::doc(vec![
                Node::heading(1, vec![Node::text("A")]),
                Node::heading(3, vec![Node::text("B")]),
            ])
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            build("<ul><li><p>a</p></li><li>b<ol start=\"2\"><li>c</li></ol></li></ul>"),
            Node::doc(vec![Node::bullet_list(vec![
                Node::list_item(vec![Node::paragraph(vec![Node::text("a")])]),
                Node::list_item(vec![
                    Node::paragraph(vec![Node::text("b")]),
                    Node::ordered_list(2, vec![Node::list_item(vec![Node::paragraph(vec![
                        Node::text("c"),
                    ])])]),
                ]),
            ])])
        );
    }

    #[test]
    fn test_empty_list_item_gets_paragraph() {
        assert_eq!(
            build("<ul><li></li></ul>"),
            Node::doc(vec![Node::bullet_list(vec![Node::list_item(vec![
                Node::paragraph(Vec::new()),
            ])])])
        );
    }

    #[test]
    fn test_loose_list_content_gets_item() {
        assert_eq!(
            build("<ul>\n  <li>a</li>\n  stray\n</ul>"),
            Node::doc(vec![Node::bullet_list(vec![
                Node::list_item(vec![Node::paragraph(vec![Node::text("a")])]),
                Node::list_item(vec![Node::paragraph(vec![Node::text("stray")])]),
            ])])
        );
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            build("<pre><code class=\"language-rust\">fn main() {\n    a &lt; b\n}</code></pre>"),
            Node::doc(vec![Node::code_block(Some("rust"), "fn main() {\n    a < b\n}")])
        );
        assert_eq!(
            build("<pre>\nplain  text</pre>"),
            Node::doc(vec![Node::code_block(None, "plain  text")])
        );
        assert_eq!(
            build("<pre><code>\nleading</code></pre>"),
            Node::doc(vec![Node::code_block(None, "\nleading")])
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            build("<blockquote>quoted</blockquote><hr>"),
            Node::doc(vec![
                Node::blockquote(vec![Node::paragraph(vec![Node::text("quoted")])]),
                Node::horizontal_rule(),
            ])
        );
    }

    #[test]
    fn test_empty_markup_is_default_document() {
        assert_eq!(build("   \n "), default_document());
        assert_eq!(build("<div></div>"), default_document());
    }

    #[test]
    fn test_preserve_whitespace() {
        let root = tokenize("<p>  a  b </p>", 64).unwrap();
        let doc = ModelBuilder::new(WhitespaceMode::Preserve).build(&root);
        assert_eq!(
            doc,
            Node::doc(vec![Node::paragraph(vec![Node::text("  a  b ")])])
        );
    }
}
