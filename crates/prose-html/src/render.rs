//! Rendering for display containers.

use prose_model::Node;
use serde_json::Value;

use crate::escape::push_escaped;
use crate::generator::{MarkupGenerator, generate, generate_value};

/// Generate markup and wrap it in a `div` carrying `css_class`.
///
/// A missing or empty class returns the generated markup unchanged.
///
/// # Example
///
/// ```
/// use prose_html::render_with_class;
/// use prose_model::Node;
///
/// let doc = Node::doc(vec![Node::paragraph(vec![Node::text("Test content")])]);
/// assert_eq!(
///     render_with_class(Some(&doc), Some("my-class")),
///     r#"<div class="my-class"><p>Test content</p></div>"#
/// );
/// assert_eq!(render_with_class(Some(&doc), None), "<p>Test content</p>");
/// ```
pub fn render_with_class(doc: Option<&Node>, css_class: Option<&str>) -> String {
    wrap_in_class(generate(doc), css_class)
}

/// [`render_with_class`] for a raw JSON document.
pub fn render_with_class_value(value: &Value, css_class: Option<&str>) -> String {
    wrap_in_class(generate_value(value), css_class)
}

impl MarkupGenerator {
    /// [`render_with_class`] using this generator's rules.
    pub fn render_with_class(&self, doc: Option<&Node>, css_class: Option<&str>) -> String {
        wrap_in_class(self.generate(doc), css_class)
    }

    /// [`render_with_class_value`] using this generator's rules.
    pub fn render_with_class_value(&self, value: &Value, css_class: Option<&str>) -> String {
        wrap_in_class(self.generate_value(value), css_class)
    }
}

fn wrap_in_class(html: String, css_class: Option<&str>) -> String {
    let Some(class) = css_class.filter(|c| !c.is_empty()) else {
        return html;
    };
    let mut out = String::with_capacity(html.len() + class.len() + 19);
    out.push_str(r#"<div class=""#);
    push_escaped(&mut out, class);
    out.push_str(r#"">"#);
    out.push_str(&html);
    out.push_str("</div>");
    out
}
