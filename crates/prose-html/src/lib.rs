//! HTML conversion for prose documents.
//!
//! [`generate`] turns a document tree into HTML and [`parse`] turns HTML back
//! into a tree. Both are total: malformed input is logged through `tracing`
//! and replaced by a fallback (an empty string, or the default document), so
//! callers rendering stored content never see an error. The `try_*` methods
//! on [`MarkupGenerator`] and [`MarkupParser`] expose the errors instead.
//!
//! Markup produced by [`generate`] regenerates unchanged after a [`parse`].
//! The parsed tree equals the original unless text has leading, trailing or
//! repeated whitespace, which the default [`WhitespaceMode::Collapse`]
//! normalizes as a browser would; [`WhitespaceMode::Preserve`] keeps it.
//!
//! # Example
//!
//! ```
//! use prose_html::{generate, parse};
//! use prose_model::{Mark, Node};
//!
//! let doc = Node::doc(vec![Node::paragraph(vec![
//!     Node::text("Bold text").with_marks(vec![Mark::bold()]),
//! ])]);
//! let html = generate(Some(&doc));
//! assert_eq!(html, "<p><strong>Bold text</strong></p>");
//! assert_eq!(parse(Some(&html)), doc);
//! ```

mod error;
mod escape;
mod generator;
mod parser;
mod render;

pub use error::{GenerateError, ParseError};
pub use escape::escape_html;
pub use generator::{
    DEFAULT_MAX_DEPTH, MarkupGenerator, NodeRenderer, RenderContext, generate, generate_value,
};
pub use parser::{MarkupParser, WhitespaceMode, parse, parse_value};
pub use render::{render_with_class, render_with_class_value};
