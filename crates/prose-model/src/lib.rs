//! Rich-text document model.
//!
//! A document is a tree of [`Node`]s. Block nodes (paragraphs, headings,
//! lists) hold children in `content`; text leaves hold a `text` payload and
//! an ordered list of [`Mark`]s. The JSON form is the one stored by the
//! editor, so values deserialize straight from persisted fields.
//!
//! This crate also provides the projections that need nothing but the tree:
//! [`is_empty`] and [`extract_plain_text`]. HTML conversion lives in
//! `prose-html`.
//!
//! # Example
//!
//! ```
//! use prose_model::{Mark, Node, is_empty};
//!
//! let doc = Node::doc(vec![Node::paragraph(vec![
//!     Node::text("Bold text").with_marks(vec![Mark::bold()]),
//! ])]);
//! assert!(!is_empty(Some(&doc)));
//! ```

mod empty;
mod error;
mod node;
mod text;

pub use empty::{is_empty, is_empty_value};
pub use error::ModelError;
pub use node::{Attrs, Mark, MarkKind, Node, NodeKind, default_document};
pub use text::{TextOptions, extract_plain_text, extract_plain_text_value};
