//! Markdown document model.
//!
//! This module handles:
//! - The block/inline tree produced by the parser
//! - Ordered inline style sets
//! - Canonical Markdown rendering with version-keyed caching

mod buffer;
mod inline;
mod style;
mod types;

pub use buffer::{ContentBuffer, RenderCache};
pub use style::{TextRunStyle, TextRunStyles};
pub use types::{
    Block, CodeBlock, Header, HeaderLevel, Inline, List, ListItem, MarkdownDocument, Paragraph,
    TextRun, ToMarkdown,
};
