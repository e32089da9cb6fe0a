// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. presentation::PresentationDocument)
    clippy::module_name_repetitions
)]

//! # mdsync
//!
//! Streaming Markdown parsing with a live, styled presentation tree.
//!
//! mdsync turns Markdown text into a document model and keeps a mutable
//! presentation tree in sync with it:
//! - Total, character-at-a-time parsing (malformed input is never an error)
//! - Canonical Markdown re-serialization that round-trips through the parser
//! - A reconciler that updates the tree in place, preserving node identity
//! - Live re-styling of edited text (`**bold**`, `^sup^`, header and list
//!   creation while typing)
//!
//! ## Modules
//!
//! - [`document`]: Document model and Markdown rendering
//! - [`parser`]: Streaming tokenizer and parse context
//! - [`presentation`]: Presentation tree and reconciler
//! - [`restyle`]: Delimiter-pair styling and typing-driven edits
//! - [`config`]: Typography configuration
//! - [`watcher`]: Reparse on file change

pub mod config;
pub mod document;
pub mod error;
pub mod parser;
pub mod perf;
pub mod presentation;
pub mod restyle;
pub mod watcher;

pub use parser::parse;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::MarkdownConfig;
    pub use crate::document::{Block, MarkdownDocument, ToMarkdown};
    pub use crate::parser::parse;
    pub use crate::presentation::{PresentationDocument, reconcile};
    pub use crate::restyle::{Caret, handle_text_changed};
}
