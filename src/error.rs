//! Contract-violation errors raised by the document model.
//!
//! Malformed Markdown is never an error: parsing is total. These errors only
//! surface when a caller hands the model an impossible value.

use thiserror::Error;

use crate::document::TextRunStyle;

/// Errors returned by fallible document-model operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Header levels are limited to `1..=6`.
    #[error("header level {0} is out of range (expected 1..=6)")]
    HeaderLevelOutOfRange(usize),

    /// A character index past the end of a content buffer.
    #[error("index {index} is out of range for content of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A style set already contains this style.
    #[error("style {0:?} has already been added")]
    DuplicateStyle(TextRunStyle),
}

/// Convenience alias for results of document-model operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
