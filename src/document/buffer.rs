//! Versioned text storage shared by headers, code blocks and text runs.

use std::cell::RefCell;

use crate::error::{DocumentError, Result};

/// Mutable text content with a monotonic version counter.
///
/// Every mutation bumps the version, which lets owners memoize anything
/// derived from the content (see [`RenderCache`]).
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer {
    text: String,
    version: u64,
}

impl ContentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole content.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.bump();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.bump();
    }

    pub fn append_char(&mut self, ch: char) {
        self.text.push(ch);
        self.bump();
    }

    pub fn append_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.bump();
    }

    /// Insert `ch` before the character at `index`.
    ///
    /// # Errors
    /// Returns [`DocumentError::IndexOutOfRange`] when `index` is past the end.
    pub fn insert_char(&mut self, index: usize, ch: char) -> Result<()> {
        let byte = self.byte_offset(index)?;
        self.text.insert(byte, ch);
        self.bump();
        Ok(())
    }

    /// Insert `s` before the character at `index`.
    ///
    /// # Errors
    /// Returns [`DocumentError::IndexOutOfRange`] when `index` is past the end.
    pub fn insert_str(&mut self, index: usize, s: &str) -> Result<()> {
        let byte = self.byte_offset(index)?;
        self.text.insert_str(byte, s);
        self.bump();
        Ok(())
    }

    /// Character at `index`.
    ///
    /// # Errors
    /// Returns [`DocumentError::IndexOutOfRange`] when `index` is not a valid
    /// character position.
    pub fn char_at(&self, index: usize) -> Result<char> {
        self.text
            .chars()
            .nth(index)
            .ok_or(DocumentError::IndexOutOfRange {
                index,
                len: self.char_len(),
            })
    }

    fn byte_offset(&self, index: usize) -> Result<usize> {
        if index == 0 {
            return Ok(0);
        }
        let mut chars = self.text.char_indices();
        match chars.nth(index) {
            Some((byte, _)) => Ok(byte),
            None if index == self.char_len() => Ok(self.text.len()),
            None => Err(DocumentError::IndexOutOfRange {
                index,
                len: self.char_len(),
            }),
        }
    }

    const fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl PartialEq for ContentBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for ContentBuffer {}

/// Memoized rendering keyed on a content version.
///
/// Reads are observably pure: a stale entry is recomputed, never returned.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    slot: RefCell<Option<(u64, String)>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached rendering for `version`, computing it if needed.
    pub fn get_or_render(&self, version: u64, render: impl FnOnce() -> String) -> String {
        if let Some((cached_version, rendered)) = self.slot.borrow().as_ref()
            && *cached_version == version
        {
            return rendered.clone();
        }
        let rendered = render();
        *self.slot.borrow_mut() = Some((version, rendered.clone()));
        rendered
    }

    pub fn is_warm_for(&self, version: u64) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .is_some_and(|(cached, _)| *cached == version)
    }
}
