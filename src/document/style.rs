//! Inline style flags and the ordered style set carried by text runs.

use crate::error::{DocumentError, Result};

/// A single inline style, named after the delimiter that produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRunStyle {
    BoldWithAsterisk,
    ItalicWithAsterisk,
    BoldWithUnderscore,
    ItalicWithUnderscore,
    Strikethrough,
    InlineCode,
}

impl TextRunStyle {
    /// The Markdown delimiter that opens and closes this style.
    pub const fn delimiter(self) -> &'static str {
        match self {
            Self::BoldWithAsterisk => "**",
            Self::ItalicWithAsterisk => "*",
            Self::BoldWithUnderscore => "__",
            Self::ItalicWithUnderscore => "_",
            Self::Strikethrough => "~~",
            Self::InlineCode => "`",
        }
    }
}

/// Style toggles produced by a run of `count` identical delimiter
/// characters, or `None` when the run is literal text.
///
/// `*` and `_` toggle bold once per pair and italic for an odd remainder.
/// Strikethrough needs exactly `~~` and inline code exactly one backtick.
/// Inside inline code only the backtick is significant.
pub(crate) fn delimiter_toggles(
    ch: char,
    count: usize,
    in_code: bool,
) -> Option<Vec<TextRunStyle>> {
    let (bold, italic) = match ch {
        '`' => return (count == 1).then(|| vec![TextRunStyle::InlineCode]),
        _ if in_code => return None,
        '~' => return (count == 2).then(|| vec![TextRunStyle::Strikethrough]),
        '*' => (
            TextRunStyle::BoldWithAsterisk,
            TextRunStyle::ItalicWithAsterisk,
        ),
        '_' => (
            TextRunStyle::BoldWithUnderscore,
            TextRunStyle::ItalicWithUnderscore,
        ),
        _ => return None,
    };
    let mut toggles = vec![bold; count / 2];
    if count % 2 == 1 {
        toggles.push(italic);
    }
    Some(toggles)
}

/// Insertion-ordered set of [`TextRunStyle`]s.
///
/// Order matters: rendering opens styles first-to-last and closes them
/// last-to-first, and equality compares the sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextRunStyles {
    styles: Vec<TextRunStyle>,
}

impl TextRunStyles {
    pub const fn new() -> Self {
        Self { styles: Vec::new() }
    }

    /// Build a set from a sequence, rejecting duplicates.
    ///
    /// # Errors
    /// Returns [`DocumentError::DuplicateStyle`] if a style repeats.
    pub fn from_styles(styles: impl IntoIterator<Item = TextRunStyle>) -> Result<Self> {
        let mut set = Self::new();
        for style in styles {
            set.add(style)?;
        }
        Ok(set)
    }

    /// Append a style.
    ///
    /// # Errors
    /// Returns [`DocumentError::DuplicateStyle`] if the style is already present.
    pub fn add(&mut self, style: TextRunStyle) -> Result<()> {
        if self.contains(style) {
            return Err(DocumentError::DuplicateStyle(style));
        }
        self.styles.push(style);
        Ok(())
    }

    pub fn contains(&self, style: TextRunStyle) -> bool {
        self.styles.contains(&style)
    }

    pub fn enable(&mut self, style: TextRunStyle) {
        if !self.contains(style) {
            self.styles.push(style);
        }
    }

    pub fn disable(&mut self, style: TextRunStyle) {
        self.styles.retain(|s| *s != style);
    }

    /// Remove the style if present, otherwise append it.
    pub fn toggle(&mut self, style: TextRunStyle) {
        if let Some(index) = self.styles.iter().position(|s| *s == style) {
            self.styles.remove(index);
        } else {
            self.styles.push(style);
        }
    }

    pub fn clear(&mut self) {
        self.styles.clear();
    }

    /// Overwrite this set with the contents of `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.styles.clone_from(&other.styles);
    }

    /// The set after a run of `count` `ch` delimiters is read, or `None`
    /// when that run would be literal text.
    pub(crate) fn after_delimiter_run(&self, ch: char, count: usize) -> Option<Self> {
        let toggles = delimiter_toggles(ch, count, self.is_inline_code())?;
        let mut next = self.clone();
        for style in toggles {
            next.toggle(style);
        }
        Some(next)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = TextRunStyle> + '_ {
        self.styles.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn is_bold(&self) -> bool {
        self.contains(TextRunStyle::BoldWithAsterisk)
            || self.contains(TextRunStyle::BoldWithUnderscore)
    }

    pub fn is_italic(&self) -> bool {
        self.contains(TextRunStyle::ItalicWithAsterisk)
            || self.contains(TextRunStyle::ItalicWithUnderscore)
    }

    pub fn is_strikethrough(&self) -> bool {
        self.contains(TextRunStyle::Strikethrough)
    }

    pub fn is_inline_code(&self) -> bool {
        self.contains(TextRunStyle::InlineCode)
    }
}
