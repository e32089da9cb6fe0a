//! Core document types.

use super::buffer::{ContentBuffer, RenderCache};
use super::inline::{no_op, transition};
use super::style::TextRunStyles;
use crate::error::{DocumentError, Result};
use crate::parser::marker::ListMarker;

/// Anything that can re-serialize itself to canonical Markdown.
pub trait ToMarkdown {
    /// Render to Markdown. Pure: repeated calls return the same text until
    /// the value is mutated.
    fn markdown(&self) -> String;
}

/// A validated header level in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeaderLevel(u8);

impl HeaderLevel {
    pub const MIN: usize = 1;
    pub const MAX: usize = 6;

    /// # Errors
    /// Returns [`DocumentError::HeaderLevelOutOfRange`] outside `1..=6`.
    pub fn new(level: usize) -> Result<Self> {
        match u8::try_from(level) {
            Ok(value) if (Self::MIN..=Self::MAX).contains(&level) => Ok(Self(value)),
            _ => Err(DocumentError::HeaderLevelOutOfRange(level)),
        }
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Zero-based index into per-level tables.
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<usize> for HeaderLevel {
    type Error = DocumentError;

    fn try_from(level: usize) -> Result<Self> {
        Self::new(level)
    }
}

/// A styled run of inline text.
#[derive(Debug, Clone, Default)]
pub struct TextRun {
    content: ContentBuffer,
    styles: TextRunStyles,
    styles_revision: u64,
    cache: RenderCache,
}

impl TextRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, TextRunStyles::new())
    }

    pub fn styled(content: impl Into<String>, styles: TextRunStyles) -> Self {
        Self {
            content: ContentBuffer::from_text(content),
            styles,
            styles_revision: 0,
            cache: RenderCache::new(),
        }
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Mutable access to the text; every mutation invalidates the cached
    /// Markdown.
    pub const fn content_mut(&mut self) -> &mut ContentBuffer {
        &mut self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub const fn styles(&self) -> &TextRunStyles {
        &self.styles
    }

    pub const fn styles_mut(&mut self) -> &mut TextRunStyles {
        self.styles_revision = self.styles_revision.wrapping_add(1);
        &mut self.styles
    }

    const fn revision(&self) -> u64 {
        self.content.version().wrapping_add(self.styles_revision)
    }
}

impl ToMarkdown for TextRun {
    fn markdown(&self) -> String {
        self.cache
            .get_or_render(self.revision(), || render_runs([self]))
    }
}

impl PartialEq for TextRun {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content && self.styles == other.styles
    }
}

impl Eq for TextRun {}

/// Inline content of a paragraph or list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    TextRun(TextRun),
}

impl Inline {
    pub const fn as_text_run(&self) -> &TextRun {
        match self {
            Self::TextRun(run) => run,
        }
    }

    pub const fn as_text_run_mut(&mut self) -> &mut TextRun {
        match self {
            Self::TextRun(run) => run,
        }
    }

    fn plain_text(&self) -> &str {
        match self {
            Self::TextRun(run) => run.content(),
        }
    }
}

impl From<TextRun> for Inline {
    fn from(run: TextRun) -> Self {
        Self::TextRun(run)
    }
}

impl ToMarkdown for Inline {
    fn markdown(&self) -> String {
        match self {
            Self::TextRun(run) => run.markdown(),
        }
    }
}

/// A paragraph of inline runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runs(runs: impl IntoIterator<Item = TextRun>) -> Self {
        Self {
            inlines: runs.into_iter().map(Inline::from).collect(),
        }
    }

    /// Concatenated text without any delimiters.
    pub fn plain_text(&self) -> String {
        self.inlines.iter().map(Inline::plain_text).collect()
    }
}

impl ToMarkdown for Paragraph {
    fn markdown(&self) -> String {
        let body = render_runs(self.inlines.iter().map(Inline::as_text_run));
        if starts_like_block_marker(&body) {
            format!("\\{body}")
        } else {
            body
        }
    }
}

/// An ATX header.
#[derive(Debug, Clone)]
pub struct Header {
    level: HeaderLevel,
    content: ContentBuffer,
    level_revision: u64,
    cache: RenderCache,
}

impl Header {
    pub fn new(level: HeaderLevel) -> Self {
        Self::with_content(level, "")
    }

    pub fn with_content(level: HeaderLevel, content: impl Into<String>) -> Self {
        Self {
            level,
            content: ContentBuffer::from_text(content),
            level_revision: 0,
            cache: RenderCache::new(),
        }
    }

    pub const fn level(&self) -> HeaderLevel {
        self.level
    }

    /// # Errors
    /// Returns [`DocumentError::HeaderLevelOutOfRange`] outside `1..=6`; the
    /// current level is kept.
    pub fn set_level(&mut self, level: usize) -> Result<()> {
        self.level = HeaderLevel::new(level)?;
        self.level_revision = self.level_revision.wrapping_add(1);
        Ok(())
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    pub const fn content_mut(&mut self) -> &mut ContentBuffer {
        &mut self.content
    }

    pub fn is_content_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl ToMarkdown for Header {
    fn markdown(&self) -> String {
        let revision = self.content.version().wrapping_add(self.level_revision);
        self.cache.get_or_render(revision, || {
            let mut out = String::with_capacity(self.content().len() + self.level.get() + 1);
            out.extend(std::iter::repeat_n('#', self.level.get()));
            out.push(' ');
            out.push_str(self.content());
            out
        })
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level && self.content == other.content
    }
}

impl Eq for Header {}

/// A fenced code block.
#[derive(Debug, Clone, Default)]
pub struct CodeBlock {
    language: Option<String>,
    content: ContentBuffer,
    language_revision: u64,
    cache: RenderCache,
}

impl CodeBlock {
    pub fn new(language: Option<String>) -> Self {
        Self::with_content(language, "")
    }

    pub fn with_content(language: Option<String>, content: impl Into<String>) -> Self {
        Self {
            language,
            content: ContentBuffer::from_text(content),
            language_revision: 0,
            cache: RenderCache::new(),
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
        self.language_revision = self.language_revision.wrapping_add(1);
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    pub const fn content_mut(&mut self) -> &mut ContentBuffer {
        &mut self.content
    }

    pub fn is_content_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl ToMarkdown for CodeBlock {
    fn markdown(&self) -> String {
        let revision = self.content.version().wrapping_add(self.language_revision);
        self.cache.get_or_render(revision, || {
            let mut out = String::from("```");
            if let Some(language) = &self.language {
                out.push_str(language);
            }
            out.push('\n');
            if !self.is_content_empty() {
                out.push_str(self.content());
                out.push('\n');
            }
            out.push_str("```");
            out
        })
    }
}

impl PartialEq for CodeBlock {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language && self.content == other.content
    }
}

impl Eq for CodeBlock {}

/// One entry of a [`List`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub can_check: bool,
    pub is_checked: bool,
    pub inlines: Vec<Inline>,
}

impl ListItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runs(runs: impl IntoIterator<Item = TextRun>) -> Self {
        Self {
            inlines: runs.into_iter().map(Inline::from).collect(),
            ..Self::default()
        }
    }

    /// A task item with a checkbox.
    #[must_use]
    pub const fn checkable(mut self, checked: bool) -> Self {
        self.can_check = true;
        self.is_checked = checked;
        self
    }

    pub fn plain_text(&self) -> String {
        self.inlines.iter().map(Inline::plain_text).collect()
    }
}

impl ToMarkdown for ListItem {
    fn markdown(&self) -> String {
        let body = render_runs(self.inlines.iter().map(Inline::as_text_run));
        if self.can_check {
            let mark = if self.is_checked { "[x] " } else { "[ ] " };
            format!("{mark}{body}")
        } else if ListMarker::task_prefix_len(&body).is_some() {
            format!("\\{body}")
        } else {
            body
        }
    }
}

/// An ordered or bulleted list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    pub is_ordered: bool,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(is_ordered: bool) -> Self {
        Self {
            is_ordered,
            items: Vec::new(),
        }
    }
}

impl ToMarkdown for List {
    fn markdown(&self) -> String {
        let mut lines = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let marker = if self.is_ordered {
                format!("{}. ", index + 1)
            } else {
                "- ".to_string()
            };
            let indent = " ".repeat(marker.len());
            let text = item.markdown();
            for (line_no, line) in text.split('\n').enumerate() {
                if line_no == 0 {
                    lines.push(format!("{marker}{line}"));
                } else {
                    lines.push(format!("{indent}{line}"));
                }
            }
        }
        lines.join("\n")
    }
}

/// A top-level block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Header(Header),
    CodeBlock(CodeBlock),
    List(List),
}

impl Block {
    /// Short lowercase name used in logs.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Header(_) => "header",
            Self::CodeBlock(_) => "code_block",
            Self::List(_) => "list",
        }
    }
}

impl ToMarkdown for Block {
    fn markdown(&self) -> String {
        match self {
            Self::Paragraph(p) => p.markdown(),
            Self::Header(h) => h.markdown(),
            Self::CodeBlock(c) => c.markdown(),
            Self::List(l) => l.markdown(),
        }
    }
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Self::Paragraph(p)
    }
}

impl From<Header> for Block {
    fn from(h: Header) -> Self {
        Self::Header(h)
    }
}

impl From<CodeBlock> for Block {
    fn from(c: CodeBlock) -> Self {
        Self::CodeBlock(c)
    }
}

impl From<List> for Block {
    fn from(l: List) -> Self {
        Self::List(l)
    }
}

/// A parsed Markdown document: an ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub blocks: Vec<Block>,
}

impl MarkdownDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn first(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl ToMarkdown for MarkdownDocument {
    fn markdown(&self) -> String {
        self.blocks
            .iter()
            .map(ToMarkdown::markdown)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

const ESCAPED_CHARS: [char; 5] = ['\\', '*', '_', '~', '`'];

/// Render runs as one inline sequence. Delimiters are written only where
/// the style set changes between neighbouring runs.
fn render_runs<'a>(runs: impl IntoIterator<Item = &'a TextRun>) -> String {
    let runs: Vec<&TextRun> = runs.into_iter().filter(|run| !run.is_empty()).collect();
    let mut out = String::new();
    let mut active = TextRunStyles::new();
    for (index, run) in runs.iter().enumerate() {
        out.push_str(&transition(&active, run.styles()));
        active.copy_from(run.styles());
        let at_line_start = out.is_empty() || out.ends_with('\n');
        let ends_block = index + 1 == runs.len();
        escape_inline(run.content(), &active, at_line_start, ends_block, &mut out);
    }
    out.push_str(&transition(&active, &TextRunStyles::new()));
    out
}

/// Write `text` with inline delimiters escaped and hard breaks spelled as
/// two trailing spaces.
///
/// Spaces that a line end would swallow are escaped: the last one before a
/// break or the end of the block, and the first one after a break. A line
/// holding nothing but a break gets delimiters that change no style.
fn escape_inline(
    text: &str,
    styles: &TextRunStyles,
    at_line_start: bool,
    ends_block: bool,
    out: &mut String,
) {
    let mut lines = text.split('\n').peekable();
    let mut after_break = false;
    while let Some(line) = lines.next() {
        if after_break {
            out.push_str("  \n");
            // Backticks are always escaped, so only headers and list markers
            // can start the continuation line.
            if !line.starts_with('`') && starts_like_block_marker(line) {
                out.push('\\');
            }
        }
        let breaks = lines.peek().is_some();
        if breaks && line.is_empty() && (after_break || at_line_start) {
            out.push_str(&no_op(styles));
        }
        escape_line(line, after_break, breaks || ends_block, out);
        after_break = true;
    }
}

fn escape_line(line: &str, after_break: bool, before_break: bool, out: &mut String) {
    for (index, ch) in line.char_indices() {
        let edge_space = ch == ' '
            && ((after_break && index == 0) || (before_break && index + 1 == line.len()));
        if edge_space || ESCAPED_CHARS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// True when `line`, placed at the start of a source line, would open a
/// header, list item or code fence instead of paragraph text.
fn starts_like_block_marker(line: &str) -> bool {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes > 0 {
        return hashes <= HeaderLevel::MAX && line[hashes..].starts_with(' ');
    }
    line.starts_with("```") || ListMarker::recognize(line).is_some()
}
