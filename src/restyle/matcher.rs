//! Delimiter-pair styling over presentation text nodes.
//!
//! Unlike the tokenizer, this pass leaves the delimiters in the text: it
//! finds pairs of matching delimiters inside a text block and styles the
//! span they enclose, delimiters included. Running it again over its own
//! output yields the same spans.

use crate::config::{FontWeight, MarkdownConfig};
use crate::presentation::{Baseline, Children, NodeIds, TextAttributes, TextBlockNode, TextNode};

/// Matches a run of exactly `width` copies of `ch`, not extended by another
/// `ch` on either side within the same text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterMatcher {
    ch: char,
    width: usize,
}

impl DelimiterMatcher {
    pub const BOLD: Self = Self::new('*', 2);
    pub const ITALIC: Self = Self::new('*', 1);
    pub const STRIKETHROUGH: Self = Self::new('~', 2);
    pub const SUPERSCRIPT: Self = Self::new('^', 1);
    pub const SUBSCRIPT: Self = Self::new('~', 1);

    pub const fn new(ch: char, width: usize) -> Self {
        Self { ch, width }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    fn matches_at(&self, chars: &[char], index: usize) -> bool {
        let end = index + self.width;
        if end > chars.len() || !chars[index..end].iter().all(|c| *c == self.ch) {
            return false;
        }
        let extended_before = index > 0 && chars[index - 1] == self.ch;
        let extended_after = chars.get(end) == Some(&self.ch);
        !extended_before && !extended_after
    }

    /// Character offsets of every match in `text`, scanning left to right
    /// and skipping past each match.
    pub fn find_in(&self, text: &str) -> Vec<usize> {
        let chars: Vec<char> = text.chars().collect();
        let mut found = Vec::new();
        let mut index = 0;
        while index < chars.len() {
            if self.matches_at(&chars, index) {
                found.push(index);
                index += self.width;
            } else {
                index += 1;
            }
        }
        found
    }
}

/// A delimiter occurrence inside a block's text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch {
    pub run: usize,
    /// Character offset inside the run.
    pub offset: usize,
    pub width: usize,
}

pub fn find_matches(runs: &Children<TextNode>, matcher: &DelimiterMatcher) -> Vec<TagMatch> {
    runs.iter()
        .enumerate()
        .flat_map(|(run, node)| {
            matcher
                .find_in(node.text())
                .into_iter()
                .map(move |offset| TagMatch {
                    run,
                    offset,
                    width: matcher.width(),
                })
        })
        .collect()
}

/// One attribute set on a matched span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeChange {
    FontWeight(FontWeight),
    Italic(bool),
    Strikethrough(bool),
    Baseline(Baseline),
    FontSize(f32),
}

impl AttributeChange {
    pub const fn apply(self, attrs: &mut TextAttributes) {
        match self {
            Self::FontWeight(weight) => attrs.font_weight = weight,
            Self::Italic(italic) => attrs.italic = italic,
            Self::Strikethrough(strike) => attrs.strikethrough = strike,
            Self::Baseline(baseline) => attrs.baseline = baseline,
            Self::FontSize(size) => attrs.font_size = size,
        }
    }
}

/// Style every span between successive pairs of `matcher` matches.
///
/// Text nodes are split so each span covers whole nodes; nodes outside the
/// spans keep their attributes. A trailing unpaired match is ignored.
/// Returns whether any pair was found.
pub fn process_tag_pairs(
    block: &mut TextBlockNode,
    ids: &mut NodeIds,
    matcher: &DelimiterMatcher,
    changes: &[AttributeChange],
) -> bool {
    let matches = find_matches(&block.runs, matcher);
    let pairs: Vec<_> = matches
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();
    // Back to front, so earlier match positions survive the splits.
    for (open, close) in pairs.iter().rev() {
        let (start, split_open) = split_run(&mut block.runs, ids, open.run, open.offset);
        let (close_run, close_end) = if split_open && close.run == open.run {
            (close.run + 1, close.offset + close.width - open.offset)
        } else if split_open {
            (close.run + 1, close.offset + close.width)
        } else {
            (close.run, close.offset + close.width)
        };
        let (end, _) = split_run(&mut block.runs, ids, close_run, close_end);
        for index in start..end {
            if let Some(node) = block.runs.get_mut(index) {
                for change in changes {
                    change.apply(&mut node.attrs);
                }
            }
        }
    }
    if !pairs.is_empty() {
        tracing::trace!(?matcher, pairs = pairs.len(), "styled delimiter pairs");
    }
    !pairs.is_empty()
}

/// Make a node boundary at character `offset` of run `index`.
///
/// Returns the index of the first node after the boundary and whether a
/// node had to be split to create it.
fn split_run(
    runs: &mut Children<TextNode>,
    ids: &mut NodeIds,
    index: usize,
    offset: usize,
) -> (usize, bool) {
    let Some(node) = runs.get_mut(index) else {
        return (runs.len(), false);
    };
    if offset == 0 {
        return (index, false);
    }
    if offset >= node.char_len() {
        return (index + 1, false);
    }
    let byte = node
        .text()
        .char_indices()
        .nth(offset)
        .map_or(node.text().len(), |(byte, _)| byte);
    let tail = node.text()[byte..].to_string();
    let head = node.text()[..byte].to_string();
    node.set_text(&head);
    let attrs = node.attrs;
    runs.insert_after(Some(index), TextNode::new(ids.allocate(), tail, attrs));
    (index + 1, true)
}

/// Reset every node of `block` to plain body attributes.
pub fn prepare_paragraph(block: &mut TextBlockNode, config: &MarkdownConfig) {
    let base = TextAttributes::base(config);
    for node in block.runs.iter_mut() {
        node.attrs = base;
    }
}

pub fn process_bold(block: &mut TextBlockNode, ids: &mut NodeIds) -> bool {
    process_tag_pairs(
        block,
        ids,
        &DelimiterMatcher::BOLD,
        &[AttributeChange::FontWeight(FontWeight::BOLD)],
    )
}

pub fn process_italic(block: &mut TextBlockNode, ids: &mut NodeIds) -> bool {
    process_tag_pairs(
        block,
        ids,
        &DelimiterMatcher::ITALIC,
        &[AttributeChange::Italic(true)],
    )
}

pub fn process_strikethrough(block: &mut TextBlockNode, ids: &mut NodeIds) -> bool {
    process_tag_pairs(
        block,
        ids,
        &DelimiterMatcher::STRIKETHROUGH,
        &[AttributeChange::Strikethrough(true)],
    )
}

pub fn process_superscript(
    block: &mut TextBlockNode,
    ids: &mut NodeIds,
    config: &MarkdownConfig,
) -> bool {
    process_tag_pairs(
        block,
        ids,
        &DelimiterMatcher::SUPERSCRIPT,
        &[
            AttributeChange::Baseline(Baseline::Superscript),
            AttributeChange::FontSize(config.superscript_font_size),
        ],
    )
}

pub fn process_subscript(
    block: &mut TextBlockNode,
    ids: &mut NodeIds,
    config: &MarkdownConfig,
) -> bool {
    process_tag_pairs(
        block,
        ids,
        &DelimiterMatcher::SUBSCRIPT,
        &[
            AttributeChange::Baseline(Baseline::Subscript),
            AttributeChange::FontSize(config.subscript_font_size),
        ],
    )
}

/// Header level of a line of text: leading whitespace is skipped, then
/// `#`s are counted. A non-whitespace character right after the `#`s means
/// the line is not a header and the level is 0.
pub fn heading_level(text: &str) -> usize {
    let mut chars = text.chars().skip_while(|c| c.is_whitespace()).peekable();
    let mut level = 0;
    while chars.next_if_eq(&'#').is_some() {
        level += 1;
    }
    match chars.peek() {
        Some(c) if level > 0 && !c.is_whitespace() => 0,
        _ => level,
    }
}

/// Full re-style of a paragraph: reset, then every delimiter pass.
pub fn apply_paragraph_style(
    block: &mut TextBlockNode,
    ids: &mut NodeIds,
    config: &MarkdownConfig,
) {
    prepare_paragraph(block, config);
    process_bold(block, ids);
    process_italic(block, ids);
    process_strikethrough(block, ids);
    process_superscript(block, ids, config);
    process_subscript(block, ids, config);
}

/// Give every node header typography for `level`; levels past 6 use 6.
pub fn apply_header_style(block: &mut TextBlockNode, level: usize, config: &MarkdownConfig) {
    let attrs = TextAttributes::heading(config, level);
    for node in block.runs.iter_mut() {
        node.attrs = attrs;
    }
}

/// Apply header typography when the block's first node reads as a header
/// line. Returns whether it did.
pub fn process_heading(block: &mut TextBlockNode, config: &MarkdownConfig) -> bool {
    let level = block
        .runs
        .first()
        .map_or(0, |node| heading_level(node.text()));
    if level == 0 {
        return false;
    }
    apply_header_style(block, level, config);
    true
}
