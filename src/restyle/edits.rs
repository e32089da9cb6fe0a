//! Structural edits triggered while typing into a presentation tree.
//!
//! A leading `# ` turns a paragraph into a header, a list marker turns it
//! into a list, and backspace at the very start of a header turns it back
//! into a paragraph. Everything else re-styles the edited block in place.

use crate::config::MarkdownConfig;
use crate::document::HeaderLevel;
use crate::parser::marker::ListMarker;
use crate::presentation::{
    ListItemNode, ListNode, NodeIds, PresentationBlock, PresentationDocument, TextAttributes,
    TextBlockNode, TextNode, TextRole,
};

use super::matcher::{apply_header_style, apply_paragraph_style};

/// Caret position inside a presentation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    /// Top-level block index.
    pub block: usize,
    /// List item index when the caret is inside a list.
    pub item: Option<usize>,
    /// Text node index inside the block or item.
    pub run: usize,
    /// Character offset inside the text node.
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    HeaderCreated(HeaderLevel),
    ListCreated,
    Restyled,
    Unchanged,
}

fn text_block_at<'a>(
    tree: &'a mut PresentationDocument,
    caret: &Caret,
) -> Option<&'a mut TextBlockNode> {
    if caret.item.is_some() {
        return None;
    }
    tree.blocks.get_mut(caret.block)?.as_text_mut()
}

/// Turn a single-run paragraph starting with `#`s and a space into a header.
///
/// The marker is removed from the text and the caret shifts left by its
/// length.
pub fn process_header_creation(
    tree: &mut PresentationDocument,
    caret: &mut Caret,
    config: &MarkdownConfig,
) -> bool {
    let Some(block) = text_block_at(tree, caret) else {
        return false;
    };
    if block.role != TextRole::Paragraph || block.runs.len() != 1 || caret.run != 0 {
        return false;
    }
    let Some(node) = block.runs.get_mut(0) else {
        return false;
    };
    let hashes = node.text().chars().take_while(|c| *c == '#').count();
    if hashes == 0 || node.text().chars().nth(hashes) != Some(' ') {
        return false;
    }
    let Ok(level) = HeaderLevel::new(hashes) else {
        return false;
    };
    let marker_len = hashes + 1;
    let rest: String = node.text().chars().skip(marker_len).collect();
    node.set_text(&rest);
    block.role = TextRole::Heading(level);
    apply_header_style(block, level.get(), config);
    caret.offset = caret.offset.saturating_sub(marker_len);
    tracing::debug!(block = caret.block, level = level.get(), "created header");
    true
}

/// Backspace at offset 0 of a header's only run turns it into a paragraph.
pub fn process_header_deleting(
    tree: &mut PresentationDocument,
    caret: &Caret,
    config: &MarkdownConfig,
) -> bool {
    if caret.item.is_some() || caret.run != 0 || caret.offset != 0 {
        return false;
    }
    let PresentationDocument { blocks, ids } = tree;
    let Some(block) = blocks
        .get_mut(caret.block)
        .and_then(PresentationBlock::as_text_mut)
    else {
        return false;
    };
    if !matches!(block.role, TextRole::Heading(_)) || block.runs.len() != 1 {
        return false;
    }
    block.role = TextRole::Paragraph;
    apply_paragraph_style(block, ids, config);
    tracing::debug!(block = caret.block, "header reverted to paragraph");
    true
}

/// Turn the paragraph's last run into a list when it starts with a list
/// marker and the caret sits past that marker.
///
/// The new list holds one item with the text after the marker. The run is
/// removed from the paragraph, and the paragraph itself goes away when
/// nothing but whitespace is left in it.
pub fn process_list_creation(
    tree: &mut PresentationDocument,
    caret: &mut Caret,
    config: &MarkdownConfig,
) -> bool {
    let PresentationDocument { blocks, ids } = tree;
    if caret.item.is_some() {
        return false;
    }
    let Some(block) = blocks
        .get_mut(caret.block)
        .and_then(PresentationBlock::as_text_mut)
    else {
        return false;
    };
    if block.role != TextRole::Paragraph
        || block.runs.is_empty()
        || caret.run + 1 != block.runs.len()
    {
        return false;
    }
    let Some((marker, marker_len, rest)) = block.runs.last().and_then(|node| {
        let (marker, marker_len) = ListMarker::recognize(node.text())?;
        let rest: String = node.text().chars().skip(marker_len).collect();
        Some((marker, marker_len, rest))
    }) else {
        return false;
    };
    if caret.offset < marker_len {
        return false;
    }

    block.runs.remove(caret.run);
    if let Some(previous) = block.runs.last_mut()
        && let Some(trimmed) = previous.text().strip_suffix('\n')
    {
        let trimmed = trimmed.to_string();
        previous.set_text(&trimmed);
    }
    let keep_paragraph = block.runs.iter().any(|node| !node.text().trim().is_empty());

    let list = new_list(ids, marker.is_ordered(), &rest, config);
    let index = if keep_paragraph {
        blocks.insert_after(Some(caret.block), PresentationBlock::List(list))
    } else {
        blocks.remove(caret.block);
        blocks.insert_after(caret.block.checked_sub(1), PresentationBlock::List(list))
    };
    *caret = Caret {
        block: index,
        item: Some(0),
        run: 0,
        offset: caret.offset - marker_len,
    };
    tracing::debug!(block = index, ordered = marker.is_ordered(), "created list");
    true
}

fn new_list(ids: &mut NodeIds, ordered: bool, text: &str, config: &MarkdownConfig) -> ListNode {
    let mut list = ListNode::new(ids.allocate(), ordered);
    let mut item = ListItemNode::new(ids.allocate(), None);
    let run = TextNode::new(ids.allocate(), text, TextAttributes::base(config));
    item.runs.append(run);
    list.items.append(item);
    list
}

/// Re-style one top-level text block according to its role.
pub fn restyle_block(
    tree: &mut PresentationDocument,
    index: usize,
    config: &MarkdownConfig,
) -> bool {
    let PresentationDocument { blocks, ids } = tree;
    let Some(block) = blocks
        .get_mut(index)
        .and_then(PresentationBlock::as_text_mut)
    else {
        return false;
    };
    match block.role {
        TextRole::Paragraph => apply_paragraph_style(block, ids, config),
        TextRole::Heading(level) => apply_header_style(block, level.get(), config),
    }
    true
}

/// React to a text change at `caret`.
///
/// When the caret moved to another block since the previous change, the
/// block it left is re-styled first. Then header creation and list
/// creation are tried in that order; otherwise the current block is
/// re-styled.
pub fn handle_text_changed(
    tree: &mut PresentationDocument,
    previous: Option<Caret>,
    caret: &mut Caret,
    config: &MarkdownConfig,
) -> EditOutcome {
    if let Some(previous) = previous
        && previous.block != caret.block
        && previous.item.is_none()
    {
        restyle_block(tree, previous.block, config);
    }

    if process_header_creation(tree, caret, config) {
        let level = tree
            .blocks
            .get(caret.block)
            .and_then(PresentationBlock::as_text)
            .and_then(|block| match block.role {
                TextRole::Heading(level) => Some(level),
                TextRole::Paragraph => None,
            });
        if let Some(level) = level {
            return EditOutcome::HeaderCreated(level);
        }
    }
    if process_list_creation(tree, caret, config) {
        return EditOutcome::ListCreated;
    }
    if caret.item.is_none() && restyle_block(tree, caret.block, config) {
        return EditOutcome::Restyled;
    }
    EditOutcome::Unchanged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::presentation::reconcile;

    fn tree_with(paragraphs: &[&str]) -> PresentationDocument {
        let config = MarkdownConfig::default();
        let mut tree = PresentationDocument::new();
        for text in paragraphs {
            let mut block = TextBlockNode::new(tree.ids.allocate(), TextRole::Paragraph);
            let attrs = TextAttributes::base(&config);
            block
                .runs
                .append(TextNode::new(tree.ids.allocate(), *text, attrs));
            tree.blocks.append(PresentationBlock::Text(block));
        }
        tree
    }

    fn caret_at(block: usize, offset: usize) -> Caret {
        Caret {
            block,
            item: None,
            run: 0,
            offset,
        }
    }

    #[test]
    fn test_header_creation_strips_marker() {
        let config = MarkdownConfig::default();
        let mut tree = tree_with(&["## Title"]);
        let mut caret = caret_at(0, 8);
        assert!(process_header_creation(&mut tree, &mut caret, &config));
        let block = tree
            .blocks
            .get(0)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        assert_eq!(block.plain_text(), "Title");
        assert_eq!(block.role, TextRole::Heading(HeaderLevel::new(2).unwrap()));
        assert_eq!(caret.offset, 5);
        let attrs = block.runs.first().unwrap().attrs;
        let expected = config.heading_font_size(2);
        assert!((attrs.font_size - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_header_creation_rejects_non_markers() {
        let config = MarkdownConfig::default();
        for text in ["#Title", "#", "plain", "####### seven"] {
            let mut tree = tree_with(&[text]);
            let mut caret = caret_at(0, 1);
            assert!(
                !process_header_creation(&mut tree, &mut caret, &config),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_header_deleting_only_at_start() {
        let config = MarkdownConfig::default();
        let mut tree = tree_with(&["# **Big**"]);
        let mut caret = caret_at(0, 9);
        assert!(process_header_creation(&mut tree, &mut caret, &config));

        let inside = caret_at(0, 1);
        assert!(!process_header_deleting(&mut tree, &inside, &config));
        let start = caret_at(0, 0);
        assert!(process_header_deleting(&mut tree, &start, &config));
        let block = tree
            .blocks
            .get(0)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        assert_eq!(block.role, TextRole::Paragraph);
        assert!(block.runs.iter().all(|n| n.attrs.font_weight.is_bold()));
        let size = block.runs.first().unwrap().attrs.font_size;
        assert!((size - config.font_size).abs() < f32::EPSILON);
    }

    #[test]
    fn test_list_creation_replaces_empty_paragraph() {
        let config = MarkdownConfig::default();
        let mut tree = tree_with(&["before", "- item"]);
        let mut caret = caret_at(1, 6);
        assert!(process_list_creation(&mut tree, &mut caret, &config));
        assert_eq!(tree.blocks.len(), 2);
        let Some(PresentationBlock::List(list)) = tree.blocks.get(1) else {
            panic!("expected a list");
        };
        assert!(!list.ordered);
        assert_eq!(list.items.first().unwrap().plain_text(), "item");
        assert_eq!(
            caret,
            Caret {
                block: 1,
                item: Some(0),
                run: 0,
                offset: 4
            }
        );
    }

    #[test]
    fn test_list_creation_keeps_leading_runs() {
        let config = MarkdownConfig::default();
        let mut tree = tree_with(&["intro\n"]);
        if let Some(PresentationBlock::Text(block)) = tree.blocks.get_mut(0) {
            let attrs = TextAttributes::base(&config);
            let marker = TextNode::new(tree.ids.allocate(), "1. ", attrs);
            block.runs.append(marker);
        }
        let mut caret = Caret {
            block: 0,
            item: None,
            run: 1,
            offset: 3,
        };
        assert!(process_list_creation(&mut tree, &mut caret, &config));
        assert_eq!(tree.blocks.len(), 2);
        let paragraph = tree
            .blocks
            .get(0)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        assert_eq!(paragraph.plain_text(), "intro");
        let Some(PresentationBlock::List(list)) = tree.blocks.get(1) else {
            panic!("expected a list");
        };
        assert!(list.ordered);
        assert_eq!(caret.block, 1);
        assert_eq!(caret.offset, 0);
    }

    #[test]
    fn test_list_creation_needs_caret_past_marker() {
        let config = MarkdownConfig::default();
        let mut tree = tree_with(&["- item"]);
        let mut caret = caret_at(0, 1);
        assert!(!process_list_creation(&mut tree, &mut caret, &config));
        let mut tree = tree_with(&["-item"]);
        let mut caret = caret_at(0, 5);
        assert!(!process_list_creation(&mut tree, &mut caret, &config));
    }

    #[test]
    fn test_text_changed_restyles_left_block() {
        let config = MarkdownConfig::default();
        let mut tree = tree_with(&["**a**", "b"]);
        let mut caret = caret_at(1, 1);
        let outcome = handle_text_changed(&mut tree, Some(caret_at(0, 5)), &mut caret, &config);
        assert_eq!(outcome, EditOutcome::Restyled);
        let left = tree
            .blocks
            .get(0)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        assert!(left.runs.first().unwrap().attrs.font_weight.is_bold());
    }

    #[test]
    fn test_text_changed_dispatch_order() {
        let config = MarkdownConfig::default();
        let mut tree = tree_with(&["# x"]);
        let mut caret = caret_at(0, 3);
        let outcome = handle_text_changed(&mut tree, None, &mut caret, &config);
        assert_eq!(
            outcome,
            EditOutcome::HeaderCreated(HeaderLevel::new(1).unwrap())
        );

        let mut tree = tree_with(&["- x"]);
        let mut caret = caret_at(0, 3);
        assert_eq!(
            handle_text_changed(&mut tree, None, &mut caret, &config),
            EditOutcome::ListCreated
        );
        assert_eq!(
            handle_text_changed(&mut tree, None, &mut caret, &config),
            EditOutcome::Unchanged
        );
    }

    #[test]
    fn test_edits_on_reconciled_tree() {
        let config = MarkdownConfig::default();
        let mut tree = PresentationDocument::new();
        reconcile(&mut tree, &parse("intro\n\n## plain"), &config);
        let mut caret = caret_at(1, 0);
        assert!(process_header_deleting(&mut tree, &caret, &config));
        caret.offset = 5;
        assert_eq!(
            handle_text_changed(&mut tree, None, &mut caret, &config),
            EditOutcome::Restyled
        );
    }
}
