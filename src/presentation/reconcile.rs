//! Bring a presentation tree in line with a document model.
//!
//! Children are walked in lock-step with the model at every level (blocks,
//! list items, text nodes): a node of a compatible kind at the cursor is
//! updated in place, otherwise a new node is inserted at the cursor, and
//! nodes left over past the end of the model are removed.

use std::fmt;

use super::tree::{
    Children, CodeBlockNode, ListItemNode, ListNode, NodeIds, PresentationBlock,
    PresentationDocument, TextAttributes, TextBlockNode, TextNode, TextRole,
};
use crate::config::{FontWeight, MarkdownConfig};
use crate::document::{Block, Inline, ListItem, MarkdownDocument, TextRunStyles};
use crate::perf;

/// Node churn caused by one reconciliation.
///
/// Counts are per node at the level where the decision was made; a subtree
/// inserted as a whole counts once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Kept without any change.
    pub reused: usize,
    /// Kept, with text or attributes rewritten in place.
    pub updated: usize,
    pub inserted: usize,
    pub removed: usize,
}

impl ReconcileStats {
    /// Nodes whose identity was lost or created.
    pub const fn churn(&self) -> usize {
        self.inserted + self.removed
    }
}

impl fmt::Display for ReconcileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reused={} updated={} inserted={} removed={}",
            self.reused, self.updated, self.inserted, self.removed
        )
    }
}

/// Update `tree` in place so it displays `document`.
pub fn reconcile(
    tree: &mut PresentationDocument,
    document: &MarkdownDocument,
    config: &MarkdownConfig,
) -> ReconcileStats {
    let _scope = perf::scope("reconcile");
    let mut reconciler = Reconciler {
        config,
        ids: &mut tree.ids,
        stats: ReconcileStats::default(),
    };
    reconciler.reconcile_children(&mut tree.blocks, &document.blocks);
    let stats = reconciler.stats;
    tracing::debug!(
        reused = stats.reused,
        updated = stats.updated,
        inserted = stats.inserted,
        removed = stats.removed,
        "reconciled presentation tree"
    );
    perf::log_event("reconcile", stats.to_string());
    stats
}

/// Attributes a text run with `styles` is displayed with.
pub fn run_attributes(styles: &TextRunStyles, config: &MarkdownConfig) -> TextAttributes {
    let mut attrs = TextAttributes::base(config);
    if styles.is_bold() {
        attrs.font_weight = FontWeight::BOLD;
    }
    attrs.italic = styles.is_italic();
    attrs.strikethrough = styles.is_strikethrough();
    attrs.monospace = styles.is_inline_code();
    attrs
}

/// Desired state of one text node.
#[derive(Debug, Clone, Copy)]
struct RunSpec<'m> {
    text: &'m str,
    attrs: TextAttributes,
}

/// How one level of the tree matches nodes `N` against models `M`.
trait ChildSync<N, M> {
    fn compatible(&self, node: &N, model: &M) -> bool;
    /// Rewrite `node` to show `model`; returns whether the node itself
    /// changed. Nested children are reconciled separately.
    fn update(&mut self, node: &mut N, model: &M) -> bool;
    fn create(&mut self, model: &M) -> N;
}

struct Reconciler<'a> {
    config: &'a MarkdownConfig,
    ids: &'a mut NodeIds,
    stats: ReconcileStats,
}

impl Reconciler<'_> {
    fn reconcile_children<N, M>(&mut self, children: &mut Children<N>, models: &[M])
    where
        Self: ChildSync<N, M>,
    {
        for (index, model) in models.iter().enumerate() {
            if let Some(node) = children.get_mut(index)
                && <Self as ChildSync<N, M>>::compatible(self, node, model)
            {
                if <Self as ChildSync<N, M>>::update(self, node, model) {
                    self.stats.updated += 1;
                } else {
                    self.stats.reused += 1;
                }
                continue;
            }
            let node = <Self as ChildSync<N, M>>::create(self, model);
            children.insert_after(index.checked_sub(1), node);
            self.stats.inserted += 1;
        }
        while children.len() > models.len() {
            children.remove(children.len() - 1);
            self.stats.removed += 1;
        }
    }

    fn inline_specs<'m>(&self, inlines: &'m [Inline]) -> Vec<RunSpec<'m>> {
        inlines
            .iter()
            .map(|inline| {
                let run = inline.as_text_run();
                RunSpec {
                    text: run.content(),
                    attrs: run_attributes(run.styles(), self.config),
                }
            })
            .collect()
    }

    fn block_specs<'m>(&self, block: &'m Block) -> Vec<RunSpec<'m>> {
        match block {
            Block::Paragraph(paragraph) => self.inline_specs(&paragraph.inlines),
            Block::Header(header) => vec![RunSpec {
                text: header.content(),
                attrs: TextAttributes::heading(self.config, header.level().get()),
            }],
            Block::CodeBlock(_) | Block::List(_) => Vec::new(),
        }
    }

    fn create_runs(&mut self, specs: &[RunSpec<'_>]) -> Children<TextNode> {
        specs
            .iter()
            .map(|spec| <Self as ChildSync<TextNode, RunSpec<'_>>>::create(self, spec))
            .collect()
    }
}

const fn text_role(block: &Block) -> TextRole {
    match block {
        Block::Header(header) => TextRole::Heading(header.level()),
        _ => TextRole::Paragraph,
    }
}

impl ChildSync<PresentationBlock, Block> for Reconciler<'_> {
    fn compatible(&self, node: &PresentationBlock, model: &Block) -> bool {
        matches!(
            (node, model),
            (
                PresentationBlock::Text(_),
                Block::Paragraph(_) | Block::Header(_)
            ) | (PresentationBlock::Code(_), Block::CodeBlock(_))
                | (PresentationBlock::List(_), Block::List(_))
        )
    }

    fn update(&mut self, node: &mut PresentationBlock, model: &Block) -> bool {
        match (node, model) {
            (PresentationBlock::Text(text), Block::Paragraph(_) | Block::Header(_)) => {
                let role = text_role(model);
                let changed = text.role != role;
                text.role = role;
                let specs = self.block_specs(model);
                self.reconcile_children(&mut text.runs, &specs);
                changed
            }
            (PresentationBlock::Code(code), Block::CodeBlock(model)) => {
                let mut changed = false;
                if code.language.as_deref() != model.language() {
                    code.language = model.language().map(str::to_string);
                    changed = true;
                }
                changed |= code.body.set_text(model.content());
                changed |= code.body.set_attrs(TextAttributes::code(self.config));
                changed
            }
            (PresentationBlock::List(list), Block::List(model)) => {
                let changed = list.ordered != model.is_ordered;
                list.ordered = model.is_ordered;
                self.reconcile_children(&mut list.items, &model.items);
                changed
            }
            _ => false,
        }
    }

    fn create(&mut self, model: &Block) -> PresentationBlock {
        match model {
            Block::Paragraph(_) | Block::Header(_) => {
                let mut node = TextBlockNode::new(self.ids.allocate(), text_role(model));
                let specs = self.block_specs(model);
                node.runs = self.create_runs(&specs);
                PresentationBlock::Text(node)
            }
            Block::CodeBlock(code) => {
                let id = self.ids.allocate();
                let body = TextNode::new(
                    self.ids.allocate(),
                    code.content(),
                    TextAttributes::code(self.config),
                );
                PresentationBlock::Code(CodeBlockNode::new(
                    id,
                    code.language().map(str::to_string),
                    body,
                ))
            }
            Block::List(list) => {
                let mut node = ListNode::new(self.ids.allocate(), list.is_ordered);
                node.items = list
                    .items
                    .iter()
                    .map(|item| <Self as ChildSync<ListItemNode, ListItem>>::create(self, item))
                    .collect();
                PresentationBlock::List(node)
            }
        }
    }
}

impl ChildSync<ListItemNode, ListItem> for Reconciler<'_> {
    fn compatible(&self, _node: &ListItemNode, _model: &ListItem) -> bool {
        true
    }

    fn update(&mut self, node: &mut ListItemNode, model: &ListItem) -> bool {
        let checkbox = model.can_check.then_some(model.is_checked);
        let changed = node.checkbox != checkbox;
        node.checkbox = checkbox;
        let specs = self.inline_specs(&model.inlines);
        self.reconcile_children(&mut node.runs, &specs);
        changed
    }

    fn create(&mut self, model: &ListItem) -> ListItemNode {
        let mut node = ListItemNode::new(
            self.ids.allocate(),
            model.can_check.then_some(model.is_checked),
        );
        let specs = self.inline_specs(&model.inlines);
        node.runs = self.create_runs(&specs);
        node
    }
}

impl<'m> ChildSync<TextNode, RunSpec<'m>> for Reconciler<'_> {
    fn compatible(&self, _node: &TextNode, _model: &RunSpec<'m>) -> bool {
        true
    }

    fn update(&mut self, node: &mut TextNode, model: &RunSpec<'m>) -> bool {
        let text_changed = node.set_text(model.text);
        let attrs_changed = node.set_attrs(model.attrs);
        text_changed || attrs_changed
    }

    fn create(&mut self, model: &RunSpec<'m>) -> TextNode {
        TextNode::new(self.ids.allocate(), model.text, model.attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::presentation::tree::{Baseline, Node};

    fn synced(text: &str) -> (PresentationDocument, MarkdownConfig) {
        let config = MarkdownConfig::default();
        let mut tree = PresentationDocument::new();
        reconcile(&mut tree, &parse(text), &config);
        (tree, config)
    }

    #[test]
    fn test_initial_reconcile_builds_every_block() {
        let config = MarkdownConfig::default();
        let mut tree = PresentationDocument::new();
        let doc = parse("# Title\n\nbody\n\n```rs\nx\n```\n\n- a\n- b");
        let stats = reconcile(&mut tree, &doc, &config);
        assert_eq!(stats.inserted, 4);
        assert_eq!(stats.removed, 0);
        assert_eq!(tree.blocks.len(), 4);
        let Some(PresentationBlock::List(list)) = tree.blocks.get(3) else {
            panic!("expected list node");
        };
        assert_eq!(list.items.len(), 2);
        assert_eq!(
            list.items.get(1).map(ListItemNode::plain_text).as_deref(),
            Some("b")
        );
    }

    #[test]
    fn test_reconcile_is_noop_when_synced() {
        let text = "# Title\n\n**bold** text\n\n- [x] a";
        let (mut tree, config) = synced(text);
        let before = tree.node_ids();
        let stats = reconcile(&mut tree, &parse(text), &config);
        assert_eq!(stats.churn(), 0);
        assert_eq!(stats.updated, 0);
        assert_eq!(tree.node_ids(), before);
    }

    #[test]
    fn test_paragraph_edit_preserves_all_identities() {
        let (mut tree, config) = synced("# Title\n\nfirst para\n\nsecond para\n\n- a\n- b");
        let before = tree.node_ids();
        let edited = parse("# Title\n\nfirst para\n\nsecond para, edited\n\n- a\n- b");
        let stats = reconcile(&mut tree, &edited, &config);
        assert_eq!(stats.churn(), 0);
        assert_eq!(stats.updated, 1);
        assert_eq!(tree.node_ids(), before);
        let second = tree
            .blocks
            .get(2)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        assert_eq!(second.plain_text(), "second para, edited");
    }

    #[test]
    fn test_new_span_only_touches_its_paragraph() {
        let (mut tree, config) = synced("one\n\ntwo\n\nthree");
        let first_id = tree.blocks.get(0).map(Node::id);
        let last_id = tree.blocks.get(2).map(Node::id);
        let stats = reconcile(&mut tree, &parse("one\n\nt**w**o\n\nthree"), &config);
        assert_eq!(stats.inserted, 2);
        assert_eq!(tree.blocks.get(0).map(Node::id), first_id);
        assert_eq!(tree.blocks.get(2).map(Node::id), last_id);
        let middle = tree
            .blocks
            .get(1)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        assert_eq!(middle.runs.len(), 3);
        assert_eq!(
            middle.runs.get(1).map(|r| r.attrs.font_weight),
            Some(FontWeight::BOLD)
        );
    }

    #[test]
    fn test_paragraph_becoming_header_switches_role_in_place() {
        let (mut tree, config) = synced("Title");
        let id = tree.blocks.get(0).map(Node::id);
        let stats = reconcile(&mut tree, &parse("# Title"), &config);
        assert_eq!(stats.churn(), 0);
        let block = tree
            .blocks
            .get(0)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        assert_eq!(Some(block.id()), id);
        assert!(matches!(
            block.role,
            TextRole::Heading(level) if level.get() == 1
        ));
        let run = block.runs.get(0).unwrap();
        let expected = config.heading_font_size(1);
        assert!((run.attrs.font_size - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_incompatible_block_is_inserted_and_tail_trimmed() {
        let (mut tree, config) = synced("para\n\nmore");
        let stats = reconcile(&mut tree, &parse("```\ncode\n```"), &config);
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.removed, 2);
        assert_eq!(tree.blocks.len(), 1);
        assert!(matches!(
            tree.blocks.get(0),
            Some(PresentationBlock::Code(_))
        ));
    }

    #[test]
    fn test_shorter_document_removes_trailing_nodes() {
        let (mut tree, config) = synced("a\n\nb\n\nc");
        let stats = reconcile(&mut tree, &parse("a"), &config);
        assert_eq!(stats.removed, 2);
        assert_eq!(tree.blocks.len(), 1);
    }

    #[test]
    fn test_run_attributes_follow_styles() {
        let (tree, config) = synced("**b** *i* `c` ~~s~~");
        let block = tree
            .blocks
            .get(0)
            .and_then(PresentationBlock::as_text)
            .unwrap();
        let attrs: Vec<_> = block.runs.iter().map(|r| r.attrs).collect();
        assert_eq!(attrs[0].font_weight, FontWeight::BOLD);
        assert!(attrs[2].italic);
        assert!(attrs[4].monospace);
        assert!(attrs[6].strikethrough);
        assert_eq!(attrs[1], TextAttributes::base(&config));
        assert!(attrs.iter().all(|a| a.baseline == Baseline::Normal));
    }

    #[test]
    fn test_list_items_are_reconciled_individually() {
        let (mut tree, config) = synced("- a\n- b\n- c");
        let before = tree.node_ids();
        let stats = reconcile(&mut tree, &parse("- a\n- [x] b"), &config);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.inserted, 0);
        let Some(PresentationBlock::List(list)) = tree.blocks.get(0) else {
            panic!("expected list");
        };
        assert_eq!(list.items.get(1).and_then(|i| i.checkbox), Some(true));
        assert_eq!(tree.node_ids(), before[..before.len() - 2]);
    }
}
