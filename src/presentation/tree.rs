//! Mutable presentation tree.
//!
//! The tree is owned by whoever displays the document. Every node carries
//! a [`NodeId`] that survives in-place updates, so state attached to a node
//! from outside (a caret anchor, a selection) stays valid as long as the
//! node itself is kept.

use std::fmt;

use crate::config::{FontWeight, MarkdownConfig};
use crate::document::HeaderLevel;

/// Stable identity of a presentation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocator for fresh [`NodeId`]s. Ids are never reused within a tree.
#[derive(Debug, Default)]
pub struct NodeIds {
    next: u64,
}

impl NodeIds {
    pub const fn allocate(&mut self) -> NodeId {
        self.next += 1;
        NodeId(self.next)
    }
}

/// Anything with a [`NodeId`].
pub trait Node {
    fn id(&self) -> NodeId;
}

/// Vertical placement of a text node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Baseline {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

/// Typographic attributes of a leaf text node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAttributes {
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub italic: bool,
    pub strikethrough: bool,
    pub baseline: Baseline,
    pub monospace: bool,
}

impl TextAttributes {
    /// Plain body text.
    pub const fn base(config: &MarkdownConfig) -> Self {
        Self {
            font_size: config.font_size,
            font_weight: FontWeight::NORMAL,
            italic: false,
            strikethrough: false,
            baseline: Baseline::Normal,
            monospace: false,
        }
    }

    /// Header text for `level`, which is clamped into `1..=6`.
    pub fn heading(config: &MarkdownConfig, level: usize) -> Self {
        Self {
            font_size: config.heading_font_size(level),
            font_weight: config.heading_font_weight(level),
            ..Self::base(config)
        }
    }

    pub const fn code(config: &MarkdownConfig) -> Self {
        Self {
            monospace: true,
            ..Self::base(config)
        }
    }
}

impl fmt::Display for TextAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size={} weight={}", self.font_size, self.font_weight.0)?;
        if self.italic {
            f.write_str(" italic")?;
        }
        if self.strikethrough {
            f.write_str(" strike")?;
        }
        match self.baseline {
            Baseline::Normal => {}
            Baseline::Superscript => f.write_str(" super")?,
            Baseline::Subscript => f.write_str(" sub")?,
        }
        if self.monospace {
            f.write_str(" mono")?;
        }
        Ok(())
    }
}

/// Ordered children of a presentation node.
#[derive(Debug, Clone)]
pub struct Children<T> {
    nodes: Vec<T>,
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Children<T> {
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.nodes.get_mut(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.nodes.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.nodes.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.nodes.iter_mut()
    }

    /// Insert `node` right after `anchor`, or at the front when `anchor` is
    /// `None`. Returns the index of the inserted node.
    ///
    /// # Panics
    /// Panics if `anchor` is out of bounds.
    pub fn insert_after(&mut self, anchor: Option<usize>, node: T) -> usize {
        let index = anchor.map_or(0, |i| i + 1);
        self.nodes.insert(index, node);
        index
    }

    pub fn append(&mut self, node: T) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> T {
        self.nodes.remove(index)
    }
}

impl<T: Node> Children<T> {
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }
}

impl<T> FromIterator<T> for Children<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Children<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Leaf node holding styled text.
#[derive(Debug, Clone)]
pub struct TextNode {
    id: NodeId,
    text: String,
    pub attrs: TextAttributes,
}

impl TextNode {
    pub fn new(id: NodeId, text: impl Into<String>, attrs: TextAttributes) -> Self {
        Self {
            id,
            text: text.into(),
            attrs,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; returns whether it changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        text.clone_into(&mut self.text);
        true
    }

    /// Replace the attributes; returns whether they changed.
    pub fn set_attrs(&mut self, attrs: TextAttributes) -> bool {
        if self.attrs == attrs {
            return false;
        }
        self.attrs = attrs;
        true
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl Node for TextNode {
    fn id(&self) -> NodeId {
        self.id
    }
}

/// What a text block currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Paragraph,
    Heading(HeaderLevel),
}

/// Block of inline text nodes: a paragraph or a header.
#[derive(Debug, Clone)]
pub struct TextBlockNode {
    id: NodeId,
    pub role: TextRole,
    pub runs: Children<TextNode>,
}

impl TextBlockNode {
    pub const fn new(id: NodeId, role: TextRole) -> Self {
        Self {
            id,
            role,
            runs: Children::new(),
        }
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(TextNode::text).collect()
    }
}

impl Node for TextBlockNode {
    fn id(&self) -> NodeId {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct CodeBlockNode {
    id: NodeId,
    pub language: Option<String>,
    pub body: TextNode,
}

impl CodeBlockNode {
    pub const fn new(id: NodeId, language: Option<String>, body: TextNode) -> Self {
        Self { id, language, body }
    }
}

impl Node for CodeBlockNode {
    fn id(&self) -> NodeId {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct ListItemNode {
    id: NodeId,
    pub checkbox: Option<bool>,
    pub runs: Children<TextNode>,
}

impl ListItemNode {
    pub const fn new(id: NodeId, checkbox: Option<bool>) -> Self {
        Self {
            id,
            checkbox,
            runs: Children::new(),
        }
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(TextNode::text).collect()
    }
}

impl Node for ListItemNode {
    fn id(&self) -> NodeId {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct ListNode {
    id: NodeId,
    pub ordered: bool,
    pub items: Children<ListItemNode>,
}

impl ListNode {
    pub const fn new(id: NodeId, ordered: bool) -> Self {
        Self {
            id,
            ordered,
            items: Children::new(),
        }
    }
}

impl Node for ListNode {
    fn id(&self) -> NodeId {
        self.id
    }
}

/// A top-level presentation node.
#[derive(Debug, Clone)]
pub enum PresentationBlock {
    Text(TextBlockNode),
    Code(CodeBlockNode),
    List(ListNode),
}

impl PresentationBlock {
    pub const fn as_text(&self) -> Option<&TextBlockNode> {
        match self {
            Self::Text(block) => Some(block),
            _ => None,
        }
    }

    pub const fn as_text_mut(&mut self) -> Option<&mut TextBlockNode> {
        match self {
            Self::Text(block) => Some(block),
            _ => None,
        }
    }
}

impl Node for PresentationBlock {
    fn id(&self) -> NodeId {
        match self {
            Self::Text(block) => block.id(),
            Self::Code(block) => block.id(),
            Self::List(block) => block.id(),
        }
    }
}

/// Root of the presentation tree.
#[derive(Debug, Default)]
pub struct PresentationDocument {
    pub blocks: Children<PresentationBlock>,
    pub ids: NodeIds,
}

impl PresentationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every node id in document order, for identity comparisons.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for block in &self.blocks {
            ids.push(block.id());
            match block {
                PresentationBlock::Text(text) => ids.extend(text.runs.iter().map(Node::id)),
                PresentationBlock::Code(code) => ids.push(code.body.id()),
                PresentationBlock::List(list) => {
                    for item in &list.items {
                        ids.push(item.id());
                        ids.extend(item.runs.iter().map(Node::id));
                    }
                }
            }
        }
        ids
    }
}

impl fmt::Display for PresentationDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            match block {
                PresentationBlock::Text(text) => {
                    match text.role {
                        TextRole::Paragraph => writeln!(f, "{} paragraph", text.id())?,
                        TextRole::Heading(level) => {
                            writeln!(f, "{} heading({})", text.id(), level.get())?;
                        }
                    }
                    write_runs(f, &text.runs, 1)?;
                }
                PresentationBlock::Code(code) => {
                    writeln!(
                        f,
                        "{} code({})",
                        code.id(),
                        code.language.as_deref().unwrap_or("")
                    )?;
                    write_run(f, &code.body, 1)?;
                }
                PresentationBlock::List(list) => {
                    let kind = if list.ordered { "ordered" } else { "bullet" };
                    writeln!(f, "{} list({kind})", list.id())?;
                    for item in &list.items {
                        let mark = match item.checkbox {
                            Some(true) => " [x]",
                            Some(false) => " [ ]",
                            None => "",
                        };
                        writeln!(f, "  {} item{mark}", item.id())?;
                        write_runs(f, &item.runs, 2)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn write_runs(f: &mut fmt::Formatter<'_>, runs: &Children<TextNode>, depth: usize) -> fmt::Result {
    for run in runs {
        write_run(f, run, depth)?;
    }
    Ok(())
}

fn write_run(f: &mut fmt::Formatter<'_>, run: &TextNode, depth: usize) -> fmt::Result {
    writeln!(
        f,
        "{:indent$}{} {:?} [{}]",
        "",
        run.id(),
        run.text(),
        run.attrs,
        indent = depth * 2
    )
}
