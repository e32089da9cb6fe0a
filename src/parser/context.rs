//! Builder over the document under construction.

use crate::document::{
    Block, CodeBlock, Header, HeaderLevel, Inline, List, ListItem, MarkdownDocument, Paragraph,
    TextRun, TextRunStyles,
};

/// Mediates every write the tokenizer makes to the block list.
///
/// `ensure_*` reuses the last block when it is still open and of the
/// requested kind; [`ParseContext::close_block`] forces the next call to
/// start a fresh block.
#[derive(Debug, Default)]
pub struct ParseContext {
    blocks: Vec<Block>,
    block_closed: bool,
}

impl ParseContext {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[cfg(test)]
    pub const fn is_block_closed(&self) -> bool {
        self.block_closed
    }

    pub const fn close_block(&mut self) {
        self.block_closed = true;
    }

    pub fn into_document(self) -> MarkdownDocument {
        MarkdownDocument::from_blocks(self.blocks)
    }

    pub fn ensure_paragraph(&mut self) -> &mut Paragraph {
        let reuse = !self.block_closed && matches!(self.blocks.last(), Some(Block::Paragraph(_)));
        if !reuse {
            self.open(Block::Paragraph(Paragraph::new()));
        }
        match self.blocks.last_mut() {
            Some(Block::Paragraph(p)) => p,
            _ => unreachable!("last block was just ensured to be a paragraph"),
        }
    }

    pub fn ensure_header(&mut self, level: HeaderLevel) -> &mut Header {
        let reuse = !self.block_closed
            && matches!(
                self.blocks.last(),
                Some(Block::Header(h)) if h.level() == level
            );
        if !reuse {
            self.open(Block::Header(Header::new(level)));
        }
        match self.blocks.last_mut() {
            Some(Block::Header(h)) => h,
            _ => unreachable!("last block was just ensured to be a header"),
        }
    }

    pub fn ensure_code_block(&mut self, language: Option<&str>) -> &mut CodeBlock {
        let reuse = !self.block_closed
            && matches!(
                self.blocks.last(),
                Some(Block::CodeBlock(c)) if c.language() == language
            );
        if !reuse {
            let language = language.map(str::to_string);
            self.open(Block::CodeBlock(CodeBlock::new(language)));
        }
        match self.blocks.last_mut() {
            Some(Block::CodeBlock(c)) => c,
            _ => unreachable!("last block was just ensured to be a code block"),
        }
    }

    pub fn ensure_list(&mut self, ordered: bool) -> &mut List {
        let reuse = !self.block_closed
            && matches!(
                self.blocks.last(),
                Some(Block::List(l)) if l.is_ordered == ordered
            );
        if !reuse {
            self.open(Block::List(List::new(ordered)));
        }
        match self.blocks.last_mut() {
            Some(Block::List(l)) => l,
            _ => unreachable!("last block was just ensured to be a list"),
        }
    }

    /// Append a new item to the current list (opening one if needed).
    pub fn start_list_item(&mut self, ordered: bool, checkbox: Option<bool>) -> &mut ListItem {
        let list = self.ensure_list(ordered);
        let mut item = ListItem::new();
        if let Some(checked) = checkbox {
            item = item.checkable(checked);
        }
        list.items.push(item);
        let last = list.items.len() - 1;
        &mut list.items[last]
    }

    /// The run that text with `styles` should be appended to in the current
    /// paragraph.
    pub fn ensure_paragraph_text_run(&mut self, styles: &TextRunStyles) -> &mut TextRun {
        ensure_text_run(&mut self.ensure_paragraph().inlines, styles)
    }

    /// Like [`Self::ensure_paragraph_text_run`] for the last item of the
    /// current list. Starts an unchecked item if the list has none.
    pub fn ensure_list_item_text_run(
        &mut self,
        ordered: bool,
        styles: &TextRunStyles,
    ) -> &mut TextRun {
        let list = self.ensure_list(ordered);
        if list.items.is_empty() {
            list.items.push(ListItem::new());
        }
        let last = list.items.len() - 1;
        ensure_text_run(&mut list.items[last].inlines, styles)
    }

    fn open(&mut self, block: Block) {
        tracing::trace!(
            kind = block.kind_name(),
            index = self.blocks.len(),
            "open block"
        );
        self.block_closed = false;
        self.blocks.push(block);
    }
}

/// Reuse the last run when its styles match, recycle it when it is empty,
/// otherwise append a new run carrying a copy of `styles`.
fn ensure_text_run<'a>(inlines: &'a mut Vec<Inline>, styles: &TextRunStyles) -> &'a mut TextRun {
    let reusable = match inlines.last_mut() {
        Some(Inline::TextRun(run)) if run.styles() == styles => true,
        Some(Inline::TextRun(run)) if run.is_empty() => {
            run.styles_mut().copy_from(styles);
            true
        }
        _ => false,
    };
    if !reusable {
        let run = TextRun::styled(String::new(), styles.clone());
        inlines.push(Inline::TextRun(run));
    }
    let last = inlines.len() - 1;
    inlines[last].as_text_run_mut()
}
