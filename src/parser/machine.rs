//! Character-at-a-time tokenizer.
//!
//! The automaton state is an explicit [`State`] plus at most one
//! [`PendingRun`] of identical delimiter (or space) characters. Inline
//! delimiters toggle styles on the shared [`TextRunStyles`] when their run
//! ends; there are no distinct open and close tokens.

use super::context::ParseContext;
use super::marker::{MarkerScanner, Scan, TaskScanner};
use crate::document::{HeaderLevel, MarkdownDocument, TextRunStyles};

/// Backticks that open or close a fenced code block.
const FENCE: &str = "```";
/// Trailing spaces that turn a line terminator into a hard break.
const HARD_BREAK_SPACES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Backtick,
    Asterisk,
    Underscore,
    Tilde,
}

impl Delimiter {
    const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '`' => Some(Self::Backtick),
            '*' => Some(Self::Asterisk),
            '_' => Some(Self::Underscore),
            '~' => Some(Self::Tilde),
            _ => None,
        }
    }

    const fn as_char(self) -> char {
        match self {
            Self::Backtick => '`',
            Self::Asterisk => '*',
            Self::Underscore => '_',
            Self::Tilde => '~',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Delimiter(Delimiter),
    Space,
}

/// A run of identical characters whose meaning is only known once it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRun {
    kind: RunKind,
    count: usize,
}

/// Where inline text lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Target {
    #[default]
    Paragraph,
    ListItem {
        ordered: bool,
    },
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    LineStart,
    HeaderMarker {
        count: usize,
    },
    HeaderContent {
        level: HeaderLevel,
    },
    FenceMarker {
        count: usize,
    },
    FenceInfo {
        info: String,
    },
    CodeBody {
        language: Option<String>,
        line: String,
        first_line: bool,
    },
    ListMarker(MarkerScanner),
    TaskMarker {
        ordered: bool,
        scanner: TaskScanner,
    },
    Inline,
}

/// Streaming Markdown tokenizer driving a [`ParseContext`].
#[derive(Debug, Default)]
pub struct Tokenizer {
    ctx: ParseContext,
    state: State,
    pending: Option<PendingRun>,
    styles: TextRunStyles,
    target: Target,
    escaping: bool,
    saw_cr: bool,
    line_has_text: bool,
    item_continues: bool,
    soft_break: Option<TextRunStyles>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.feed(ch);
        }
    }

    pub fn feed(&mut self, ch: char) {
        if std::mem::take(&mut self.saw_cr) && ch == '\n' {
            return;
        }
        self.saw_cr = ch == '\r';
        let state = std::mem::take(&mut self.state);
        self.state = self.step(state, ch);
    }

    /// Resolve whatever is still pending and hand back the document.
    pub fn finish(mut self) -> MarkdownDocument {
        match std::mem::take(&mut self.state) {
            State::LineStart | State::HeaderContent { .. } => {}
            State::HeaderMarker { count } => self.flush_literal(&"#".repeat(count)),
            State::FenceMarker { count } if count == FENCE.len() => {
                self.open_code_block(None);
            }
            State::FenceMarker { count } => {
                self.resolve_delimiter(Delimiter::Backtick, count, true);
            }
            State::FenceInfo { info } => {
                self.open_code_block(fence_language(&info));
            }
            State::CodeBody {
                language,
                line,
                first_line,
            } => {
                if !line.is_empty() && !is_fence_line(&line) {
                    self.append_code_line(language.as_deref(), &line, first_line);
                }
            }
            State::ListMarker(scanner) => self.flush_literal(scanner.consumed()),
            State::TaskMarker { ordered, scanner } => {
                self.begin_item(ordered, None);
                if !scanner.consumed().is_empty() {
                    self.flush_literal(scanner.consumed());
                }
            }
            State::Inline => {
                if std::mem::take(&mut self.escaping) {
                    self.append_text("\\");
                }
                match self.pending.take() {
                    Some(PendingRun {
                        kind: RunKind::Space,
                        count,
                    }) if self.line_has_text => self.append_text(&" ".repeat(count)),
                    Some(PendingRun {
                        kind: RunKind::Delimiter(delimiter),
                        count,
                    }) => self.resolve_delimiter(delimiter, count, true),
                    _ => {}
                }
            }
        }
        let document = self.ctx.into_document();
        tracing::debug!(blocks = document.len(), "tokenized document");
        document
    }

    fn step(&mut self, state: State, ch: char) -> State {
        match state {
            State::LineStart => self.line_start(ch),
            State::HeaderMarker { count } => self.header_marker(count, ch),
            State::HeaderContent { level } => {
                if is_terminator(ch) {
                    self.ctx.close_block();
                    return self.begin_line();
                }
                self.ctx.ensure_header(level).content_mut().append_char(ch);
                State::HeaderContent { level }
            }
            State::FenceMarker { count } => self.fence_marker(count, ch),
            State::FenceInfo { mut info } => {
                if is_terminator(ch) {
                    return self.open_code_block(fence_language(&info));
                }
                info.push(ch);
                State::FenceInfo { info }
            }
            State::CodeBody {
                language,
                mut line,
                first_line,
            } => {
                if !is_terminator(ch) {
                    line.push(ch);
                    return State::CodeBody {
                        language,
                        line,
                        first_line,
                    };
                }
                if is_fence_line(&line) {
                    tracing::trace!("code fence closed");
                    self.ctx.close_block();
                    return self.begin_line();
                }
                self.append_code_line(language.as_deref(), &line, first_line);
                State::CodeBody {
                    language,
                    line: String::new(),
                    first_line: false,
                }
            }
            State::ListMarker(mut scanner) => match scanner.push(ch) {
                Scan::Pending => State::ListMarker(scanner),
                Scan::Matched(marker) => {
                    self.open_block();
                    self.line_has_text = true;
                    State::TaskMarker {
                        ordered: marker.is_ordered(),
                        scanner: TaskScanner::new(),
                    }
                }
                Scan::Rejected => {
                    self.flush_literal(scanner.consumed());
                    self.inline(ch)
                }
            },
            State::TaskMarker {
                ordered,
                mut scanner,
            } => match scanner.push(ch) {
                Scan::Pending => State::TaskMarker { ordered, scanner },
                Scan::Matched(checked) => {
                    self.begin_item(ordered, Some(checked));
                    State::Inline
                }
                Scan::Rejected => {
                    self.begin_item(ordered, None);
                    if !scanner.consumed().is_empty() {
                        self.flush_literal(scanner.consumed());
                    }
                    self.inline(ch)
                }
            },
            State::Inline => self.inline(ch),
        }
    }

    fn line_start(&mut self, ch: char) -> State {
        if is_terminator(ch) {
            self.blank_line();
            return self.begin_line();
        }
        if self.item_continues {
            // Continuation of a list item after a hard break: indentation is
            // dropped and no block markers are recognized.
            if ch == ' ' {
                return State::LineStart;
            }
            self.item_continues = false;
            return self.inline(ch);
        }
        match ch {
            '#' => State::HeaderMarker { count: 1 },
            '`' => State::FenceMarker { count: 1 },
            c if MarkerScanner::can_start(c) => {
                let mut scanner = MarkerScanner::new();
                let _ = scanner.push(c);
                State::ListMarker(scanner)
            }
            _ => self.inline(ch),
        }
    }

    fn header_marker(&mut self, count: usize, ch: char) -> State {
        if ch == '#' {
            return State::HeaderMarker { count: count + 1 };
        }
        if ch == ' '
            && let Ok(level) = HeaderLevel::new(count)
        {
            self.open_block();
            self.ctx.close_block();
            self.ctx.ensure_header(level);
            tracing::trace!(level = level.get(), "header opened");
            return State::HeaderContent { level };
        }
        self.flush_literal(&"#".repeat(count));
        self.inline(ch)
    }

    fn fence_marker(&mut self, count: usize, ch: char) -> State {
        if ch == '`' {
            return State::FenceMarker { count: count + 1 };
        }
        if count == FENCE.len() {
            if is_terminator(ch) {
                return self.open_code_block(None);
            }
            return State::FenceInfo {
                info: ch.to_string(),
            };
        }
        self.line_has_text = true;
        self.pending = Some(PendingRun {
            kind: RunKind::Delimiter(Delimiter::Backtick),
            count,
        });
        self.inline(ch)
    }

    fn inline(&mut self, ch: char) -> State {
        if is_terminator(ch) {
            return self.end_line();
        }
        if std::mem::take(&mut self.escaping) {
            self.line_has_text = true;
            self.append_text(ch.encode_utf8(&mut [0; 4]));
            return State::Inline;
        }
        if let Some(delimiter) = Delimiter::from_char(ch) {
            self.line_has_text = true;
            self.push_run(RunKind::Delimiter(delimiter));
            return State::Inline;
        }
        if ch == ' ' {
            self.push_run(RunKind::Space);
            return State::Inline;
        }
        self.settle_pending();
        self.line_has_text = true;
        if ch == '\\' {
            self.escaping = true;
        } else {
            self.append_text(ch.encode_utf8(&mut [0; 4]));
        }
        State::Inline
    }

    fn end_line(&mut self) -> State {
        if std::mem::take(&mut self.escaping) {
            self.append_text("\\");
        }
        let hard_break = match self.pending.take() {
            Some(PendingRun {
                kind: RunKind::Space,
                count,
            }) => count >= HARD_BREAK_SPACES,
            Some(PendingRun {
                kind: RunKind::Delimiter(delimiter),
                count,
            }) => {
                self.resolve_delimiter(delimiter, count, false);
                false
            }
            None => false,
        };
        if !self.line_has_text {
            self.blank_line();
            return self.begin_line();
        }
        match (self.target, hard_break) {
            (_, true) => {
                self.append_text("\n");
                self.item_continues = matches!(self.target, Target::ListItem { .. });
            }
            (Target::Paragraph, false) => self.soft_break = Some(self.styles.clone()),
            (Target::ListItem { .. }, false) => {
                self.styles.clear();
                self.target = Target::Paragraph;
            }
        }
        self.begin_line()
    }

    fn push_run(&mut self, kind: RunKind) {
        if let Some(run) = &mut self.pending
            && run.kind == kind
        {
            run.count += 1;
            return;
        }
        self.settle_pending();
        self.pending = Some(PendingRun { kind, count: 1 });
    }

    fn settle_pending(&mut self) {
        match self.pending.take() {
            Some(PendingRun {
                kind: RunKind::Space,
                count,
            }) => self.append_text(&" ".repeat(count)),
            Some(PendingRun {
                kind: RunKind::Delimiter(delimiter),
                count,
            }) => self.resolve_delimiter(delimiter, count, false),
            None => {}
        }
    }

    /// Apply a finished delimiter run. At end of input a run that would open
    /// a new style has nothing left to style and is kept as literal text.
    fn resolve_delimiter(&mut self, delimiter: Delimiter, count: usize, at_end: bool) {
        let Some(next) = self.styles.after_delimiter_run(delimiter.as_char(), count) else {
            self.append_literal_run(delimiter, count);
            return;
        };
        if at_end && next.iter().any(|style| !self.styles.contains(style)) {
            self.append_literal_run(delimiter, count);
            return;
        }
        self.styles = next;
    }

    fn append_literal_run(&mut self, delimiter: Delimiter, count: usize) {
        let text: String = std::iter::repeat_n(delimiter.as_char(), count).collect();
        self.append_text(&text);
    }

    fn flush_literal(&mut self, text: &str) {
        self.line_has_text = true;
        self.append_text(text);
    }

    fn append_text(&mut self, text: &str) {
        match self.target {
            Target::Paragraph => {
                if let Some(styles) = self.soft_break.take() {
                    self.ctx
                        .ensure_paragraph_text_run(&styles)
                        .content_mut()
                        .append_char(' ');
                }
                self.ctx
                    .ensure_paragraph_text_run(&self.styles)
                    .content_mut()
                    .append_str(text);
            }
            Target::ListItem { ordered } => {
                self.ctx
                    .ensure_list_item_text_run(ordered, &self.styles)
                    .content_mut()
                    .append_str(text);
            }
        }
    }

    fn append_code_line(&mut self, language: Option<&str>, line: &str, first_line: bool) {
        let content = self.ctx.ensure_code_block(language).content_mut();
        if !first_line {
            content.append_char('\n');
        }
        content.append_str(line);
    }

    fn open_code_block(&mut self, language: Option<String>) -> State {
        self.open_block();
        self.ctx.close_block();
        self.ctx.ensure_code_block(language.as_deref());
        tracing::trace!(language = ?language, "code fence opened");
        State::CodeBody {
            language,
            line: String::new(),
            first_line: true,
        }
    }

    fn begin_item(&mut self, ordered: bool, checkbox: Option<bool>) {
        self.ctx.start_list_item(ordered, checkbox);
        self.target = Target::ListItem { ordered };
        tracing::trace!(ordered, ?checkbox, "list item started");
    }

    /// A block-level construct starts on this line.
    fn open_block(&mut self) {
        self.styles.clear();
        self.soft_break = None;
        self.item_continues = false;
        self.target = Target::Paragraph;
    }

    fn blank_line(&mut self) {
        self.open_block();
        self.pending = None;
        self.escaping = false;
        self.ctx.close_block();
    }

    const fn begin_line(&mut self) -> State {
        self.line_has_text = false;
        State::LineStart
    }
}

const fn is_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

fn is_fence_line(line: &str) -> bool {
    line.trim_end() == FENCE
}

fn fence_language(info: &str) -> Option<String> {
    let language = info.trim();
    (!language.is_empty()).then(|| language.to_string())
}

#[cfg(test)]
mod tests {
    use crate::document::{Block, ListItem, MarkdownDocument, TextRun, TextRunStyle, ToMarkdown};
    use crate::parser::parse;

    fn only_block(doc: &MarkdownDocument) -> &Block {
        assert_eq!(doc.len(), 1, "expected one block in {doc:?}");
        &doc.blocks[0]
    }

    fn runs(doc: &MarkdownDocument) -> Vec<&TextRun> {
        match only_block(doc) {
            Block::Paragraph(p) => p.inlines.iter().map(|i| i.as_text_run()).collect(),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    fn items(doc: &MarkdownDocument) -> (bool, &[ListItem]) {
        match only_block(doc) {
            Block::List(list) => (list.is_ordered, &list.items),
            other => panic!("expected list, got {other:?}"),
        }
    }

    fn styles_of(run: &TextRun) -> Vec<TextRunStyle> {
        run.styles().iter().collect()
    }

    #[test]
    fn test_header_levels() {
        for level in 1..=6 {
            let text = format!("{} Title", "#".repeat(level));
            let doc = parse(&text);
            let Block::Header(header) = only_block(&doc) else {
                panic!("expected header for {text:?}");
            };
            assert_eq!(header.level().get(), level);
            assert_eq!(header.content(), "Title");
        }
    }

    #[test]
    fn test_hash_without_space_is_paragraph_text() {
        let doc = parse("#Title");
        let runs = runs(&doc);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].content(), "#Title");
        assert!(runs[0].styles().is_empty());
    }

    #[test]
    fn test_seven_hashes_are_literal() {
        let doc = parse("####### x");
        assert_eq!(runs(&doc)[0].content(), "####### x");
    }

    #[test]
    fn test_lone_hash_line_is_literal() {
        let doc = parse("#");
        assert_eq!(runs(&doc)[0].content(), "#");
    }

    #[test]
    fn test_header_ends_at_line_terminator() {
        let doc = parse("# One\n# Two\nbody");
        assert_eq!(doc.len(), 3);
        assert!(matches!(
            &doc.blocks[2],
            Block::Paragraph(p) if p.plain_text() == "body"
        ));
    }

    #[test]
    fn test_styled_runs_round_trip() {
        let doc = parse("**bold** and *italic* and ~~gone~~");
        let runs = runs(&doc);
        let contents: Vec<_> = runs.iter().map(|r| r.content()).collect();
        assert_eq!(contents, ["bold", " and ", "italic", " and ", "gone"]);
        assert_eq!(styles_of(runs[0]), [TextRunStyle::BoldWithAsterisk]);
        assert!(runs[1].styles().is_empty());
        assert_eq!(styles_of(runs[2]), [TextRunStyle::ItalicWithAsterisk]);
        assert!(runs[3].styles().is_empty());
        assert_eq!(styles_of(runs[4]), [TextRunStyle::Strikethrough]);
        assert_eq!(doc.markdown(), "**bold** and *italic* and ~~gone~~");
    }

    #[test]
    fn test_escaped_delimiters_stay_literal() {
        let doc = parse("\\*not italic\\*");
        let runs = runs(&doc);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].content(), "*not italic*");
        assert!(runs[0].styles().is_empty());
    }

    #[test]
    fn test_asterisk_toggle_law() {
        let expected: [&[TextRunStyle]; 5] = [
            &[],
            &[TextRunStyle::ItalicWithAsterisk],
            &[TextRunStyle::BoldWithAsterisk],
            &[TextRunStyle::BoldWithAsterisk, TextRunStyle::ItalicWithAsterisk],
            &[],
        ];
        for (n, styles) in expected.iter().enumerate().skip(1) {
            let text = format!("{}x", "*".repeat(n));
            let doc = parse(&text);
            assert_eq!(styles_of(runs(&doc)[0]), *styles, "run of {n}");
        }
    }

    #[test]
    fn test_underscore_pairs_like_asterisk() {
        let doc = parse("___x");
        assert_eq!(
            styles_of(runs(&doc)[0]),
            [TextRunStyle::BoldWithUnderscore, TextRunStyle::ItalicWithUnderscore]
        );
    }

    #[test]
    fn test_tilde_only_toggles_on_pairs() {
        let doc = parse("~x~");
        let runs = runs(&doc);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].content(), "~x~");

        let doc = parse("~~~x");
        assert_eq!(runs_content(&doc), "~~~x");
    }

    fn runs_content(doc: &MarkdownDocument) -> String {
        runs(doc).iter().map(|r| r.content()).collect()
    }

    #[test]
    fn test_single_backtick_toggles_inline_code() {
        let doc = parse("a `b*c*` d");
        let runs = runs(&doc);
        assert_eq!(runs[1].content(), "b*c*");
        assert_eq!(styles_of(runs[1]), [TextRunStyle::InlineCode]);
        assert!(runs[2].styles().is_empty());
    }

    #[test]
    fn test_double_backtick_is_literal() {
        let doc = parse("``x``");
        assert_eq!(runs_content(&doc), "``x``");
    }

    #[test]
    fn test_unclosed_style_persists_to_end() {
        let doc = parse("a **b c");
        let runs = runs(&doc);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].content(), "b c");
        assert!(runs[1].styles().is_bold());
    }

    #[test]
    fn test_trailing_opening_delimiter_is_literal() {
        let doc = parse("a*");
        assert_eq!(runs_content(&doc), "a*");
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        let doc = parse("a\\");
        assert_eq!(runs_content(&doc), "a\\");
        let doc = parse("a\\\nb");
        assert_eq!(runs_content(&doc), "a\\ b");
    }

    #[test]
    fn test_soft_break_collapses_to_space() {
        let doc = parse("line one\nline two");
        assert_eq!(runs_content(&doc), "line one line two");
    }

    #[test]
    fn test_crlf_is_one_terminator() {
        assert_eq!(parse("a\r\nb"), parse("a\nb"));
        assert_eq!(parse("a\r\n\r\nb").len(), 2);
        assert_eq!(parse("a\r\rb").len(), 2);
    }

    #[test]
    fn test_hard_break_from_two_trailing_spaces() {
        let doc = parse("one  \ntwo");
        assert_eq!(runs_content(&doc), "one\ntwo");
        assert_eq!(doc.markdown(), "one  \ntwo");
    }

    #[test]
    fn test_blank_line_separates_paragraphs() {
        let doc = parse("one\n\ntwo");
        assert_eq!(doc.len(), 2);
        let doc = parse("one\n   \ntwo");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_blank_line_resets_styles() {
        let doc = parse("*open\n\nplain");
        let Block::Paragraph(second) = &doc.blocks[1] else {
            panic!("expected paragraph");
        };
        assert!(second.inlines[0].as_text_run().styles().is_empty());
    }

    #[test]
    fn test_code_fence_with_language() {
        let doc = parse("```rust\nfn main() {}\n  let x = *y;\n```\nafter");
        assert_eq!(doc.len(), 2);
        let Block::CodeBlock(code) = &doc.blocks[0] else {
            panic!("expected code block");
        };
        assert_eq!(code.language(), Some("rust"));
        assert_eq!(code.content(), "fn main() {}\n  let x = *y;");
        assert!(matches!(
            &doc.blocks[1],
            Block::Paragraph(p) if p.plain_text() == "after"
        ));
    }

    #[test]
    fn test_code_fence_without_language() {
        let doc = parse("```\ncode\n```");
        let Block::CodeBlock(code) = only_block(&doc) else {
            panic!("expected code block");
        };
        assert_eq!(code.language(), None);
        assert_eq!(code.content(), "code");
    }

    #[test]
    fn test_unterminated_fence_keeps_content() {
        let doc = parse("```\na\nb");
        let Block::CodeBlock(code) = only_block(&doc) else {
            panic!("expected code block");
        };
        assert_eq!(code.content(), "a\nb");
        assert!(matches!(only_block(&parse("```")), Block::CodeBlock(_)));
    }

    #[test]
    fn test_digit_without_dot_space_is_not_a_list() {
        let doc = parse("1 abc");
        assert_eq!(runs_content(&doc), "1 abc");
        let doc = parse("1.abc");
        assert_eq!(runs_content(&doc), "1.abc");
        let doc = parse("-abc");
        assert_eq!(runs_content(&doc), "-abc");
    }

    #[test]
    fn test_ordered_list() {
        let doc = parse("1. one\n2. *two*");
        let (ordered, items) = items(&doc);
        assert!(ordered);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].plain_text(), "one");
        assert!(items[1].inlines[0].as_text_run().styles().is_italic());
        assert_eq!(doc.markdown(), "1. one\n2. *two*");
    }

    #[test]
    fn test_bullet_list_with_tasks() {
        let doc = parse("- [x] done\n- [ ] todo\n- plain");
        let (ordered, items) = items(&doc);
        assert!(!ordered);
        assert!(items[0].can_check && items[0].is_checked);
        assert!(items[1].can_check && !items[1].is_checked);
        assert!(!items[2].can_check);
        assert_eq!(items[0].plain_text(), "done");
        assert_eq!(items[2].plain_text(), "plain");
    }

    #[test]
    fn test_list_item_styles_reset_per_line() {
        let doc = parse("- *a\n- b");
        let (_, items) = items(&doc);
        assert!(items[1].inlines[0].as_text_run().styles().is_empty());
    }

    #[test]
    fn test_line_after_list_starts_paragraph() {
        let doc = parse("- a\nb");
        assert_eq!(doc.len(), 2);
        assert!(matches!(
            &doc.blocks[1],
            Block::Paragraph(p) if p.plain_text() == "b"
        ));
    }

    #[test]
    fn test_hard_break_continues_list_item() {
        let doc = parse("- a  \n  b");
        let (_, items) = items(&doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].plain_text(), "a\nb");
    }

    #[test]
    fn test_continuation_line_ignores_block_markers() {
        let doc = parse("- a  \n  - b");
        let (_, items) = items(&doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].plain_text(), "a\n- b");
        assert_eq!(doc.markdown(), "- a  \n  \\- b");
    }

    #[test]
    fn test_switching_marker_kind_starts_new_list() {
        let doc = parse("- a\n1. b");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\r\n").is_empty());
    }

    #[test]
    fn test_model_round_trip() {
        let samples = [
            "# Title\n\nBody with **bold** text",
            "\\# not a header",
            "a\\*b and `co\\`de`",
            "```sh\necho hi\n\n```",
            "1. one\n2. two\n\n- [x] done\n- [ ] todo",
            "one  \ntwo\n\n- a  \n  - b",
            "***both*** _under_ __score__",
            "*a**b***",
            "_ *~",
            "~~**a~~____~~b",
            "a *\n\nb",
            "- a ****\n- b",
            "- a  \n****  b",
            "a ****  \nb",
            "****  \nx",
            "a  \n\\# b",
            "`*",
            "* ",
        ];
        for text in samples {
            let doc = parse(text);
            assert_eq!(parse(&doc.markdown()), doc, "round trip of {text:?}");
        }
    }

    #[test]
    fn test_adjacent_styled_runs_round_trip() {
        let doc = parse("*a**b***");
        assert_eq!(doc.markdown(), "*a**b***");
        let parsed = runs(&doc);
        assert_eq!(styles_of(parsed[0]), [TextRunStyle::ItalicWithAsterisk]);
        assert_eq!(
            styles_of(parsed[1]),
            [TextRunStyle::ItalicWithAsterisk, TextRunStyle::BoldWithAsterisk]
        );

        let doc = parse("_ *~");
        assert_eq!(parse(&doc.markdown()), doc);
        assert_eq!(
            styles_of(runs(&parse(&doc.markdown()))[1]),
            [TextRunStyle::ItalicWithUnderscore, TextRunStyle::ItalicWithAsterisk]
        );
    }

    #[test]
    fn test_reopened_strikethrough_round_trips() {
        let doc = parse("~~**a~~____~~b");
        let parsed = runs(&doc);
        assert_eq!(
            styles_of(parsed[1]),
            [TextRunStyle::BoldWithAsterisk, TextRunStyle::Strikethrough]
        );
        let markdown = doc.markdown();
        assert!(!markdown.contains("~~~~"), "got {markdown:?}");
        assert_eq!(parse(&markdown), doc);
    }
}
