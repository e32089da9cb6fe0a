//! Delimiter text written between neighbouring text runs.
//!
//! A block's runs are rendered as style transitions: only the styles that
//! end are closed and only the styles that start are opened. Adjacent
//! delimiters of the same character are read back as one run, so each
//! transition is replayed through the tokenizer's toggle rules before it
//! is used.

use std::collections::{HashSet, VecDeque};

use super::style::{TextRunStyle, TextRunStyles};

/// Delimiter runs that change styles without producing text. A run of four
/// toggles bold twice and separates two same-character runs.
const STYLE_RUNS: [(char, usize); 10] = [
    ('*', 1),
    ('*', 2),
    ('*', 3),
    ('_', 1),
    ('_', 2),
    ('_', 3),
    ('~', 2),
    ('`', 1),
    ('*', 4),
    ('_', 4),
];

/// Longest run sequence searched when the direct transition reads back wrong.
const MAX_SEARCH_RUNS: usize = 6;

/// Delimiter text that takes the reader's style set from `from` to `to`.
///
/// Falls back to the direct transition when no run sequence reaches `to`,
/// which only happens for style orders the tokenizer cannot produce (for
/// example a style opened inside inline code).
pub(crate) fn transition(from: &TextRunStyles, to: &TextRunStyles) -> String {
    if from == to {
        return String::new();
    }
    let direct = direct_transition(from, to);
    if read_back(from, &direct).as_ref() == Some(to) {
        return direct;
    }
    search_transition(from, to).unwrap_or_else(|| {
        tracing::trace!(?from, ?to, "no delimiter sequence reaches style set");
        direct
    })
}

/// Delimiter text that leaves `styles` unchanged. A line holding only a
/// hard break needs it, since a line without text or delimiters is blank.
pub(crate) fn no_op(styles: &TextRunStyles) -> String {
    search_transition(styles, styles).unwrap_or_default()
}

/// Close what `to` does not keep, innermost first, then open the rest of
/// `to` in order.
fn direct_transition(from: &TextRunStyles, to: &TextRunStyles) -> String {
    let kept = kept_prefix(from, to);
    let mut out = String::new();
    for style in from.iter().rev() {
        if !to.iter().take(kept).any(|k| k == style) {
            out.push_str(style.delimiter());
        }
    }
    for style in to.iter().skip(kept) {
        out.push_str(style.delimiter());
    }
    out
}

/// Length of the longest prefix of `to` that `from` holds in the same
/// relative order. Inline code is never kept, since nothing else can
/// change while it is open.
fn kept_prefix(from: &TextRunStyles, to: &TextRunStyles) -> usize {
    let mut held = from.iter();
    to.iter()
        .take_while(|style| *style != TextRunStyle::InlineCode && held.any(|s| s == *style))
        .count()
}

/// Replay `text` as a sequence of delimiter runs starting from `from`.
fn read_back(from: &TextRunStyles, text: &str) -> Option<TextRunStyles> {
    let mut styles = from.clone();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let mut count = 1;
        while chars.next_if_eq(&ch).is_some() {
            count += 1;
        }
        styles = styles.after_delimiter_run(ch, count)?;
    }
    Some(styles)
}

/// Breadth-first search over delimiter runs, never placing two runs of the
/// same character next to each other.
fn search_transition(from: &TextRunStyles, to: &TextRunStyles) -> Option<String> {
    let mut seen = HashSet::from([(from.clone(), None)]);
    let mut queue = VecDeque::from([(from.clone(), None::<char>, String::new(), 0)]);
    while let Some((styles, last, text, depth)) = queue.pop_front() {
        if depth == MAX_SEARCH_RUNS {
            continue;
        }
        for (ch, count) in STYLE_RUNS {
            if last == Some(ch) {
                continue;
            }
            let Some(next) = styles.after_delimiter_run(ch, count) else {
                continue;
            };
            let mut next_text = text.clone();
            next_text.extend(std::iter::repeat_n(ch, count));
            if &next == to {
                return Some(next_text);
            }
            if seen.insert((next.clone(), Some(ch))) {
                queue.push_back((next, Some(ch), next_text, depth + 1));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextRunStyle::{
        BoldWithAsterisk, BoldWithUnderscore, InlineCode, ItalicWithAsterisk,
        ItalicWithUnderscore, Strikethrough,
    };

    fn styles(list: &[TextRunStyle]) -> TextRunStyles {
        TextRunStyles::from_styles(list.iter().copied()).unwrap()
    }

    #[test]
    fn test_opening_nests_in_order() {
        let to = styles(&[BoldWithAsterisk, ItalicWithUnderscore]);
        assert_eq!(transition(&TextRunStyles::new(), &to), "**_");
        assert_eq!(transition(&to, &TextRunStyles::new()), "_**");
    }

    #[test]
    fn test_only_changed_styles_are_written() {
        let from = styles(&[ItalicWithAsterisk]);
        let to = styles(&[ItalicWithAsterisk, BoldWithAsterisk]);
        assert_eq!(transition(&from, &to), "**");
        assert_eq!(transition(&to, &from), "**");
        assert_eq!(transition(&to, &to), "");
    }

    #[test]
    fn test_merged_closing_run_reads_back() {
        let from = styles(&[ItalicWithAsterisk, BoldWithAsterisk]);
        assert_eq!(transition(&from, &TextRunStyles::new()), "***");
    }

    #[test]
    fn test_reopened_style_is_separated() {
        let from = styles(&[ItalicWithAsterisk, BoldWithAsterisk]);
        let to = styles(&[BoldWithAsterisk, ItalicWithAsterisk]);
        let text = transition(&from, &to);
        assert_eq!(read_back(&from, &text), Some(to));
        assert!(!text.contains("**"), "got {text:?}");
    }

    #[test]
    fn test_italic_before_bold_from_nothing() {
        let to = styles(&[ItalicWithAsterisk, BoldWithAsterisk]);
        let text = transition(&TextRunStyles::new(), &to);
        assert_eq!(read_back(&TextRunStyles::new(), &text), Some(to));
    }

    #[test]
    fn test_strikethrough_reopen_avoids_literal_tildes() {
        let from = styles(&[Strikethrough, BoldWithUnderscore]);
        let to = styles(&[BoldWithUnderscore, Strikethrough]);
        let text = transition(&from, &to);
        assert!(!text.contains("~~~~"), "got {text:?}");
        assert_eq!(read_back(&from, &text), Some(to));
    }

    #[test]
    fn test_inline_code_closes_before_other_styles() {
        let from = styles(&[BoldWithAsterisk, InlineCode]);
        let to = styles(&[InlineCode]);
        let text = transition(&from, &to);
        assert!(text.starts_with('`'), "got {text:?}");
        assert_eq!(read_back(&from, &text), Some(to));
    }

    #[test]
    fn test_unreachable_order_falls_back_to_direct() {
        let to = styles(&[InlineCode, BoldWithAsterisk]);
        assert_eq!(transition(&TextRunStyles::new(), &to), "`**");
    }

    #[test]
    fn test_no_op_leaves_styles_unchanged() {
        assert_eq!(no_op(&TextRunStyles::new()), "****");
        let bold = styles(&[BoldWithAsterisk, BoldWithUnderscore]);
        let text = no_op(&bold);
        assert!(!text.is_empty());
        assert_eq!(read_back(&bold, &text), Some(bold));
    }

    #[test]
    fn test_read_back_rejects_literal_runs() {
        assert_eq!(read_back(&TextRunStyles::new(), "~~~~"), None);
        assert_eq!(read_back(&TextRunStyles::new(), "``"), None);
    }
}
