//! Streaming Markdown parser.
//!
//! [`parse`] feeds the whole text through the [`machine::Tokenizer`], which
//! builds the document through a [`context::ParseContext`]. Parsing is
//! total: every input yields a document.

mod context;
mod machine;
pub mod marker;

pub use machine::Tokenizer;

use crate::document::MarkdownDocument;
use crate::perf;

/// Parse `text` into a [`MarkdownDocument`].
pub fn parse(text: &str) -> MarkdownDocument {
    let _scope = perf::scope("parse");
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed_str(text);
    tokenizer.finish()
}

impl MarkdownDocument {
    /// Shorthand for [`parse`].
    pub fn parse(text: &str) -> Self {
        parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ToMarkdown;

    #[test]
    fn test_incremental_feed_matches_parse() {
        let text = "# Head\n\nsome *text*\n- item";
        let mut tokenizer = Tokenizer::new();
        for chunk in ["# He", "ad\n\nsome *te", "xt*\n- it", "em"] {
            tokenizer.feed_str(chunk);
        }
        assert_eq!(tokenizer.finish(), parse(text));
    }

    #[test]
    fn test_document_parse_shorthand() {
        assert_eq!(MarkdownDocument::parse("a"), parse("a"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_is_total(text in "\\PC*") {
                let doc = parse(&text);
                let _ = doc.markdown();
            }

            #[test]
            fn parse_is_total_over_markdown_alphabet(
                text in "[#*_~`\\\\ \\-0-9.\\[\\]xa\r\n]{0,64}"
            ) {
                let doc = parse(&text);
                let _ = doc.markdown();
            }

            #[test]
            fn asterisk_runs_follow_toggle_law(n in 1usize..=8) {
                let text = format!("{}x", "*".repeat(n));
                let doc = parse(&text);
                let crate::document::Block::Paragraph(p) = &doc.blocks[0] else {
                    panic!("expected paragraph");
                };
                let styles = p.inlines[0].as_text_run().styles();
                prop_assert_eq!(styles.is_bold(), (n / 2) % 2 == 1);
                prop_assert_eq!(styles.is_italic(), n % 2 == 1);
            }

            #[test]
            fn serialized_markdown_parses_back_to_same_document(
                text in "[#*_~`\\\\ \\-1.xa\n]{0,24}"
            ) {
                let doc = parse(&text);
                prop_assert_eq!(parse(&doc.markdown()), doc);
            }

            #[test]
            fn plain_words_round_trip(words in prop::collection::vec("[a-z]{1,8}", 1..12)) {
                let text = words.join(" ");
                let doc = parse(&text);
                prop_assert_eq!(doc.markdown(), text);
            }
        }
    }
}
