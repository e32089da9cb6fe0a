//! Live re-styling of a presentation tree while its text is edited.

mod edits;
mod matcher;

pub use edits::{
    Caret, EditOutcome, handle_text_changed, process_header_creation, process_header_deleting,
    process_list_creation, restyle_block,
};
pub use matcher::{
    AttributeChange, DelimiterMatcher, TagMatch, apply_header_style, apply_paragraph_style,
    find_matches, heading_level, prepare_paragraph, process_bold, process_heading,
    process_italic, process_strikethrough, process_subscript, process_superscript,
    process_tag_pairs,
};
