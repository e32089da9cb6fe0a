//! Presentation tree and the reconciler that keeps it in sync with a
//! [`crate::document::MarkdownDocument`].

mod reconcile;
mod tree;

pub use reconcile::{ReconcileStats, reconcile, run_attributes};
pub use tree::{
    Baseline, Children, CodeBlockNode, ListItemNode, ListNode, Node, NodeId, NodeIds,
    PresentationBlock, PresentationDocument, TextAttributes, TextBlockNode, TextNode, TextRole,
};
