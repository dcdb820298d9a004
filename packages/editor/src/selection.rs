//! Selection model and post-removal restoration.

use crate::tree::{NodeId, NodeTree};

/// What the user currently has selected in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Multi { start: NodeId, end: NodeId },
}

/// Compute where selection should land after a removal, using the tree as it
/// was *before* the removal was applied: the sibling immediately preceding
/// the first removed node, or its parent when it was a first child. `None`
/// when the first removed node was a first root (nothing sensible to select).
pub(crate) fn restore_after_removal(snapshot: &NodeTree, removed: &[NodeId]) -> Option<NodeId> {
    let first = *removed.first()?;
    match snapshot.previous_sibling(first) {
        Some(previous) => Some(previous),
        None => snapshot.parent_of(first),
    }
}
