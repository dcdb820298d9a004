//! # Merge Resolution
//!
//! Combines two adjacent nodes into one, consulting the type registry for
//! merge capability and cross-type transformations.
//!
//! The merged node keeps the first node's handle and children; only its
//! attributes change. Transformation of the second node may yield several
//! nodes, in which case the surplus ones become siblings after the merge.

use crate::registry::NodeTypeRegistry;
use crate::tree::{NodeId, NodeTree};

/// What a merge attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The first node's type declares no merge; selection should move to it.
    SelectFirst,
    /// No compatible transformation (or a missing handle); nothing changed.
    Unchanged,
    /// The nodes were combined under the first node's handle.
    Merged,
}

pub(crate) fn resolve_merge(
    tree: &mut NodeTree,
    registry: &NodeTypeRegistry,
    first: NodeId,
    second: NodeId,
) -> MergeOutcome {
    let (Some(first_node), Some(second_data)) = (tree.get(first), tree.data_of(second)) else {
        return MergeOutcome::Unchanged;
    };
    let first_type = first_node.type_name.clone();
    let first_attributes = first_node.attributes.clone();

    if !registry.has_merge(&first_type) {
        return MergeOutcome::SelectFirst;
    }

    // A second node of the same type is already compatible; anything else
    // must first become the first node's type.
    let transformed = if second_data.type_name == first_type {
        vec![second_data]
    } else {
        registry.transform(&second_data, &first_type)
    };
    let Some(absorbed) = transformed.first() else {
        return MergeOutcome::Unchanged;
    };

    let Some(combined) = registry.merge(&first_type, &first_attributes, &absorbed.attributes) else {
        return MergeOutcome::Unchanged;
    };

    tree.set_attributes(first, combined);
    let surplus: Vec<NodeId> = transformed[1..]
        .iter()
        .map(|data| tree.insert_data(data))
        .collect();
    tree.remove(&[second]);
    tree.insert_after(first, surplus);

    MergeOutcome::Merged
}
