//! # Template Conformance
//!
//! A template is a structural specification the document tree may be required
//! to conform to. Lock mode controls enforcement strength: only `All` makes a
//! mismatch count against validity; reconciliation always produces a
//! conforming tree by construction.

use serde::{Deserialize, Serialize};

use crate::tree::{Attributes, NodeData};

/// Enforcement strength of a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateLock {
    #[default]
    None,
    /// Insertion is restricted but existing nodes float freely.
    Insert,
    /// The tree must match the template position for position.
    All,
}

/// One required node: a type, starting attributes, and nested requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSlot {
    pub type_name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<TemplateSlot>,
}

impl TemplateSlot {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_child(mut self, child: TemplateSlot) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub slots: Vec<TemplateSlot>,
    #[serde(default)]
    pub lock: TemplateLock,
}

impl Template {
    /// Structural conformance: same node types, position for position,
    /// recursively, with no surplus nodes.
    pub fn matches(&self, nodes: &[NodeData]) -> bool {
        slots_match(&self.slots, nodes)
    }

    /// Reconcile existing nodes against the template: a node whose type
    /// already conforms is kept (attributes and all, children reconciled in
    /// turn); anything else is synthesized from the slot. The result always
    /// satisfies [`Template::matches`].
    pub fn reconcile(&self, existing: &[NodeData]) -> Vec<NodeData> {
        reconcile_slots(&self.slots, existing)
    }
}

fn slots_match(slots: &[TemplateSlot], nodes: &[NodeData]) -> bool {
    if slots.len() != nodes.len() {
        return false;
    }
    slots.iter().zip(nodes).all(|(slot, node)| {
        slot.type_name == node.type_name && slots_match(&slot.children, &node.children)
    })
}

fn reconcile_slots(slots: &[TemplateSlot], existing: &[NodeData]) -> Vec<NodeData> {
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            match existing
                .get(index)
                .filter(|node| node.type_name == slot.type_name)
            {
                Some(node) => NodeData {
                    type_name: node.type_name.clone(),
                    attributes: node.attributes.clone(),
                    children: reconcile_slots(&slot.children, &node.children),
                },
                None => NodeData {
                    type_name: slot.type_name.clone(),
                    attributes: slot.attributes.clone(),
                    children: reconcile_slots(&slot.children, &[]),
                },
            }
        })
        .collect()
}
