//! # Node Arena
//!
//! The structured-content tree, stored as an arena of nodes addressed by
//! opaque handles.
//!
//! ## Design
//!
//! - Handles (`NodeId`) are stable: a node keeps its handle across attribute
//!   replacement, and merge/replace operations preserve identity only where
//!   they explicitly say so.
//! - Parent/child edges are handle lists; structural operations splice those
//!   lists and allocate new node values instead of aliasing existing ones.
//! - Nodes may be *detached*: registered in the arena without being reachable
//!   from the roots. Reusable fragments live this way.
//! - `NodeData` is the detached value form of a subtree, used at the parser
//!   seam and wherever a subtree is copied wholesale.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Node attributes, keyed by name. Ordered so serialized forms are stable.
pub type Attributes = BTreeMap<String, Value>;

/// Opaque handle to a node in a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

/// Value form of a subtree: what the content parser produces and consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub type_name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<NodeData>,
}

impl NodeData {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_child(mut self, child: NodeData) -> Self {
        self.children.push(child);
        self
    }
}

/// A node as stored in the arena. Children are edges, not values.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub type_name: String,
    pub attributes: Attributes,
    pub children: Vec<NodeId>,
}

/// Arena of nodes plus the ordered list of top-level (root) handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTree {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl NodeTree {
    /// Allocate a detached leaf node.
    pub fn alloc(&mut self, type_name: String, attributes: Attributes) -> NodeId {
        let id = self.next_handle();
        self.nodes.insert(
            id,
            Node {
                type_name,
                attributes,
                children: Vec::new(),
            },
        );
        id
    }

    /// Insert a subtree value, allocating fresh handles throughout.
    /// The returned handle is detached until attached to a sibling list.
    pub fn insert_data(&mut self, data: &NodeData) -> NodeId {
        let children = data
            .children
            .iter()
            .map(|child| self.insert_data(child))
            .collect();
        let id = self.next_handle();
        self.nodes.insert(
            id,
            Node {
                type_name: data.type_name.clone(),
                attributes: data.attributes.clone(),
                children,
            },
        );
        id
    }

    /// Re-register a subtree value under a specific handle. Children still get
    /// fresh handles. Used to compensate operations that dropped a node whose
    /// handle must stay addressable.
    pub fn register(&mut self, id: NodeId, data: &NodeData) {
        let children = data
            .children
            .iter()
            .map(|child| self.insert_data(child))
            .collect();
        self.nodes.insert(
            id,
            Node {
                type_name: data.type_name.clone(),
                attributes: data.attributes.clone(),
                children,
            },
        );
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Swap in a new attribute map for a node. The handle is preserved; the
    /// stored node value is replaced, not mutated.
    pub fn set_attributes(&mut self, id: NodeId, attributes: Attributes) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let next = Node {
            type_name: node.type_name.clone(),
            attributes,
            children: node.children.clone(),
        };
        self.nodes.insert(id, next);
        true
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: Value) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let mut attributes = node.attributes.clone();
        attributes.insert(name.to_string(), value);
        self.set_attributes(id, attributes)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    /// Drop the current root subtrees and install new ones from values.
    /// Detached nodes are left alone.
    pub fn replace_roots(&mut self, data: &[NodeData]) {
        let old = std::mem::take(&mut self.roots);
        for id in old {
            self.drop_subtree(id);
        }
        self.roots = data.iter().map(|d| self.insert_data(d)).collect();
    }

    /// Extract a subtree as a value.
    pub fn data_of(&self, id: NodeId) -> Option<NodeData> {
        let node = self.nodes.get(&id)?;
        Some(NodeData {
            type_name: node.type_name.clone(),
            attributes: node.attributes.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.data_of(*child))
                .collect(),
        })
    }

    pub fn roots_data(&self) -> Vec<NodeData> {
        self.roots.iter().filter_map(|id| self.data_of(*id)).collect()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.children.contains(&id))
            .map(|(parent, _)| *parent)
    }

    /// The sibling immediately before `id` in its parent (or the root list).
    /// `None` for a first child or a detached node.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.sibling_list(id)?;
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        if position == 0 {
            None
        } else {
            Some(siblings[position - 1])
        }
    }

    fn sibling_list(&self, id: NodeId) -> Option<&[NodeId]> {
        if self.roots.contains(&id) {
            return Some(&self.roots);
        }
        let parent = self.parent_of(id)?;
        self.nodes.get(&parent).map(|node| node.children.as_slice())
    }

    /// Remove nodes and their subtrees. Detached nodes are dropped from the
    /// arena; attached ones are detached from their sibling list first.
    pub fn remove(&mut self, ids: &[NodeId]) {
        for &id in ids {
            self.detach(id);
            self.drop_subtree(id);
        }
    }

    /// Replace a contiguous run of targets with replacement handles, splicing
    /// the replacements where the first target sat. The targets' subtrees are
    /// dropped from the arena.
    pub fn replace(&mut self, targets: &[NodeId], replacements: Vec<NodeId>) {
        let Some(&first) = targets.first() else {
            return;
        };
        if let Some(position) = self.roots.iter().position(|&root| root == first) {
            self.roots.splice(position..position + 1, replacements);
        } else if let Some(parent) = self.parent_of(first) {
            let Some(node) = self.nodes.get_mut(&parent) else {
                return;
            };
            let Some(position) = node.children.iter().position(|&child| child == first) else {
                return;
            };
            node.children.splice(position..position + 1, replacements);
        } else {
            // first target is not attached anywhere; nothing to splice into
            return;
        }
        self.drop_subtree(first);
        for &target in &targets[1..] {
            self.detach(target);
            self.drop_subtree(target);
        }
    }

    /// Splice handles into the sibling list right after `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, ids: Vec<NodeId>) {
        if ids.is_empty() {
            return;
        }
        if let Some(position) = self.roots.iter().position(|&root| root == anchor) {
            self.roots.splice(position + 1..position + 1, ids);
            return;
        }
        let Some(parent) = self.parent_of(anchor) else {
            return;
        };
        let Some(node) = self.nodes.get_mut(&parent) else {
            return;
        };
        if let Some(position) = node.children.iter().position(|&child| child == anchor) {
            node.children.splice(position + 1..position + 1, ids);
        }
    }

    /// Collect attached nodes of a type whose attribute equals a value, in
    /// document order. Detached nodes are not searched.
    pub fn find_by_attribute(&self, type_name: &str, attribute: &str, value: &Value) -> Vec<NodeId> {
        let mut found = Vec::new();
        for &root in &self.roots {
            self.collect_by_attribute(root, type_name, attribute, value, &mut found);
        }
        found
    }

    fn collect_by_attribute(
        &self,
        id: NodeId,
        type_name: &str,
        attribute: &str,
        value: &Value,
        found: &mut Vec<NodeId>,
    ) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if node.type_name == type_name && node.attributes.get(attribute) == Some(value) {
            found.push(id);
        }
        for &child in &node.children {
            self.collect_by_attribute(child, type_name, attribute, value, found);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(position) = self.roots.iter().position(|&root| root == id) {
            self.roots.remove(position);
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.retain(|&child| child != id);
            }
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn next_handle(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> NodeData {
        NodeData::new("group")
            .with_child(NodeData::new("paragraph").with_attribute("text", json!("one")))
            .with_child(NodeData::new("paragraph").with_attribute("text", json!("two")))
    }

    #[test]
    fn test_insert_and_extract_roundtrip() {
        let mut tree = NodeTree::default();
        let data = sample();
        let id = tree.insert_data(&data);
        assert_eq!(tree.data_of(id), Some(data));
    }

    #[test]
    fn test_parent_and_previous_sibling() {
        let mut tree = NodeTree::default();
        let root = tree.insert_data(&sample());
        tree.set_roots(vec![root]);

        let children = tree.get(root).unwrap().children.clone();
        assert_eq!(tree.parent_of(children[0]), Some(root));
        assert_eq!(tree.previous_sibling(children[0]), None);
        assert_eq!(tree.previous_sibling(children[1]), Some(children[0]));
        assert_eq!(tree.parent_of(root), None);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = NodeTree::default();
        let root = tree.insert_data(&sample());
        tree.set_roots(vec![root]);
        assert_eq!(tree.node_count(), 3);

        tree.remove(&[root]);
        assert_eq!(tree.node_count(), 0);
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_replace_splices_at_position() {
        let mut tree = NodeTree::default();
        let a = tree.insert_data(&NodeData::new("a"));
        let b = tree.insert_data(&NodeData::new("b"));
        let c = tree.insert_data(&NodeData::new("c"));
        tree.set_roots(vec![a, b, c]);

        let d = tree.insert_data(&NodeData::new("d"));
        tree.replace(&[b], vec![d]);

        assert_eq!(tree.roots(), &[a, d, c]);
        assert!(!tree.contains(b));
    }

    #[test]
    fn test_replace_removes_trailing_targets() {
        let mut tree = NodeTree::default();
        let a = tree.insert_data(&NodeData::new("a"));
        let b = tree.insert_data(&NodeData::new("b"));
        tree.set_roots(vec![a, b]);

        let c = tree.insert_data(&NodeData::new("c"));
        tree.replace(&[a, b], vec![c]);

        assert_eq!(tree.roots(), &[c]);
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
    }

    #[test]
    fn test_register_preserves_handle() {
        let mut tree = NodeTree::default();
        let data = NodeData::new("paragraph").with_attribute("text", json!("kept"));
        let id = tree.insert_data(&data);
        tree.remove(&[id]);
        assert!(!tree.contains(id));

        tree.register(id, &data);
        assert_eq!(tree.data_of(id), Some(data));
    }

    #[test]
    fn test_set_attributes_keeps_children() {
        let mut tree = NodeTree::default();
        let root = tree.insert_data(&sample());
        let children = tree.get(root).unwrap().children.clone();

        let mut attributes = Attributes::new();
        attributes.insert("align".to_string(), json!("wide"));
        assert!(tree.set_attributes(root, attributes));

        let node = tree.get(root).unwrap();
        assert_eq!(node.children, children);
        assert_eq!(node.attributes.get("align"), Some(&json!("wide")));
    }

    #[test]
    fn test_find_by_attribute_searches_attached_only() {
        let mut tree = NodeTree::default();
        let wanted = json!(7);
        let attached = tree.insert_data(&NodeData::new("reference").with_attribute("ref", wanted.clone()));
        let _detached =
            tree.insert_data(&NodeData::new("reference").with_attribute("ref", wanted.clone()));
        tree.set_roots(vec![attached]);

        assert_eq!(tree.find_by_attribute("reference", "ref", &wanted), vec![attached]);
    }

    #[test]
    fn test_replace_roots_keeps_detached_nodes() {
        let mut tree = NodeTree::default();
        let root = tree.insert_data(&NodeData::new("paragraph"));
        tree.set_roots(vec![root]);
        let detached = tree.insert_data(&NodeData::new("paragraph"));

        tree.replace_roots(&[NodeData::new("heading")]);

        assert!(!tree.contains(root));
        assert!(tree.contains(detached));
        assert_eq!(tree.roots_data()[0].type_name, "heading");
    }

    #[test]
    fn test_insert_after() {
        let mut tree = NodeTree::default();
        let a = tree.insert_data(&NodeData::new("a"));
        let c = tree.insert_data(&NodeData::new("c"));
        tree.set_roots(vec![a, c]);

        let b = tree.insert_data(&NodeData::new("b"));
        tree.insert_after(a, vec![b]);
        assert_eq!(tree.roots(), &[a, b, c]);
    }
}
