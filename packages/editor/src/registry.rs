//! # Node Type Registry
//!
//! Type-level behavior declarations the coordinator consults: how two nodes
//! of a type combine, how a node of one type becomes another, which type an
//! empty document of a given format starts with, and which type name marks a
//! reusable-fragment reference.

use std::collections::HashMap;

use crate::tree::{Attributes, NodeData};

/// Combines the attributes of two nodes of the same type into one.
pub type MergeFn = Box<dyn Fn(&Attributes, &Attributes) -> Attributes + Send + Sync>;

/// Transforms a node into zero, one or more nodes of the declaring type.
pub type TransformFn = Box<dyn Fn(&NodeData) -> Vec<NodeData> + Send + Sync>;

/// Behavior declared by a single node type.
#[derive(Default)]
pub struct NodeTypeDef {
    merge: Option<MergeFn>,
    transforms_from: HashMap<String, TransformFn>,
}

impl NodeTypeDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_merge(
        mut self,
        merge: impl Fn(&Attributes, &Attributes) -> Attributes + Send + Sync + 'static,
    ) -> Self {
        self.merge = Some(Box::new(merge));
        self
    }

    /// Declare how a node of `source` type becomes one (or more) of this type.
    pub fn with_transform_from(
        mut self,
        source: impl Into<String>,
        transform: impl Fn(&NodeData) -> Vec<NodeData> + Send + Sync + 'static,
    ) -> Self {
        self.transforms_from.insert(source.into(), Box::new(transform));
        self
    }
}

pub struct NodeTypeRegistry {
    types: HashMap<String, NodeTypeDef>,
    default_type_per_format: HashMap<String, String>,
    reference_type: String,
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            default_type_per_format: HashMap::new(),
            reference_type: "reference".to_string(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, def: NodeTypeDef) {
        self.types.insert(name.into(), def);
    }

    pub fn set_default_for_format(&mut self, format: impl Into<String>, type_name: impl Into<String>) {
        self.default_type_per_format.insert(format.into(), type_name.into());
    }

    pub fn default_type_for_format(&self, format: &str) -> Option<&str> {
        self.default_type_per_format.get(format).map(String::as_str)
    }

    pub fn set_reference_type(&mut self, type_name: impl Into<String>) {
        self.reference_type = type_name.into();
    }

    /// Type name of nodes that point at a reusable entry instead of carrying
    /// their own content.
    pub fn reference_type(&self) -> &str {
        &self.reference_type
    }

    pub fn has_merge(&self, type_name: &str) -> bool {
        self.types
            .get(type_name)
            .map_or(false, |def| def.merge.is_some())
    }

    pub fn merge(&self, type_name: &str, a: &Attributes, b: &Attributes) -> Option<Attributes> {
        let merge = self.types.get(type_name)?.merge.as_ref()?;
        Some(merge(a, b))
    }

    /// Transform `data` into the target type. Empty when no transformation is
    /// declared or the transformation itself yields nothing.
    pub fn transform(&self, data: &NodeData, target: &str) -> Vec<NodeData> {
        match self
            .types
            .get(target)
            .and_then(|def| def.transforms_from.get(&data.type_name))
        {
            Some(transform) => transform(data),
            None => Vec::new(),
        }
    }
}
