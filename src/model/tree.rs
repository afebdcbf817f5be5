use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::value::AttributeMap;

/// Case-insensitive display ordering shared by domain roots and child
/// lists. Ties keep their relative order.
fn display_order(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

/// The assembled forest: one root per distinct domain.
///
/// Storage is unordered; the case-insensitive domain ordering is a
/// property of serialization, not of construction.
#[derive(Debug, Default)]
pub struct ResourceForest {
    roots: HashMap<String, InnerNode>,
}

impl ResourceForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate or create the root node for a domain.
    pub fn root_for(&mut self, domain: &str) -> &mut InnerNode {
        self.roots
            .entry(domain.to_string())
            .or_insert_with(|| InnerNode::new(domain))
    }

    pub fn get(&self, domain: &str) -> Option<&InnerNode> {
        self.roots.get(domain)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Serialize for ResourceForest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.roots.len()))?;
        for domain in self
            .roots
            .keys()
            .sorted_by(|a, b| display_order(a.as_str(), b.as_str()))
        {
            map.serialize_entry(domain, &self.roots[domain])?;
        }
        map.end()
    }
}

/// One path segment of the tree.
///
/// Inner children are keyed by name so records sharing a path prefix
/// merge into the same chain. Leaves are plain appends and may repeat a
/// name; two identifiers like `d:type=Foo,name=Bar` and
/// `d:type=Foo,nonsense=Bar` both put a leaf named `Bar` under `d`/`Foo`.
#[derive(Debug)]
pub struct InnerNode {
    name: String,
    inner_nodes: Vec<InnerNode>,
    inner_index: HashMap<String, usize>,
    leaf_nodes: Vec<LeafNode>,
}

impl InnerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner_nodes: Vec::new(),
            inner_index: HashMap::new(),
            leaf_nodes: Vec::new(),
        }
    }

    pub fn node_name(&self) -> &str {
        &self.name
    }

    /// Locate or create the inner child with this name, preserving any
    /// children it already has.
    pub fn get_or_create_inner(&mut self, name: &str) -> &mut InnerNode {
        let index = match self.inner_index.get(name) {
            Some(&index) => index,
            None => {
                self.inner_nodes.push(InnerNode::new(name));
                let index = self.inner_nodes.len() - 1;
                self.inner_index.insert(name.to_string(), index);
                index
            }
        };
        &mut self.inner_nodes[index]
    }

    pub fn add_leaf(&mut self, leaf: LeafNode) {
        self.leaf_nodes.push(leaf);
    }

    /// All children in display order: case-insensitive by name, stable
    /// for ties.
    pub fn child_nodes(&self) -> Vec<TreeNode<'_>> {
        self.inner_nodes
            .iter()
            .map(TreeNode::Inner)
            .chain(self.leaf_nodes.iter().map(TreeNode::Leaf))
            .sorted_by(|a, b| display_order(a.node_name(), b.node_name()))
            .collect()
    }
}

impl Serialize for InnerNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("nodeName", &self.name)?;
        map.serialize_entry("childNodes", &self.child_nodes())?;
        map.end()
    }
}

/// A concrete resource. `node_name` is the last path segment and is not
/// unique among siblings; `object_name` is the full identifier and is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafNode {
    pub node_name: String,
    pub object_name: String,
    pub expanded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_map: Option<AttributeMap>,
}

impl LeafNode {
    pub fn new(
        node_name: String,
        object_name: String,
        expanded: bool,
        attribute_map: Option<AttributeMap>,
    ) -> Self {
        Self {
            node_name,
            object_name,
            expanded,
            attribute_map,
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }
}

/// Borrowed view over either node flavor, used for display ordering and
/// serialization of a child list.
#[derive(Debug, Clone, Copy)]
pub enum TreeNode<'a> {
    Inner(&'a InnerNode),
    Leaf(&'a LeafNode),
}

impl TreeNode<'_> {
    pub fn node_name(&self) -> &str {
        match self {
            TreeNode::Inner(node) => node.node_name(),
            TreeNode::Leaf(leaf) => leaf.node_name(),
        }
    }
}

impl Serialize for TreeNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeNode::Inner(node) => node.serialize(serializer),
            TreeNode::Leaf(leaf) => leaf.serialize(serializer),
        }
    }
}
