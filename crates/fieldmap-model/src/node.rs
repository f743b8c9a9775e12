//! Canonical schema tree built from a JSON document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name given to the synthetic child that samples an array's first element.
pub const ARRAY_ITEM_NAME: &str = "item";

/// Kind of JSON value a node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeType {
    /// Lowercase identifier, identical to the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// True for `object` and `array`.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in a canonical schema tree.
///
/// `children` is present only for objects (one entry per property, in
/// document order) and for non-empty arrays (a single child named
/// [`ARRAY_ITEM_NAME`]). Scalars and empty arrays have no children at all.
/// Nodes are never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaNode {
    name: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl SchemaNode {
    /// Node without children.
    ///
    /// An `object` leaf still carries an empty child list so the
    /// object/children invariant holds; every other kind carries none.
    pub fn leaf(name: impl Into<String>, node_type: NodeType) -> Self {
        let children = match node_type {
            NodeType::Object => Some(Vec::new()),
            _ => None,
        };
        Self {
            name: name.into(),
            node_type,
            children,
            metadata: BTreeMap::new(),
        }
    }

    /// Object node with its properties in declaration order.
    pub fn object(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            node_type: NodeType::Object,
            children: Some(children),
            metadata: BTreeMap::new(),
        }
    }

    /// Array node sampled from its first element, if any.
    pub fn array(name: impl Into<String>, item: Option<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            node_type: NodeType::Array,
            children: item.map(|item| vec![item]),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach an extension metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Children as a slice; empty when the node has none.
    pub fn children(&self) -> &[SchemaNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Children distinguishing "absent" from "present but empty".
    pub fn children_opt(&self) -> Option<&[SchemaNode]> {
        self.children.as_deref()
    }

    /// A leaf has no children, whether the list is absent or empty.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// First child with exactly this name.
    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children().iter().find(|child| child.name == name)
    }

    /// Longest root-to-leaf chain, counting this node as depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(SchemaNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Dotted paths of every leaf below this node, in document order.
    ///
    /// This node's own name is not part of any path.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for child in self.children() {
            collect_leaf_paths(child, "", &mut paths);
        }
        paths
    }
}

fn collect_leaf_paths(node: &SchemaNode, ancestor: &str, paths: &mut Vec<String>) {
    let path = join_path(ancestor, &node.name);
    if node.is_leaf() {
        paths.push(path);
        return;
    }
    for child in node.children() {
        collect_leaf_paths(child, &path, paths);
    }
}

/// Append `name` to a dotted ancestor path, omitting the separator when the
/// ancestor path is empty.
pub fn join_path(ancestor: &str, name: &str) -> String {
    if ancestor.is_empty() {
        name.to_string()
    } else {
        format!("{ancestor}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_leaf_keeps_empty_children() {
        let node = SchemaNode::leaf("empty", NodeType::Object);
        assert_eq!(node.children_opt(), Some(&[][..]));
        assert!(node.is_leaf());
    }

    #[test]
    fn scalar_leaf_has_no_children() {
        let node = SchemaNode::leaf("age", NodeType::Number);
        assert!(node.children_opt().is_none());
        assert!(node.is_leaf());
    }

    #[test]
    fn empty_array_has_no_children() {
        let node = SchemaNode::array("tags", None);
        assert!(node.children_opt().is_none());
    }

    #[test]
    fn join_path_skips_empty_ancestor() {
        assert_eq!(join_path("", "name"), "name");
        assert_eq!(join_path("customer", "name"), "customer.name");
    }

    #[test]
    fn leaf_paths_descend_through_items() {
        let root = SchemaNode::object(
            "",
            vec![
                SchemaNode::leaf("id", NodeType::Number),
                SchemaNode::array(
                    "items",
                    Some(SchemaNode::object(
                        ARRAY_ITEM_NAME,
                        vec![SchemaNode::leaf("sku", NodeType::String)],
                    )),
                ),
            ],
        );
        assert_eq!(root.leaf_paths(), vec!["id", "items.item.sku"]);
        assert_eq!(root.depth(), 4);
    }
}
