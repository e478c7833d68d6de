//! Serialized form of nodes and trees
//!
//! A [`NodeRecord`] is the plain-data picture of a node: identity, family,
//! name, fields, attributes and (for composites) the children records. The
//! same shape doubles as the tree document format read by the CLI, where
//! every key is optional.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{instrument, warn};

use crate::domain::attribute::{Attribute, AttributeRecord};
use crate::domain::composite::CompositeNode;
use crate::domain::identity::{Family, Identity};
use crate::domain::node::{Node, NodeBuilder};
use crate::domain::value::Value;

/// Whether a record describes a plain or a composite node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Plain,
    #[default]
    Composite,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Absent in hand-written documents; a fresh identity is allocated then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<Family>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    fn node_builder(&mut self) -> NodeBuilder {
        let mut builder = Node::builder().restored_identity(self.identity);
        if let Some(family) = self.family.take() {
            builder = builder.family(family);
        }
        if let Some(name) = self.name.take() {
            builder = builder.name(name);
        }
        for (key, value) in std::mem::take(&mut self.fields) {
            builder = builder.field(key, value);
        }
        for (key, record) in std::mem::take(&mut self.attributes) {
            builder = builder.attribute(key, Attribute::from_record(record));
        }
        builder
    }

    /// Rebuilds the node; composite records bring their subtree along.
    pub fn into_node(mut self) -> Node {
        match self.kind {
            NodeKind::Composite => self.into_composite().into_node(),
            NodeKind::Plain => {
                if !self.children.is_empty() {
                    warn!(
                        count = self.children.len(),
                        "plain node record carries children, ignoring them"
                    );
                }
                self.node_builder().build()
            }
        }
    }

    /// Rebuilds the subtree as composite nodes, parent links included.
    #[instrument(level = "trace", skip(self), fields(name = ?self.name))]
    pub fn into_composite(mut self) -> CompositeNode {
        let children = std::mem::take(&mut self.children);
        let node = CompositeNode::builder()
            .node_builder(self.node_builder())
            .build();
        for child in children {
            node.add_child(&child.into_composite());
        }
        node
    }
}

impl Node {
    /// Record of this node, including the subtree of a composite node.
    pub fn to_record(&self) -> NodeRecord {
        match self.as_composite() {
            Some(composite) => composite.to_record(),
            None => self.base_record(NodeKind::Plain),
        }
    }

    fn base_record(&self, kind: NodeKind) -> NodeRecord {
        let state = self.0.borrow();
        NodeRecord {
            identity: Some(state.identity),
            family: Some(state.family.clone()),
            name: Some(state.name.clone()),
            kind,
            fields: state.fields.clone(),
            attributes: state
                .attributes
                .iter()
                .map(|(key, attribute)| (key.clone(), attribute.to_record()))
                .collect(),
            children: Vec::new(),
        }
    }
}

impl CompositeNode {
    pub fn to_record(&self) -> NodeRecord {
        let mut record = self.as_node().base_record(NodeKind::Composite);
        record.children = self.children().iter().map(CompositeNode::to_record).collect();
        record
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeRecord::deserialize(deserializer).map(NodeRecord::into_node)
    }
}

impl Serialize for CompositeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CompositeNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeRecord::deserialize(deserializer).map(NodeRecord::into_composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_document_without_identities_when_loaded_then_allocates_fresh_ones() {
        let record: NodeRecord = serde_json::from_str(
            r#"{"name": "root", "children": [{"name": "a"}, {"family": "Leaf"}]}"#,
        )
        .unwrap();
        let root = record.into_composite();
        let children = root.children();
        assert_eq!(children.len(), 2);
        assert!(children[0].identity() > root.identity());
        assert_eq!(children[1].name(), format!("Leaf{}", children[1].identity()));
        assert!(children[1].parent().unwrap().ptr_eq(&root));
    }

    #[test]
    fn given_plain_node_when_serialized_then_kind_is_plain() {
        let node = Node::builder().name("plain").field("k", "v").build();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "plain");
        assert_eq!(json["fields"]["k"], "v");

        let restored: Node = serde_json::from_value(json).unwrap();
        assert!(!restored.is_composite());
        assert_eq!(restored.identity(), node.identity());
        assert_eq!(restored, node);
    }
}
