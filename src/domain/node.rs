//! Identity-tracked named nodes with attribute storage

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::domain::attribute::Attribute;
use crate::domain::composite::{Composite, CompositeNode};
use crate::domain::error::{NodeError, NodeResult};
use crate::domain::identity::{Family, Identity};
use crate::domain::registry::{self, SharedState};
use crate::domain::value::Value;

/// State shared by every handle of one node.
pub(crate) struct NodeState {
    pub(crate) identity: Identity,
    pub(crate) family: Family,
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, Value>,
    pub(crate) attributes: IndexMap<String, Attribute>,
    /// Present on composite nodes only.
    pub(crate) composite: Option<Rc<RefCell<Composite>>>,
}

impl Drop for NodeState {
    fn drop(&mut self) {
        registry::release(self.identity);
    }
}

/// Handle to a node.
///
/// A node owns a process-unique [`Identity`], a read-only [`Family`], a
/// mutable name, plain keyed fields and a separate map of [`Attribute`]s.
/// Cloning the handle does not copy the node.
#[derive(Clone)]
pub struct Node(pub(crate) SharedState);

impl Node {
    /// Plain node with the default name `Abstract<identity>`.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }

    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    /// Live node registered under `identity`, if any.
    pub fn get_node_by_identity(identity: Identity) -> Option<Node> {
        registry::lookup(identity).map(Node)
    }

    /// Snapshot of all live registered nodes, ordered by identity.
    pub fn registered_nodes() -> Vec<Node> {
        registry::live().into_iter().map(Node).collect()
    }

    pub fn identity(&self) -> Identity {
        self.0.borrow().identity
    }

    pub fn family(&self) -> Family {
        self.0.borrow().family.clone()
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().name = name.into();
    }

    pub fn is_composite(&self) -> bool {
        self.0.borrow().composite.is_some()
    }

    /// Composite view of this node, `None` for plain nodes.
    pub fn as_composite(&self) -> Option<CompositeNode> {
        let composite = self.0.borrow().composite.clone()?;
        Some(CompositeNode::from_parts(self.clone(), composite))
    }

    /// True when both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ------------------------------------------------------------------
    // attributes
    // ------------------------------------------------------------------

    /// Attribute names in insertion order.
    pub fn list_attributes(&self) -> Vec<String> {
        self.0.borrow().attributes.keys().cloned().collect()
    }

    /// Attributes in insertion order.
    pub fn get_attributes(&self) -> Vec<Attribute> {
        self.0.borrow().attributes.values().cloned().collect()
    }

    pub fn attribute(&self, name: &str) -> Option<Attribute> {
        self.0.borrow().attributes.get(name).cloned()
    }

    /// True only for attributes; a plain field with the same name does not count.
    pub fn attribute_exists(&self, name: &str) -> bool {
        self.0.borrow().attributes.contains_key(name)
    }

    #[instrument(level = "debug", skip(self, attribute), fields(node = %self.name()))]
    pub fn add_attribute(&self, name: &str, attribute: Attribute) -> NodeResult<()> {
        let mut state = self.0.borrow_mut();
        if state.attributes.contains_key(name) {
            return Err(NodeError::AttributeExists(name.to_string()));
        }
        state.attributes.insert(name.to_string(), attribute);
        debug!("added attribute");
        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(node = %self.name()))]
    pub fn remove_attribute(&self, name: &str) -> NodeResult<()> {
        self.0
            .borrow_mut()
            .attributes
            .shift_remove(name)
            .ok_or_else(|| NodeError::AttributeNotFound(name.to_string()))?;
        debug!("removed attribute");
        Ok(())
    }

    // ------------------------------------------------------------------
    // plain fields
    // ------------------------------------------------------------------

    pub fn field(&self, key: &str) -> Option<Value> {
        self.0.borrow().fields.get(key).cloned()
    }

    pub fn field_exists(&self, key: &str) -> bool {
        self.0.borrow().fields.contains_key(key)
    }

    /// Stores a plain field, returning the previous value.
    pub fn set_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().fields.insert(key.into(), value.into())
    }

    pub fn remove_field(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().fields.shift_remove(key)
    }

    /// Bulk update; existing keys keep their position.
    pub fn update_fields<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut state = self.0.borrow_mut();
        for (key, value) in entries {
            state.fields.insert(key.into(), value.into());
        }
    }

    /// Plain fields in insertion order.
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain nodes compare by identity; two composite nodes use the composite
/// rule (see [`CompositeNode`]).
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.as_composite(), other.as_composite()) {
            (Some(a), Some(b)) => a == b,
            _ => self.identity() == other.identity(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.borrow();
        f.debug_struct("Node")
            .field("identity", &state.identity)
            .field("family", &state.family)
            .field("name", &state.name)
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.borrow().name)
    }
}

/// Collects construction arguments of a node.
#[derive(Debug, Default)]
pub struct NodeBuilder {
    name: Option<String>,
    family: Option<Family>,
    identity: Option<Identity>,
    fields: IndexMap<String, Value>,
    attributes: IndexMap<String, Attribute>,
}

impl NodeBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn family(mut self, family: impl Into<Family>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Reuses a known identity instead of allocating one.
    pub(crate) fn restored_identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    pub fn build(self) -> Node {
        self.build_with(Family::ABSTRACT, None)
    }

    #[instrument(level = "trace", skip_all)]
    pub(crate) fn build_with(
        self,
        default_family: Family,
        composite: Option<Rc<RefCell<Composite>>>,
    ) -> Node {
        let NodeBuilder {
            name,
            family,
            identity,
            fields,
            attributes,
        } = self;
        let family = family.unwrap_or(default_family);
        let state = registry::allocate(identity, |identity| NodeState {
            name: name.unwrap_or_else(|| format!("{}{}", family, identity)),
            identity,
            family,
            fields,
            attributes,
            composite,
        });
        let node = Node(state);
        debug!(identity = %node.identity(), name = %node.name(), "created node");
        node
    }
}
