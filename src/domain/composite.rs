//! Composite nodes: parent/child assembly, search, sort and rendering
//!
//! A [`CompositeNode`] is a [`Node`] carrying a [`Composite`] extension that
//! holds the ordered children (owned) and the parent (weak). For every child
//! `x` of `c`, `x.parent()` is `c`; the composite operations keep it that way.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use itertools::{Either, Itertools};
use regex::Regex;
use tracing::{debug, instrument, trace, warn};

use crate::domain::attribute::Attribute;
use crate::domain::error::NodeResult;
use crate::domain::identity::Family;
use crate::domain::node::{Node, NodeBuilder};
use crate::domain::registry::WeakState;
use crate::domain::search::SearchFlags;
use crate::domain::value::Value;
use crate::domain::walkers::{AscendantsWalker, NodesWalker};

/// Structural extension of a composite node.
#[derive(Default)]
pub(crate) struct Composite {
    parent: Option<WeakState>,
    children: Vec<CompositeNode>,
}

/// Handle to a composite node.
///
/// Dereferences to [`Node`] for identity, name, fields and attributes.
#[derive(Clone)]
pub struct CompositeNode {
    node: Node,
    composite: Rc<RefCell<Composite>>,
}

impl CompositeNode {
    /// Unattached composite node named `AbstractComposite<identity>`.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }

    /// Named node appended to `parent`.
    pub fn with_parent(name: impl Into<String>, parent: &CompositeNode) -> Self {
        Self::builder().name(name).parent(parent).build()
    }

    pub fn builder() -> CompositeBuilder {
        CompositeBuilder::default()
    }

    pub(crate) fn from_parts(node: Node, composite: Rc<RefCell<Composite>>) -> Self {
        Self { node, composite }
    }

    pub fn as_node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    // ------------------------------------------------------------------
    // parent
    // ------------------------------------------------------------------

    pub fn parent(&self) -> Option<CompositeNode> {
        let weak = self.composite.borrow().parent.clone()?;
        Node(weak.upgrade()?).as_composite()
    }

    fn set_parent(&self, parent: Option<&CompositeNode>) {
        self.composite.borrow_mut().parent = parent.map(|p| Rc::downgrade(&p.node.0));
    }

    /// Removes `child` from the children of its current parent, if any.
    fn detach(child: &CompositeNode) {
        if let Some(old_parent) = child.parent() {
            if let Some(index) = old_parent.index_of(child) {
                old_parent.composite.borrow_mut().children.remove(index);
                trace!(child = %child.name(), from = %old_parent.name(), "detached child");
            }
        }
    }

    // ------------------------------------------------------------------
    // children
    // ------------------------------------------------------------------

    /// Snapshot of the children.
    pub fn children(&self) -> Vec<CompositeNode> {
        self.composite.borrow().children.clone()
    }

    /// Replaces all children; previous children become unattached.
    ///
    /// Entries that are `self` or an ancestor are skipped.
    #[instrument(level = "debug", skip_all, fields(node = %self.name()))]
    pub fn set_children(&self, children: Vec<CompositeNode>) {
        let previous = std::mem::take(&mut self.composite.borrow_mut().children);
        for child in &previous {
            child.set_parent(None);
        }
        for child in children {
            self.add_child(&child);
        }
    }

    /// Child at `index`, `None` when out of range.
    pub fn child(&self, index: usize) -> Option<CompositeNode> {
        self.composite.borrow().children.get(index).cloned()
    }

    /// Position of `child` among the children, compared by reference.
    pub fn index_of(&self, child: &CompositeNode) -> Option<usize> {
        self.composite
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    /// Position of this node within its parent's children.
    pub fn row(&self) -> Option<usize> {
        self.parent()?.index_of(self)
    }

    /// True when `candidate` is `self` or one of its ancestors.
    fn is_self_or_ancestor(&self, candidate: &CompositeNode) -> bool {
        self.ptr_eq(candidate) || AscendantsWalker::new(self).any(|a| a.ptr_eq(candidate))
    }

    /// Appends `child` and makes `self` its parent.
    ///
    /// A child attached elsewhere is detached from its old parent first.
    /// Returns `false` without changes when `child` is `self` or an ancestor.
    #[instrument(level = "debug", skip_all, fields(node = %self.name(), child = %child.name()))]
    pub fn add_child(&self, child: &CompositeNode) -> bool {
        if self.is_self_or_ancestor(child) {
            warn!("refusing to attach a node below itself");
            return false;
        }
        Self::detach(child);
        self.composite.borrow_mut().children.push(child.clone());
        child.set_parent(Some(self));
        debug!("added child");
        true
    }

    /// Removes and returns the child at `index`, clearing its parent.
    #[instrument(level = "debug", skip(self), fields(node = %self.name()))]
    pub fn remove_child(&self, index: usize) -> Option<CompositeNode> {
        let child = {
            let mut composite = self.composite.borrow_mut();
            if index >= composite.children.len() {
                return None;
            }
            composite.children.remove(index)
        };
        child.set_parent(None);
        debug!(child = %child.name(), "removed child");
        Some(child)
    }

    /// Inserts `child` at `index` (`0..=count`).
    ///
    /// Returns `false` without changes when `index` is out of range or `child`
    /// is `self` or an ancestor.
    #[instrument(level = "debug", skip(self, child), fields(node = %self.name(), child = %child.name()))]
    pub fn insert_child(&self, child: &CompositeNode, index: usize) -> bool {
        if index > self.children_count() || self.is_self_or_ancestor(child) {
            return false;
        }
        Self::detach(child);
        let mut composite = self.composite.borrow_mut();
        // detaching from self may have shortened the list
        let index = index.min(composite.children.len());
        composite.children.insert(index, child.clone());
        drop(composite);
        child.set_parent(Some(self));
        debug!("inserted child");
        true
    }

    pub fn has_children(&self) -> bool {
        !self.composite.borrow().children.is_empty()
    }

    pub fn children_count(&self) -> usize {
        self.composite.borrow().children.len()
    }

    // ------------------------------------------------------------------
    // sorting
    // ------------------------------------------------------------------

    /// Sorts the children recursively.
    ///
    /// Without `attribute` children are ordered by name. With `attribute`,
    /// children holding that attribute are ordered by its value and every
    /// other child follows in its original order, whatever `reverse_order`
    /// says. Both sorts are stable.
    #[instrument(level = "debug", skip(self), fields(node = %self.name()))]
    pub fn sort_children(&self, attribute: Option<&str>, reverse_order: bool) {
        let children = self.children();
        let sorted: Vec<CompositeNode> = match attribute {
            None => children
                .into_iter()
                .map(|child| (child.name(), child))
                .sorted_by(|(a, _), (b, _)| if reverse_order { b.cmp(a) } else { a.cmp(b) })
                .map(|(_, child)| child)
                .collect(),
            Some(attribute) => {
                let (sortable, unsortable): (Vec<(Value, CompositeNode)>, Vec<CompositeNode>) =
                    children.into_iter().partition_map(|child| {
                        match child.attribute(attribute) {
                            Some(slot) => Either::Left((slot.value(), child)),
                            None => Either::Right(child),
                        }
                    });
                sortable
                    .into_iter()
                    .sorted_by(|(a, _), (b, _)| {
                        if reverse_order {
                            b.sort_cmp(a)
                        } else {
                            a.sort_cmp(b)
                        }
                    })
                    .map(|(_, child)| child)
                    .chain(unsortable)
                    .collect()
            }
        };
        self.composite.borrow_mut().children = sorted.clone();
        for child in &sorted {
            child.sort_children(attribute, reverse_order);
        }
    }

    // ------------------------------------------------------------------
    // search
    // ------------------------------------------------------------------

    /// Descendants whose name matches `pattern`, depth-first pre-order.
    pub fn find_children(&self, pattern: &str, flags: SearchFlags) -> NodeResult<Vec<CompositeNode>> {
        let mut candidates = Vec::new();
        self.find_children_into(pattern, flags, &mut candidates)?;
        Ok(candidates)
    }

    /// Like [`find_children`](Self::find_children), appending to `candidates`.
    ///
    /// Nodes already present in `candidates` (by reference) are not added again.
    #[instrument(level = "debug", skip(self, candidates), fields(node = %self.name()))]
    pub fn find_children_into(
        &self,
        pattern: &str,
        flags: SearchFlags,
        candidates: &mut Vec<CompositeNode>,
    ) -> NodeResult<()> {
        let regex = flags.compile(pattern)?;
        self.collect_matching(&regex, candidates);
        debug!(found = candidates.len(), "searched children");
        Ok(())
    }

    fn collect_matching(&self, regex: &Regex, candidates: &mut Vec<CompositeNode>) {
        for child in self.children() {
            if regex.is_match(&child.name()) && !candidates.iter().any(|c| c.ptr_eq(&child)) {
                candidates.push(child.clone());
            }
            child.collect_matching(regex, candidates);
        }
    }

    /// Nodes of the subtree rooted at `node` (default `self`, root included)
    /// whose family matches `pattern`.
    #[instrument(level = "debug", skip(self, node), fields(node = %self.name()))]
    pub fn find_family(
        &self,
        pattern: &str,
        flags: SearchFlags,
        node: Option<&CompositeNode>,
    ) -> NodeResult<Vec<CompositeNode>> {
        let regex = flags.compile(pattern)?;
        let root = node.unwrap_or(self);
        Ok(NodesWalker::new(root)
            .filter(|candidate| regex.is_match(candidate.family().as_str()))
            .collect())
    }

    // ------------------------------------------------------------------
    // rendering
    // ------------------------------------------------------------------

    /// Text outline of the subtree, one `|----name` line per node.
    pub fn list_node(&self) -> String {
        self.list_node_at(-1)
    }

    /// Outline where this node sits at `tab_level + 1` tabs.
    pub fn list_node_at(&self, tab_level: isize) -> String {
        let tab_level = tab_level + 1;
        let mut output = "\t".repeat(usize::try_from(tab_level).unwrap_or(0));
        output.push_str("|----");
        output.push_str(&self.name());
        output.push('\n');
        for child in self.children() {
            output.push_str(&child.list_node_at(tab_level));
        }
        output
    }

    /// True when both handles refer to the same node.
    pub fn ptr_eq(&self, other: &CompositeNode) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl Default for CompositeNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for CompositeNode {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

/// Same node, or the identities of the first pair of children match.
///
/// Only the first children pair is compared; two distinct childless nodes are
/// never equal.
impl PartialEq for CompositeNode {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let ours = self.composite.borrow();
        let theirs = other.composite.borrow();
        ours.children
            .iter()
            .zip(theirs.children.iter())
            .next()
            .is_some_and(|(a, b)| a.identity() == b.identity())
    }
}

impl fmt::Debug for CompositeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeNode")
            .field("identity", &self.identity())
            .field("family", &self.family())
            .field("name", &self.name())
            .field("children", &self.children_count())
            .finish()
    }
}

impl fmt::Display for CompositeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.node, f)
    }
}

/// Collects construction arguments of a composite node.
#[derive(Debug, Default)]
pub struct CompositeBuilder {
    node: NodeBuilder,
    parent: Option<CompositeNode>,
    children: Vec<CompositeNode>,
}

impl CompositeBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.node = self.node.name(name);
        self
    }

    pub fn family(mut self, family: impl Into<Family>) -> Self {
        self.node = self.node.family(family);
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.node = self.node.attribute(name, attribute);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.node = self.node.field(key, value);
        self
    }

    pub fn parent(mut self, parent: &CompositeNode) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn child(mut self, child: CompositeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: Vec<CompositeNode>) -> Self {
        self.children = children;
        self
    }

    pub(crate) fn node_builder(mut self, node: NodeBuilder) -> Self {
        self.node = node;
        self
    }

    pub fn build(self) -> CompositeNode {
        let composite = Rc::new(RefCell::new(Composite::default()));
        let node = self
            .node
            .build_with(Family::ABSTRACT_COMPOSITE, Some(Rc::clone(&composite)));
        let this = CompositeNode::from_parts(node, composite);
        this.set_children(self.children);
        if let Some(parent) = self.parent {
            parent.add_child(&this);
        }
        this
    }
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("attached", &self.parent.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}
