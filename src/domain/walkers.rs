//! Lazy walkers over composite trees

use tracing::instrument;

use crate::domain::composite::CompositeNode;

/// Depth-first pre-order walk of a subtree, root first.
///
/// Children are read when their parent is yielded, so the walk sees the tree
/// as it is at that moment.
pub struct NodesWalker {
    stack: Vec<CompositeNode>,
}

impl NodesWalker {
    #[instrument(level = "trace")]
    pub fn new(root: &CompositeNode) -> Self {
        Self {
            stack: vec![root.clone()],
        }
    }
}

impl Iterator for NodesWalker {
    type Item = CompositeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children().into_iter().rev());
        Some(current)
    }
}

/// Walk up the parent chain, starting with the parent of the given node.
pub struct AscendantsWalker {
    current: Option<CompositeNode>,
}

impl AscendantsWalker {
    #[instrument(level = "trace")]
    pub fn new(node: &CompositeNode) -> Self {
        Self {
            current: node.parent(),
        }
    }
}

impl Iterator for AscendantsWalker {
    type Item = CompositeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        self.current = current.parent();
        Some(current)
    }
}

/// Subtree of `root` in pre-order, `root` included.
pub fn nodes_walker(root: &CompositeNode) -> NodesWalker {
    NodesWalker::new(root)
}

/// Ancestors of `node`, nearest first.
pub fn ascendants_walker(node: &CompositeNode) -> AscendantsWalker {
    AscendantsWalker::new(node)
}
