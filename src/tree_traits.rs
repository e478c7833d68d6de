//! Conversion of composite trees into `termtree` displays

use termtree::Tree;
use tracing::instrument;

use crate::domain::CompositeNode;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for CompositeNode {
    #[instrument(level = "debug", skip(self), fields(node = %self.name()))]
    fn to_tree_string(&self) -> Tree<String> {
        // Recursively construct the children
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();

        Tree::new(self.name()).with_leaves(leaves)
    }
}
