//! Tree queries used by the command line

use tracing::instrument;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CompositeNode, SearchFlags, Value};

/// Attributes of one node, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeListing {
    pub node: String,
    pub attributes: Vec<(String, Value)>,
}

/// Nodes below `root` whose name matches `pattern`.
#[instrument(level = "debug", skip(root))]
pub fn find_by_name(
    root: &CompositeNode,
    pattern: &str,
    flags: SearchFlags,
) -> ApplicationResult<Vec<CompositeNode>> {
    Ok(root.find_children(pattern, flags)?)
}

/// Nodes of the tree (root included) whose family matches `pattern`.
#[instrument(level = "debug", skip(root))]
pub fn find_by_family(
    root: &CompositeNode,
    pattern: &str,
    flags: SearchFlags,
) -> ApplicationResult<Vec<CompositeNode>> {
    Ok(root.find_family(pattern, flags, None)?)
}

/// Sorts the whole tree in place.
#[instrument(level = "debug", skip(root))]
pub fn sort_tree(root: &CompositeNode, attribute: Option<&str>, reverse_order: bool) {
    root.sort_children(attribute, reverse_order);
}

/// Attributes of the first node named exactly `name`, the root included.
#[instrument(level = "debug", skip(root))]
pub fn attributes_of(root: &CompositeNode, name: &str) -> ApplicationResult<AttributeListing> {
    let node = if root.name() == name {
        root.clone()
    } else {
        let pattern = format!("^{}$", regex::escape(name));
        root.find_children(&pattern, SearchFlags::NONE)?
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::NodeNotFound(name.to_string()))?
    };
    let attributes = node
        .list_attributes()
        .into_iter()
        .zip(node.get_attributes())
        .map(|(key, attribute)| (key, attribute.value()))
        .collect();
    Ok(AttributeListing {
        node: node.name(),
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Attribute, NodeError};

    fn tree() -> CompositeNode {
        let root = CompositeNode::named("root");
        let a = CompositeNode::builder()
            .name("a.b")
            .attribute("size", Attribute::with_value(3))
            .attribute("label", Attribute::with_value("x"))
            .parent(&root)
            .build();
        CompositeNode::with_parent("axb", &a);
        root
    }

    #[test]
    fn given_dotted_name_when_listing_attributes_then_matches_literally() {
        let listing = attributes_of(&tree(), "a.b").unwrap();
        assert_eq!(listing.node, "a.b");
        assert_eq!(
            listing.attributes,
            vec![
                ("size".to_string(), Value::from(3)),
                ("label".to_string(), Value::from("x"))
            ]
        );
    }

    #[test]
    fn given_unknown_name_when_listing_attributes_then_not_found() {
        let result = attributes_of(&tree(), "missing");
        assert!(matches!(result, Err(ApplicationError::NodeNotFound(_))));
    }

    #[test]
    fn given_invalid_pattern_when_finding_then_domain_error() {
        let result = find_by_name(&tree(), "[", SearchFlags::NONE);
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(NodeError::Pattern(_)))
        ));
    }
}
