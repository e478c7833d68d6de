//! Domain layer: nodes, attributes and composite trees
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod attribute;
pub mod composite;
pub mod error;
pub mod identity;
pub mod node;
pub mod record;
mod registry;
pub mod search;
pub mod value;
pub mod walkers;

pub use attribute::{Attribute, AttributeRecord};
pub use composite::{CompositeBuilder, CompositeNode};
pub use error::{NodeError, NodeResult};
pub use identity::{Family, Identity};
pub use node::{Node, NodeBuilder};
pub use record::{NodeKind, NodeRecord};
pub use registry::live_count;
pub use search::SearchFlags;
pub use value::Value;
pub use walkers::{ascendants_walker, nodes_walker, AscendantsWalker, NodesWalker};

/// Live node registered under `identity`, if any.
pub fn get_node_by_identity(identity: Identity) -> Option<Node> {
    Node::get_node_by_identity(identity)
}
