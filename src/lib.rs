//! Identity-tracked composite tree nodes.
//!
//! Every [`Node`] receives a process-unique [`Identity`] and is reachable by
//! it through a weak registry for as long as something else keeps it alive.
//! A [`CompositeNode`] adds an ordered list of children and a parent link,
//! with search by name or family, stable sorting by name or attribute value,
//! and text rendering.
//!
//! ```
//! use dagnode::{Attribute, CompositeNode, SearchFlags};
//!
//! let root = CompositeNode::named("MyNodeA");
//! let c = CompositeNode::with_parent("MyNodeC", &root);
//! let b = CompositeNode::builder()
//!     .name("MyNodeB")
//!     .attribute("weight", Attribute::with_value(1))
//!     .parent(&root)
//!     .build();
//!
//! root.sort_children(None, false);
//! assert_eq!(b.row(), Some(0));
//! assert_eq!(c.row(), Some(1));
//!
//! let found = root.find_children("C$", SearchFlags::NONE).unwrap();
//! assert!(found[0].ptr_eq(&c));
//! assert_eq!(root.list_node(), "|----MyNodeA\n\t|----MyNodeB\n\t|----MyNodeC\n");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{
    get_node_by_identity, Attribute, CompositeNode, Family, Identity, Node, NodeError,
    NodeRecord, NodeResult, SearchFlags, Value,
};
