//! Application layer: tree documents and use cases
//!
//! This layer orchestrates domain logic and owns file I/O.

pub mod document;
pub mod error;
pub mod error_ext;
pub mod query;

pub use document::{load_tree, parse_tree, render_document, DocumentFormat};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use query::{attributes_of, find_by_family, find_by_name, sort_tree, AttributeListing};
