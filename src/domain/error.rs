//! Domain-level errors (no I/O concerns)

use thiserror::Error;

/// Domain errors represent node contract violations that the type system
/// cannot rule out.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("attribute already exists: {0}")]
    AttributeExists(String),

    #[error("attribute does not exist: {0}")]
    AttributeNotFound(String),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
