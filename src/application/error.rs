//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::NodeError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] NodeError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid tree document {path}: {message}")]
    Document { path: PathBuf, message: String },

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("no node named '{0}' in tree")]
    NodeNotFound(String),

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
