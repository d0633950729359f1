//! Error types for the core layer.

use coordstore_ll::{LLError, Operation};
use thiserror::Error;

/// Errors at the core layer.
///
/// Every variant names what was being attempted; the LL error underneath is
/// kept as the source.
#[derive(Debug, Error)]
pub enum Error {
    /// The session could not be established.
    #[error("failed connecting to coordination store {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: LLError,
    },

    /// A store primitive failed.
    #[error("{op} failed for node {path}: {source}")]
    Remote {
        op: Operation,
        path: String,
        #[source]
        source: LLError,
    },
}

impl Error {
    pub fn remote(op: Operation, path: impl Into<String>, source: LLError) -> Self {
        Error::Remote {
            op,
            path: path.into(),
            source,
        }
    }

    /// The failed primitive, for remote errors.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::Remote { op, .. } => Some(*op),
            Error::Connection { .. } => None,
        }
    }

    /// The path the failed primitive was called with, for remote errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Remote { path, .. } => Some(path),
            Error::Connection { .. } => None,
        }
    }

    /// The underlying LL error.
    pub fn ll_error(&self) -> &LLError {
        match self {
            Error::Connection { source, .. } | Error::Remote { source, .. } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
