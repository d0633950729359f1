//! Error types for the LL layer.
//!
//! Errors at this level describe what the store refused or what broke on the
//! way to it. They carry no knowledge of which higher-level operation was in
//! flight; the core layer adds that context.

use bytes::Bytes;
use thiserror::Error;

/// Errors reported by a [`NodeClient`](crate::NodeClient).
#[derive(Debug, Error)]
pub enum LLError {
    /// The node (or, for `create`, its parent) does not exist.
    #[error("no node")]
    NoNode,

    /// `create` was asked to make a node that already exists.
    #[error("node exists")]
    NodeExists,

    /// `delete` was asked to remove a node that still has children.
    #[error("node has children")]
    NotEmpty,

    /// The store rejected the path syntax.
    #[error("invalid path: {message}")]
    InvalidPath { message: String },

    /// The session to the store is gone.
    #[error("session closed")]
    SessionClosed,

    /// The operation is not supported by this client.
    #[error("operation not supported")]
    NotSupported,

    /// Generic I/O or transport failure: network errors, file I/O, timeouts.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Store-specific error with a numeric code.
    ///
    /// The code and detail are opaque here; the concrete client defines them.
    #[error("protocol error: code {code}{}", format_detail(.detail))]
    Protocol { code: i32, detail: Bytes },
}

fn format_detail(detail: &Bytes) -> String {
    if detail.is_empty() {
        return String::new();
    }
    match std::str::from_utf8(detail) {
        Ok(s) => format!(" - {}", s),
        Err(_) => format!(" - {:?}", detail),
    }
}

impl LLError {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        LLError::InvalidPath {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for LLError {
    fn from(e: std::io::Error) -> Self {
        LLError::Transport(Box::new(e))
    }
}
