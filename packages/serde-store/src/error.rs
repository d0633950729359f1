//! Error types for the serde layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerdeError {
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] coordstore_core::Error),

    /// A leaf or subtree could not be turned into the requested value.
    #[error("decode error at {path}: {message}")]
    Decode { path: String, message: String },

    /// A value could not be laid out as nodes.
    #[error("encode error at {path}: {message}")]
    Encode { path: String, message: String },
}

impl SerdeError {
    pub fn decode(path: impl Into<String>, message: impl ToString) -> Self {
        SerdeError::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn encode(path: impl Into<String>, message: impl ToString) -> Self {
        SerdeError::Encode {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SerdeError>;
