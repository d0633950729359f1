//! The client trait every coordination store backend implements.

use std::fmt;

use bytes::Bytes;

use crate::{Acl, LLError};

/// The six store primitives, named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Exists,
    Get,
    Set,
    Create,
    Delete,
    ListChildren,
}

impl Operation {
    /// True for the primitives that change the tree.
    pub fn is_mutation(self) -> bool {
        matches!(self, Operation::Set | Operation::Create | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Exists => "exists",
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::ListChildren => "list children",
        };
        f.write_str(name)
    }
}

/// A connection to a hierarchical coordination store.
///
/// Paths are absolute, `/`-separated strings. They are passed through
/// untouched: validation is the store's job, and a malformed path comes
/// back as [`LLError::InvalidPath`].
///
/// Each method is one round trip. Implementations must not recurse or
/// create missing parents on their own.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn NodeClient>`.
pub trait NodeClient: Send + Sync {
    /// Check whether a node exists. Absence is `Ok(false)`, not an error.
    fn exists(&mut self, path: &str) -> Result<bool, LLError>;

    /// Fetch a node's value.
    ///
    /// * `Ok(None)` - The node does not exist.
    /// * `Ok(Some(bytes))` - The node's value, possibly empty.
    fn get(&mut self, path: &str) -> Result<Option<Bytes>, LLError>;

    /// Replace the value of an existing node. Fails with
    /// [`LLError::NoNode`] if the node is absent.
    fn set(&mut self, path: &str, data: Bytes) -> Result<(), LLError>;

    /// Create a node. The parent must already exist.
    fn create(&mut self, path: &str, data: Bytes, acl: &[Acl]) -> Result<(), LLError>;

    /// Delete a childless node.
    fn delete(&mut self, path: &str) -> Result<(), LLError>;

    /// Names of the node's immediate children, in no particular order.
    fn children(&mut self, path: &str) -> Result<Vec<String>, LLError>;
}

// Blanket implementations for references and boxes

impl<T: NodeClient + ?Sized> NodeClient for &mut T {
    fn exists(&mut self, path: &str) -> Result<bool, LLError> {
        (*self).exists(path)
    }

    fn get(&mut self, path: &str) -> Result<Option<Bytes>, LLError> {
        (*self).get(path)
    }

    fn set(&mut self, path: &str, data: Bytes) -> Result<(), LLError> {
        (*self).set(path, data)
    }

    fn create(&mut self, path: &str, data: Bytes, acl: &[Acl]) -> Result<(), LLError> {
        (*self).create(path, data, acl)
    }

    fn delete(&mut self, path: &str) -> Result<(), LLError> {
        (*self).delete(path)
    }

    fn children(&mut self, path: &str) -> Result<Vec<String>, LLError> {
        (*self).children(path)
    }
}

impl<T: NodeClient + ?Sized> NodeClient for Box<T> {
    fn exists(&mut self, path: &str) -> Result<bool, LLError> {
        self.as_mut().exists(path)
    }

    fn get(&mut self, path: &str) -> Result<Option<Bytes>, LLError> {
        self.as_mut().get(path)
    }

    fn set(&mut self, path: &str, data: Bytes) -> Result<(), LLError> {
        self.as_mut().set(path, data)
    }

    fn create(&mut self, path: &str, data: Bytes, acl: &[Acl]) -> Result<(), LLError> {
        self.as_mut().create(path, data, acl)
    }

    fn delete(&mut self, path: &str) -> Result<(), LLError> {
        self.as_mut().delete(path)
    }

    fn children(&mut self, path: &str) -> Result<Vec<String>, LLError> {
        self.as_mut().children(path)
    }
}
