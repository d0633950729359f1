//! In-memory coordination store.
//!
//! Holds the tree in hash maps, so children come back in arbitrary order just
//! like a real store. Every committed mutation is appended to a journal, and
//! failures can be injected per operation and path, which makes this the
//! client of choice for exercising the recursive operations in tests.

use std::collections::{HashMap, HashSet};

use bytes::Bytes;
use coordstore_ll::{Acl, LLError, NodeClient, Operation};

use crate::node_path::segments;

/// Protocol code returned for injected failures (a lost connection).
pub const INJECTED_FAILURE_CODE: i32 = -4;

/// A committed change to the tree, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create(String),
    Set(String),
    Delete(String),
}

impl Mutation {
    pub fn path(&self) -> &str {
        match self {
            Mutation::Create(path) | Mutation::Set(path) | Mutation::Delete(path) => path,
        }
    }
}

#[derive(Debug, Default)]
struct Znode {
    data: Bytes,
    children: HashMap<String, Znode>,
}

/// An in-memory [`NodeClient`].
///
/// # Example
///
/// ```rust
/// use coordstore_ll::{Acl, NodeClient};
/// use coordstore_node_store::{InMemoryClient, Mutation};
///
/// let mut client = InMemoryClient::new();
/// client.create("/app", "v1".into(), &Acl::open_unsafe()).unwrap();
///
/// assert!(client.exists("/app").unwrap());
/// assert_eq!(client.journal(), &[Mutation::Create("/app".to_string())]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryClient {
    root: Znode,
    journal: Vec<Mutation>,
    failures: HashSet<(Operation, String)>,
}

impl InMemoryClient {
    /// Create a store holding only the root node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `op` on exactly `path` fail with a protocol error.
    pub fn fail_on(&mut self, op: Operation, path: impl Into<String>) {
        self.failures.insert((op, path.into()));
    }

    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Mutations committed so far, oldest first.
    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Number of nodes, not counting the root.
    pub fn node_count(&self) -> usize {
        fn count(node: &Znode) -> usize {
            node.children.values().map(|c| 1 + count(c)).sum()
        }
        count(&self.root)
    }

    fn check(&self, op: Operation, path: &str) -> Result<(), LLError> {
        if self.failures.contains(&(op, path.to_string())) {
            return Err(LLError::Protocol {
                code: INJECTED_FAILURE_CODE,
                detail: Bytes::from(format!("injected {} failure", op)),
            });
        }
        Ok(())
    }

    fn node(&self, segments: &[&str]) -> Option<&Znode> {
        segments
            .iter()
            .try_fold(&self.root, |node, name| node.children.get(*name))
    }

    fn node_mut(&mut self, segments: &[&str]) -> Option<&mut Znode> {
        segments
            .iter()
            .try_fold(&mut self.root, |node, name| node.children.get_mut(*name))
    }
}

impl NodeClient for InMemoryClient {
    fn exists(&mut self, path: &str) -> Result<bool, LLError> {
        self.check(Operation::Exists, path)?;
        let segments = segments(path)?;
        Ok(self.node(&segments).is_some())
    }

    fn get(&mut self, path: &str) -> Result<Option<Bytes>, LLError> {
        self.check(Operation::Get, path)?;
        let segments = segments(path)?;
        Ok(self.node(&segments).map(|node| node.data.clone()))
    }

    fn set(&mut self, path: &str, data: Bytes) -> Result<(), LLError> {
        self.check(Operation::Set, path)?;
        let segments = segments(path)?;
        let node = self.node_mut(&segments).ok_or(LLError::NoNode)?;
        node.data = data;
        self.journal.push(Mutation::Set(path.to_string()));
        Ok(())
    }

    fn create(&mut self, path: &str, data: Bytes, _acl: &[Acl]) -> Result<(), LLError> {
        self.check(Operation::Create, path)?;
        let segments = segments(path)?;
        let (name, parent) = segments.split_last().ok_or(LLError::NodeExists)?;
        let parent = self.node_mut(parent).ok_or(LLError::NoNode)?;
        if parent.children.contains_key(*name) {
            return Err(LLError::NodeExists);
        }
        parent.children.insert(
            name.to_string(),
            Znode {
                data,
                children: HashMap::new(),
            },
        );
        self.journal.push(Mutation::Create(path.to_string()));
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<(), LLError> {
        self.check(Operation::Delete, path)?;
        let segments = segments(path)?;
        let (name, parent) = segments
            .split_last()
            .ok_or_else(|| LLError::invalid_path("the root cannot be deleted"))?;
        let parent = self.node_mut(parent).ok_or(LLError::NoNode)?;
        match parent.children.get(*name) {
            None => return Err(LLError::NoNode),
            Some(node) if !node.children.is_empty() => return Err(LLError::NotEmpty),
            Some(_) => {}
        }
        parent.children.remove(*name);
        self.journal.push(Mutation::Delete(path.to_string()));
        Ok(())
    }

    fn children(&mut self, path: &str) -> Result<Vec<String>, LLError> {
        self.check(Operation::ListChildren, path)?;
        let segments = segments(path)?;
        let node = self.node(&segments).ok_or(LLError::NoNode)?;
        Ok(node.children.keys().cloned().collect())
    }
}
