//! The session: one connection to the store, shared by every operation.

use std::fmt;

use bytes::Bytes;
use coordstore_ll::{Acl, LLError, NodeClient, Operation};

use crate::{Error, NodePath, Result};

/// Owns the connection to the coordination store.
///
/// Construct one per application and hand it by `&mut` to the operations in
/// [`children`](crate::children), [`subtree`](crate::subtree),
/// [`writer`](crate::writer) and [`deleter`](crate::deleter). The session is
/// not synchronized; wrap it in a mutex to share it between threads.
///
/// Every primitive returns an explicit `Result`. Failures are also logged
/// and remembered in a last-error slot, which is cleared each time a new
/// primitive starts.
#[derive(Debug)]
pub struct Session<C> {
    client: C,
    last_error: Option<String>,
}

impl<C: NodeClient> Session<C> {
    /// Wrap an already connected client.
    pub fn new(client: C) -> Self {
        Self {
            client,
            last_error: None,
        }
    }

    /// Establish the connection with `connect` and wrap the result.
    ///
    /// A failure here is a [`Error::Connection`] and is reported once; there
    /// is no reconnect.
    pub fn connect<F>(target: impl fmt::Display, connect: F) -> Result<Self>
    where
        F: FnOnce() -> std::result::Result<C, LLError>,
    {
        match connect() {
            Ok(client) => {
                log::debug!("Connected to coordination store {}", target);
                Ok(Self::new(client))
            }
            Err(source) => {
                let error = Error::Connection {
                    target: target.to_string(),
                    source,
                };
                log::error!("{}", error);
                Err(error)
            }
        }
    }

    pub fn exists(&mut self, path: &NodePath) -> Result<bool> {
        self.begin(Operation::Exists, path);
        let result = self.client.exists(path.as_str());
        self.finish(Operation::Exists, path, result)
    }

    /// Fetch a node's value; `None` if the node does not exist.
    pub fn get(&mut self, path: &NodePath) -> Result<Option<Bytes>> {
        self.begin(Operation::Get, path);
        let result = self.client.get(path.as_str());
        self.finish(Operation::Get, path, result)
    }

    /// Replace the value of an existing node.
    pub fn set(&mut self, path: &NodePath, value: impl Into<Bytes>) -> Result<()> {
        self.begin(Operation::Set, path);
        let result = self.client.set(path.as_str(), value.into());
        self.finish(Operation::Set, path, result)
    }

    /// Create a node, world readable and writable. The parent must exist.
    pub fn create(&mut self, path: &NodePath, value: impl Into<Bytes>) -> Result<()> {
        self.begin(Operation::Create, path);
        let result = self
            .client
            .create(path.as_str(), value.into(), &Acl::open_unsafe());
        self.finish(Operation::Create, path, result)
    }

    /// Delete a childless node.
    pub fn delete(&mut self, path: &NodePath) -> Result<()> {
        self.begin(Operation::Delete, path);
        let result = self.client.delete(path.as_str());
        self.finish(Operation::Delete, path, result)
    }

    /// Names of the immediate children, sorted ascending.
    pub fn list_children(&mut self, path: &NodePath) -> Result<Vec<String>> {
        self.begin(Operation::ListChildren, path);
        let result = self.client.children(path.as_str()).map(|mut names| {
            names.sort();
            names
        });
        self.finish(Operation::ListChildren, path, result)
    }

    /// Message of the most recent failure, if the latest primitive failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// Tear the session down. Dropping it has the same effect.
    pub fn close(self) {
        log::debug!("Closing coordination store session");
        drop(self.client);
    }

    fn begin(&mut self, op: Operation, path: &NodePath) {
        self.last_error = None;
        log::trace!("{} {}", op, path);
    }

    fn finish<T>(
        &mut self,
        op: Operation,
        path: &NodePath,
        result: std::result::Result<T, LLError>,
    ) -> Result<T> {
        result.map_err(|source| {
            let error = Error::remote(op, path.as_str(), source);
            let message = error.to_string();
            log::error!("{}", message);
            self.last_error = Some(message);
            error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coordstore_node_store::InMemoryClient;

    fn session() -> Session<InMemoryClient> {
        Session::new(InMemoryClient::new())
    }

    #[test]
    fn create_then_get() {
        let mut session = session();
        let path = NodePath::new("/a");

        assert!(!session.exists(&path).unwrap());
        session.create(&path, "v").unwrap();
        assert!(session.exists(&path).unwrap());
        assert_eq!(session.get(&path).unwrap(), Some(Bytes::from_static(b"v")));
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn get_absent_is_none() {
        let mut session = session();
        assert_eq!(session.get(&NodePath::new("/missing")).unwrap(), None);
    }

    #[test]
    fn failure_records_last_error() {
        let mut session = session();
        let err = session.set(&NodePath::new("/missing"), "v").unwrap_err();

        assert_eq!(err.operation(), Some(Operation::Set));
        let recorded = session.last_error().unwrap();
        assert!(recorded.contains("/missing"));
        assert!(recorded.contains("set"));
    }

    #[test]
    fn next_primitive_clears_last_error() {
        let mut session = session();
        session.delete(&NodePath::new("/missing")).unwrap_err();
        assert!(session.last_error().is_some());

        session.exists(&NodePath::root()).unwrap();
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn list_children_is_sorted() {
        let mut session = session();
        for name in ["c", "a", "b"] {
            session.create(&NodePath::root().join(name), "").unwrap();
        }
        assert_eq!(
            session.list_children(&NodePath::root()).unwrap(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn connect_failure_is_connection_error() {
        let result: Result<Session<InMemoryClient>> =
            Session::connect("127.0.0.1:2181", || Err(LLError::SessionClosed));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
        assert!(err.to_string().contains("127.0.0.1:2181"));
    }

    #[test]
    fn connect_success_wraps_client() {
        let mut session = Session::connect("memory", || Ok(InMemoryClient::new())).unwrap();
        assert!(session.exists(&NodePath::root()).unwrap());
    }

    #[test]
    fn works_over_boxed_client() {
        let client: Box<dyn NodeClient> = Box::new(InMemoryClient::new());
        let mut session = Session::new(client);
        session.create(&NodePath::new("/boxed"), "x").unwrap();
        assert!(session.exists(&NodePath::new("/boxed")).unwrap());
    }
}
