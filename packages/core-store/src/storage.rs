//! A template-driven facade over a session.
//!
//! Every method takes a path template and its [`Params`], resolves them into
//! a concrete path, and runs the matching operation:
//!
//! ```rust
//! use coordstore_core::{Params, Session, Storage};
//! use coordstore_node_store::InMemoryClient;
//!
//! let mut storage = Storage::new(Session::new(InMemoryClient::new()));
//! let client = Params::new().with(":id", 23);
//!
//! storage.set("/clients/:id/hostname", "db1", &client).unwrap();
//! let tree = storage.get_recursive("/clients", &Params::new()).unwrap();
//! assert_eq!(tree.leaf("23/hostname").unwrap().as_ref(), b"db1");
//! ```

use bytes::Bytes;
use coordstore_ll::NodeClient;

use crate::{children, deleter, subtree, writer, NodePath, Params, Result, Session, Subtree};

pub struct Storage<C> {
    session: Session<C>,
}

impl<C: NodeClient> Storage<C> {
    pub fn new(session: Session<C>) -> Self {
        Self { session }
    }

    pub fn exists(&mut self, template: &str, params: &Params) -> Result<bool> {
        let path = NodePath::resolve(template, params);
        self.session.exists(&path)
    }

    /// The value at the resolved path; `None` if there is no node.
    pub fn get(&mut self, template: &str, params: &Params) -> Result<Option<Bytes>> {
        let path = NodePath::resolve(template, params);
        self.session.get(&path)
    }

    /// Sorted child names; empty for a missing node.
    pub fn get_list(&mut self, template: &str, params: &Params) -> Result<Vec<String>> {
        let path = NodePath::resolve(template, params);
        children::list(&mut self.session, &path)
    }

    /// Everything below the resolved path. See [`subtree::read`].
    pub fn get_recursive(&mut self, template: &str, params: &Params) -> Result<Subtree> {
        let path = NodePath::resolve(template, params);
        subtree::read(&mut self.session, &path)
    }

    /// Create or update, creating missing ancestors. See [`writer::set_node`].
    pub fn set(&mut self, template: &str, value: impl Into<Bytes>, params: &Params) -> Result<()> {
        let path = NodePath::resolve(template, params);
        writer::set_node(&mut self.session, &path, value)
    }

    /// Delete the resolved path and its descendants. See
    /// [`deleter::delete_subtree`].
    pub fn delete(&mut self, template: &str, params: &Params) -> Result<()> {
        let path = NodePath::resolve(template, params);
        deleter::delete_subtree(&mut self.session, &path)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.session.last_error()
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<C> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<C> {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coordstore_node_store::InMemoryClient;

    fn storage() -> Storage<InMemoryClient> {
        Storage::new(Session::new(InMemoryClient::new()))
    }

    #[test]
    fn injected_segment_never_reaches_store() {
        let mut storage = storage();
        storage
            .set("/clients/:id/secret", "hunter2", &Params::new().with(":id", 23))
            .unwrap();

        let params = Params::new().with(":id", "23/secret");
        assert_eq!(storage.get("/clients/:id", &params).unwrap(), Some(Bytes::new()));
        assert_eq!(storage.get_list("/clients/:id", &params).unwrap(), vec!["secret"]);
    }

    #[test]
    fn set_get_delete_cycle() {
        let mut storage = storage();
        let params = Params::new().with(":host", "db1");

        storage.set("/hosts/:host/port", "5432", &params).unwrap();
        assert!(storage.exists("/hosts/:host", &params).unwrap());
        assert_eq!(
            storage.get("/hosts/:host/port", &params).unwrap(),
            Some(Bytes::from_static(b"5432"))
        );

        storage.delete("/hosts/:host", &params).unwrap();
        assert!(!storage.exists("/hosts/:host", &params).unwrap());
        assert_eq!(storage.get_list("/hosts", &Params::new()).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn empty_template_reads_from_root() {
        let mut storage = storage();
        storage.set("/a", "1", &Params::new()).unwrap();
        let tree = storage.get_recursive("", &Params::new()).unwrap();
        assert_eq!(tree.leaf("a"), Some(&Bytes::from_static(b"1")));
    }

    #[test]
    fn last_error_is_reported_through_facade() {
        let mut storage = storage();
        storage
            .session_mut()
            .client_mut()
            .fail_on(coordstore_ll::Operation::Create, "/x");
        assert!(storage.set("/x", "v", &Params::new()).is_err());
        assert!(storage.last_error().unwrap().contains("/x"));
    }
}
