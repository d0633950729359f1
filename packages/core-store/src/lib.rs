//! Core coordstore: recursive operations over a coordination store.
//!
//! This layer turns the six single-node primitives of
//! [`coordstore_ll::NodeClient`] into tree operations:
//! - [`resolve`] / [`NodePath`]: injection-safe path templates
//! - [`Session`]: the one connection, with last-error bookkeeping
//! - [`children::list`]: sorted children, empty for missing nodes
//! - [`subtree::read`]: a whole subtree as a nested [`Subtree`]
//! - [`writer::set_node`]: create-or-update with missing ancestors
//! - [`deleter::delete_subtree`]: bottom-up recursive delete
//! - [`Storage`]: all of the above behind path templates
//!
//! Every operation walks the tree depth first, one store call at a time, and
//! returns an explicit `Result`. Nothing is retried and nothing is rolled back.
//!
//! # Example
//!
//! ```rust
//! use coordstore_core::{deleter, subtree, writer, NodePath, Session};
//! use coordstore_node_store::InMemoryClient;
//!
//! let mut session = Session::new(InMemoryClient::new());
//! writer::set_node(&mut session, &NodePath::new("/a/x"), "1").unwrap();
//! writer::set_node(&mut session, &NodePath::new("/a/b/y"), "2").unwrap();
//!
//! let tree = subtree::read(&mut session, &NodePath::new("/a")).unwrap();
//! assert_eq!(tree.leaf("b/y").unwrap().as_ref(), b"2");
//!
//! deleter::delete_subtree(&mut session, &NodePath::new("/a")).unwrap();
//! ```

pub use bytes::Bytes;

pub mod children;
pub mod deleter;
mod error;
mod path;
mod session;
mod storage;
pub mod subtree;
pub mod writer;

pub use error::{Error, Result};
pub use path::{join, resolve, NodePath, Params};
pub use session::Session;
pub use storage::Storage;
pub use subtree::{Node, Subtree};

// Re-export LL types for convenience
pub use coordstore_ll::{Acl, LLError, NodeClient, Operation};
