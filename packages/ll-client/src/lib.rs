//! Low-level coordination store client.
//!
//! This is the narrow waist of the coordstore stack. Everything at this level
//! is a single round trip to the store: six primitives over absolute paths and
//! opaque byte values. No templates, no recursion, no error bookkeeping.
//!
//! Use this layer for:
//! - Binding a concrete store client (network, disk, in-memory)
//! - Test doubles that need to observe individual store calls
//!
//! # Example
//!
//! ```rust
//! use coordstore_ll::{Acl, LLError, NodeClient};
//! use bytes::Bytes;
//!
//! fn publish(client: &mut dyn NodeClient, id: &str) -> Result<(), LLError> {
//!     let path = format!("/clients/{}", id);
//!     if client.exists(&path)? {
//!         client.set(&path, Bytes::from_static(b"online"))
//!     } else {
//!         client.create(&path, Bytes::from_static(b"online"), &Acl::open_unsafe())
//!     }
//! }
//! ```

pub use bytes::Bytes;

mod acl;
mod error;
mod traits;

pub use acl::{Acl, Perms};
pub use error::LLError;
pub use traits::{NodeClient, Operation};
