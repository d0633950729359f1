//! Serde integration for coordstore.
//!
//! This layer reads and writes whole subtrees as serde values:
//! - `subtree_to_json`: a [`Subtree`](coordstore_core::Subtree) as a JSON value
//! - `TypedSession`: `read_as` / `write_as` on a session
//! - `LeafEncoding`: how scalars are laid out in leaf bytes
//!
//! Objects map to parent nodes, arrays to parents with children `0..n`, and
//! scalars to leaves.

pub use bytes::Bytes;

mod codec;
mod convert;
mod error;
mod typed;

pub use codec::LeafEncoding;
pub use convert::{from_subtree, json_to_leaves, subtree_to_json};
pub use error::{Result, SerdeError};
pub use typed::TypedSession;
