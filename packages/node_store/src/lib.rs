//! Concrete coordination store clients.
//!
//! - [`InMemoryClient`]: a tree in memory, with a mutation journal and
//!   injectable failures
//! - [`LocalDiskClient`]: a tree of directories under a local root
//!
//! Both enforce the same rules a remote store does: `create` needs an existing
//! parent, `delete` refuses nodes with children, and malformed paths are
//! rejected with [`LLError::InvalidPath`](coordstore_ll::LLError::InvalidPath).

pub mod in_memory;
pub mod local_disk;
mod node_path;

pub use in_memory::{InMemoryClient, Mutation};
pub use local_disk::LocalDiskClient;
