//! Listing the immediate children of a node.

use coordstore_ll::NodeClient;

use crate::{NodePath, Result, Session};

/// The children of `path`, sorted ascending.
///
/// A node that does not exist has no children: the result is empty rather
/// than an error. Repeated calls on an unchanged tree return the same order.
pub fn list<C: NodeClient>(session: &mut Session<C>, path: &NodePath) -> Result<Vec<String>> {
    if !session.exists(path)? {
        log::debug!("Listing {}: node does not exist", path);
        return Ok(Vec::new());
    }
    session.list_children(path)
}
