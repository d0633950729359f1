//! Deleting a node together with everything below it.

use coordstore_ll::NodeClient;

use crate::{children, NodePath, Result, Session};

/// Delete `path` and all of its descendants, bottom up.
///
/// A node that does not exist is already deleted: the call succeeds without
/// touching the store. Children go first, in ascending name order, so the
/// store never sees a delete for a node that still has children.
///
/// The first failure stops the walk and is returned. Nodes deleted before it
/// stay deleted.
pub fn delete_subtree<C: NodeClient>(session: &mut Session<C>, path: &NodePath) -> Result<()> {
    if !session.exists(path)? {
        log::debug!("{} already absent", path);
        return Ok(());
    }

    for name in children::list(session, path)? {
        delete_subtree(session, &path.join(&name))?;
    }

    log::debug!("Deleting {}", path);
    session.delete(path)
}
