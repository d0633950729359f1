//! Writing a node, creating whatever ancestors are missing.

use bytes::Bytes;
use coordstore_ll::NodeClient;

use crate::{NodePath, Result, Session};

/// Set the value at `path`, creating the node if needed.
///
/// An existing node is updated in place. Otherwise every missing ancestor is
/// created first, top down, with an empty value, and then the node itself is
/// created with `value`.
///
/// If creating an ancestor fails the node is not attempted. Ancestors that
/// were already created stay; they are empty and a retry reuses them.
pub fn set_node<C: NodeClient>(
    session: &mut Session<C>,
    path: &NodePath,
    value: impl Into<Bytes>,
) -> Result<()> {
    let value = value.into();
    if session.exists(path)? {
        log::debug!("Updating {}", path);
        return session.set(path, value);
    }

    // The root always exists, so the recursion stops there at the latest.
    if let Some(parent) = path.parent() {
        if !session.exists(&parent)? {
            set_node(session, &parent, Bytes::new())?;
        }
    }

    log::debug!("Creating {}", path);
    session.create(path, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coordstore_ll::Operation;
    use coordstore_node_store::{InMemoryClient, Mutation};

    #[test]
    fn creates_missing_ancestors_empty() {
        let mut session = Session::new(InMemoryClient::new());
        set_node(&mut session, &NodePath::new("/a/b/c"), "leaf").unwrap();

        assert_eq!(
            session.get(&NodePath::new("/a/b/c")).unwrap(),
            Some(Bytes::from_static(b"leaf"))
        );
        assert_eq!(session.get(&NodePath::new("/a/b")).unwrap(), Some(Bytes::new()));
        assert_eq!(session.get(&NodePath::new("/a")).unwrap(), Some(Bytes::new()));
        assert_eq!(
            session.client().journal(),
            &[
                Mutation::Create("/a".to_string()),
                Mutation::Create("/a/b".to_string()),
                Mutation::Create("/a/b/c".to_string()),
            ]
        );
    }

    #[test]
    fn existing_node_is_set_not_created() {
        let mut session = Session::new(InMemoryClient::new());
        set_node(&mut session, &NodePath::new("/a"), "one").unwrap();
        set_node(&mut session, &NodePath::new("/a"), "two").unwrap();

        assert_eq!(
            session.get(&NodePath::new("/a")).unwrap(),
            Some(Bytes::from_static(b"two"))
        );
        assert_eq!(
            session.client().journal().last(),
            Some(&Mutation::Set("/a".to_string()))
        );
    }

    #[test]
    fn existing_ancestors_are_untouched() {
        let mut session = Session::new(InMemoryClient::new());
        session.create(&NodePath::new("/a"), "keep").unwrap();
        set_node(&mut session, &NodePath::new("/a/b"), "v").unwrap();

        assert_eq!(
            session.get(&NodePath::new("/a")).unwrap(),
            Some(Bytes::from_static(b"keep"))
        );
    }

    #[test]
    fn ancestor_failure_aborts_without_rollback() {
        let mut session = Session::new(InMemoryClient::new());
        session.client_mut().fail_on(Operation::Create, "/a/b");

        let err = set_node(&mut session, &NodePath::new("/a/b/c"), "v").unwrap_err();
        assert_eq!(err.path(), Some("/a/b"));

        // `/a` was created before the failure and stays.
        assert!(session.exists(&NodePath::new("/a")).unwrap());
        assert!(!session.exists(&NodePath::new("/a/b/c")).unwrap());
        assert_eq!(
            session.client().journal(),
            &[Mutation::Create("/a".to_string())]
        );
    }

    #[test]
    fn malformed_path_is_a_remote_error() {
        let mut session = Session::new(InMemoryClient::new());
        let err = set_node(&mut session, &NodePath::new("relative"), "v").unwrap_err();
        assert!(err.operation().is_some());
        assert!(session.last_error().is_some());
    }
}
