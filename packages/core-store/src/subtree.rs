//! Reading a whole subtree into memory.

use std::collections::BTreeMap;

use bytes::Bytes;
use coordstore_ll::NodeClient;

use crate::{children, NodePath, Result, Session};

/// One entry of a [`Subtree`].
///
/// The store lets a node hold a value and have children at the same time.
/// A nested map cannot, so a node with children is a `Parent` and its own
/// value is not kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A node without children, with its value.
    Leaf(Bytes),
    /// A node with at least one child.
    Parent(Subtree),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&Bytes> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Parent(_) => None,
        }
    }

    pub fn as_parent(&self) -> Option<&Subtree> {
        match self {
            Node::Parent(subtree) => Some(subtree),
            Node::Leaf(_) => None,
        }
    }
}

/// The children of a node, by name, each either a leaf or a nested subtree.
///
/// Iteration is in ascending name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subtree {
    entries: BTreeMap<String, Node>,
}

impl Subtree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.entries.insert(name.into(), node)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    /// Walk a relative `/`-separated path down through parents.
    pub fn lookup(&self, relative: &str) -> Option<&Node> {
        let mut segments = relative.split('/').filter(|s| !s.is_empty());
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            node = node.as_parent()?.get(segment)?;
        }
        Some(node)
    }

    /// The value of the leaf at `relative`, if there is a leaf there.
    pub fn leaf(&self, relative: &str) -> Option<&Bytes> {
        self.lookup(relative)?.as_leaf()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entries.iter()
    }

    /// Count of leaves at every depth.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                Node::Leaf(_) => 1,
                Node::Parent(subtree) => subtree.leaf_count(),
            })
            .sum()
    }
}

impl IntoIterator for Subtree {
    type Item = (String, Node);
    type IntoIter = std::collections::btree_map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Subtree {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Subtree {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Read everything below `path`.
///
/// Each child with children of its own becomes a [`Node::Parent`] holding
/// its recursively read subtree; every other child becomes a
/// [`Node::Leaf`] with its value. A node with no children, or a node that
/// does not exist, reads as an empty subtree.
///
/// If any store call fails, the whole read fails and nothing is returned.
/// A leaf that disappears between being listed and being read is left out
/// entirely rather than kept under its name with no value.
pub fn read<C: NodeClient>(session: &mut Session<C>, path: &NodePath) -> Result<Subtree> {
    let names = children::list(session, path)?;
    read_children(session, path, names)
}

fn read_children<C: NodeClient>(
    session: &mut Session<C>,
    path: &NodePath,
    names: Vec<String>,
) -> Result<Subtree> {
    let mut subtree = Subtree::new();
    for name in names {
        let child = path.join(&name);
        let grandchildren = children::list(session, &child)?;
        if grandchildren.is_empty() {
            match session.get(&child)? {
                Some(value) => {
                    subtree.insert(name, Node::Leaf(value));
                }
                None => log::debug!("{} vanished during subtree read", child),
            }
        } else {
            let nested = read_children(session, &child, grandchildren)?;
            subtree.insert(name, Node::Parent(nested));
        }
    }
    Ok(subtree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coordstore_ll::{Acl, LLError, Operation};
    use coordstore_node_store::InMemoryClient;

    fn seeded() -> Session<InMemoryClient> {
        let mut session = Session::new(InMemoryClient::new());
        for (path, value) in [
            ("/a", "parent value"),
            ("/a/x", "1"),
            ("/a/b", ""),
            ("/a/b/y", "2"),
            ("/a/empty", ""),
        ] {
            session.create(&NodePath::new(path), value).unwrap();
        }
        session
    }

    #[test]
    fn reads_nested_structure() {
        let mut session = seeded();
        let tree = read(&mut session, &NodePath::new("/a")).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.leaf("x"), Some(&Bytes::from_static(b"1")));
        assert_eq!(tree.leaf("b/y"), Some(&Bytes::from_static(b"2")));
        assert_eq!(tree.leaf("empty"), Some(&Bytes::new()));
        assert!(tree.get("b").unwrap().as_parent().is_some());
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn parent_value_is_dropped() {
        let mut session = seeded();
        let tree = read(&mut session, &NodePath::root()).unwrap();

        let a = tree.get("a").unwrap();
        assert!(!a.is_leaf());
        assert!(a.as_leaf().is_none());
    }

    #[test]
    fn leaf_and_missing_paths_read_empty() {
        let mut session = seeded();
        assert!(read(&mut session, &NodePath::new("/a/x")).unwrap().is_empty());
        assert!(read(&mut session, &NodePath::new("/zzz")).unwrap().is_empty());
    }

    #[test]
    fn iteration_is_ordered() {
        let mut session = seeded();
        let tree = read(&mut session, &NodePath::new("/a")).unwrap();
        let names: Vec<&String> = tree.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "empty", "x"]);
    }

    #[test]
    fn failure_mid_traversal_fails_whole_read() {
        let mut session = seeded();
        session
            .client_mut()
            .fail_on(Operation::Get, "/a/b/y");

        let err = read(&mut session, &NodePath::new("/a")).unwrap_err();
        assert_eq!(err.path(), Some("/a/b/y"));
        assert!(session.last_error().unwrap().contains("/a/b/y"));
    }

    /// Lists every node but reports `vanished` as gone when it is read, as if
    /// it were deleted between the two calls.
    struct Vanishing {
        inner: InMemoryClient,
        vanished: &'static str,
    }

    impl NodeClient for Vanishing {
        fn exists(&mut self, path: &str) -> std::result::Result<bool, LLError> {
            self.inner.exists(path)
        }

        fn get(&mut self, path: &str) -> std::result::Result<Option<Bytes>, LLError> {
            if path == self.vanished {
                return Ok(None);
            }
            self.inner.get(path)
        }

        fn set(&mut self, path: &str, data: Bytes) -> std::result::Result<(), LLError> {
            self.inner.set(path, data)
        }

        fn create(
            &mut self,
            path: &str,
            data: Bytes,
            acl: &[Acl],
        ) -> std::result::Result<(), LLError> {
            self.inner.create(path, data, acl)
        }

        fn delete(&mut self, path: &str) -> std::result::Result<(), LLError> {
            self.inner.delete(path)
        }

        fn children(&mut self, path: &str) -> std::result::Result<Vec<String>, LLError> {
            self.inner.children(path)
        }
    }

    #[test]
    fn vanished_leaf_is_left_out() {
        let mut session = Session::new(Vanishing {
            inner: seeded().into_inner(),
            vanished: "/a/x",
        });

        let tree = read(&mut session, &NodePath::new("/a")).unwrap();
        assert!(tree.get("x").is_none());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.leaf("b/y"), Some(&Bytes::from_static(b"2")));
        assert_eq!(tree.leaf("empty"), Some(&Bytes::new()));
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn lookup_through_leaf_is_none() {
        let mut session = seeded();
        let tree = read(&mut session, &NodePath::new("/a")).unwrap();
        assert!(tree.lookup("x/deeper").is_none());
        assert!(tree.lookup("").is_none());
    }
}
