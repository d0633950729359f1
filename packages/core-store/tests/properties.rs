use coordstore_core::{
    children, deleter, resolve, subtree, writer, Bytes, NodePath, Operation, Params, Session,
    Storage,
};
use coordstore_node_store::{InMemoryClient, Mutation};

fn session() -> Session<InMemoryClient> {
    Session::new(InMemoryClient::new())
}

fn mutations(session: &Session<InMemoryClient>) -> Vec<Mutation> {
    session.client().journal().to_vec()
}

#[test]
fn test_params_cannot_escape_their_segment() {
    let params = Params::from([(":id", "23/secret")]);
    assert_eq!(resolve("/clients/:id", &params), "/clients/23");

    let params = Params::new().with(":id", "23/../../etc").with(":f", "name");
    assert_eq!(resolve("/clients/:id/:f", &params), "/clients/23/name");
}

#[test]
fn test_delete_twice_is_idempotent() {
    let mut session = session();
    writer::set_node(&mut session, &NodePath::new("/a/b/c"), "v").unwrap();
    session.client_mut().clear_journal();

    let path = NodePath::new("/a");
    deleter::delete_subtree(&mut session, &path).unwrap();
    let after_first = mutations(&session).len();
    assert_eq!(after_first, 3);

    deleter::delete_subtree(&mut session, &path).unwrap();
    assert_eq!(mutations(&session).len(), after_first);
}

#[test]
fn test_set_then_get_on_fresh_deep_path() {
    let mut session = session();
    let path = NodePath::new("/services/billing/db/host");
    writer::set_node(&mut session, &path, "db1").unwrap();

    assert_eq!(
        session.get(&path).unwrap(),
        Some(Bytes::from_static(b"db1"))
    );
    for ancestor in ["/services", "/services/billing", "/services/billing/db"] {
        assert_eq!(
            session.get(&NodePath::new(ancestor)).unwrap(),
            Some(Bytes::new()),
            "ancestor {} should exist and be empty",
            ancestor
        );
    }
}

#[test]
fn test_subtree_read_is_complete() {
    let mut session = session();
    writer::set_node(&mut session, &NodePath::new("/a/x"), "1").unwrap();
    writer::set_node(&mut session, &NodePath::new("/a/b/y"), "2").unwrap();

    let tree = subtree::read(&mut session, &NodePath::new("/a")).unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.leaf("x"), Some(&Bytes::from_static(b"1")));
    assert_eq!(tree.leaf("b/y"), Some(&Bytes::from_static(b"2")));
    assert!(!tree.get("b").unwrap().is_leaf());
    assert_eq!(tree.leaf_count(), 2);
}

#[test]
fn test_empty_tree_reads_empty() {
    let mut session = session();
    assert!(subtree::read(&mut session, &NodePath::root())
        .unwrap()
        .is_empty());
    assert!(subtree::read(&mut session, &NodePath::new("/missing"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_listing_is_sorted_and_stable() {
    let mut session = session();
    for name in ["zeta", "alpha", "10", "9", "Mid"] {
        writer::set_node(&mut session, &NodePath::new("/p").join(name), "").unwrap();
    }

    let path = NodePath::new("/p");
    let first = children::list(&mut session, &path).unwrap();
    assert_eq!(first, vec!["10", "9", "Mid", "alpha", "zeta"]);
    for _ in 0..3 {
        assert_eq!(children::list(&mut session, &path).unwrap(), first);
    }
}

#[test]
fn test_deletion_is_bottom_up() {
    let mut session = session();
    writer::set_node(&mut session, &NodePath::new("/a/b/c"), "v").unwrap();
    session.client_mut().clear_journal();

    deleter::delete_subtree(&mut session, &NodePath::new("/a")).unwrap();
    assert_eq!(
        mutations(&session),
        vec![
            Mutation::Delete("/a/b/c".to_string()),
            Mutation::Delete("/a/b".to_string()),
            Mutation::Delete("/a".to_string()),
        ]
    );
}

#[test]
fn test_partial_delete_is_not_rolled_back() {
    let mut session = session();
    writer::set_node(&mut session, &NodePath::new("/a/b/c"), "v").unwrap();
    writer::set_node(&mut session, &NodePath::new("/a/d"), "w").unwrap();
    session.client_mut().fail_on(Operation::Delete, "/a/d");

    let err = deleter::delete_subtree(&mut session, &NodePath::new("/a")).unwrap_err();
    assert_eq!(err.path(), Some("/a/d"));
    assert!(!session.exists(&NodePath::new("/a/b")).unwrap());
    assert!(session.exists(&NodePath::new("/a/d")).unwrap());
}

#[test]
fn test_storage_facade_end_to_end() {
    let mut storage = Storage::new(session());
    let params = Params::new().with(":id", 23);

    storage
        .set("/clients/:id/hostname", "web1", &params)
        .unwrap();
    storage.set("/clients/:id/port", "80", &params).unwrap();

    assert_eq!(storage.get_list("/clients", &Params::new()).unwrap(), vec!["23"]);
    let tree = storage.get_recursive("/clients/:id", &params).unwrap();
    assert_eq!(tree.leaf("hostname"), Some(&Bytes::from_static(b"web1")));

    storage.delete("/clients/:id", &params).unwrap();
    assert!(!storage.exists("/clients/:id", &params).unwrap());
    assert_eq!(storage.last_error(), None);
}
