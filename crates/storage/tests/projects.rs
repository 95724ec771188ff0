#![forbid(unsafe_code)]

use bubbles_core::graph::BubbleState;
use bubbles_core::ids::ProjectId;
use bubbles_storage::{SqliteStore, StoreError};

fn open_store() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SqliteStore::open(dir.path()).expect("open store");
    (dir, store)
}

#[test]
fn create_and_list_projects_in_id_order() {
    let (_dir, mut store) = open_store();
    let first = store.create_project("  Launch ").expect("create first");
    let second = store.create_project("Migration").expect("create second");

    assert_eq!(first.name, "Launch");
    assert!(first.id < second.id);

    let listed = store.list_projects().expect("list projects");
    assert_eq!(listed, vec![first.clone(), second]);
    assert_eq!(store.project(first.id).expect("project"), first);
}

#[test]
fn blank_project_name_is_rejected() {
    let (_dir, mut store) = open_store();
    let err = store.create_project("   ").unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert!(err.is_client_error());
    assert!(store.list_projects().expect("list").is_empty());
}

#[test]
fn unknown_project_lookup_fails() {
    let (_dir, mut store) = open_store();
    let missing = ProjectId::try_new(404).unwrap();
    assert!(matches!(
        store.project(missing).unwrap_err(),
        StoreError::UnknownProject(id) if id == missing
    ));
    assert!(matches!(
        store.project_graph(missing).unwrap_err(),
        StoreError::UnknownProject(_)
    ));
}

#[test]
fn delete_project_cascades_to_pairs_and_states() {
    let (_dir, mut store) = open_store();
    let doomed = store.create_project("doomed").expect("create").id;
    let kept = store.create_project("kept").expect("create").id;

    store.add_triple(doomed, "a", "b", "c").expect("add");
    store.flip_state(doomed, "b").expect("flip");
    store.add_triple(kept, "a", "b", "").expect("add");
    store.flip_state(kept, "a").expect("flip");

    assert!(store.delete_project(doomed).expect("delete"));
    assert!(!store.delete_project(doomed).expect("delete again"));

    assert!(store.list_pairs(doomed).expect("pairs").is_empty());
    assert!(store.list_bubble_rows(doomed).expect("rows").is_empty());
    assert!(matches!(
        store.project(doomed).unwrap_err(),
        StoreError::UnknownProject(_)
    ));

    assert_eq!(store.list_pairs(kept).expect("pairs").len(), 1);
    assert_eq!(
        store.list_bubble_rows(kept).expect("rows")[0].state,
        BubbleState::Started
    );
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let id = {
        let mut store = SqliteStore::open(dir.path()).expect("open");
        let id = store.create_project("persisted").expect("create").id;
        store.add_triple(id, "x", "y", "").expect("add");
        id
    };

    let mut store = SqliteStore::open(dir.path()).expect("reopen");
    assert!(store.db_path().ends_with("bubbles.db"));
    let snapshot = store.project_graph(id).expect("graph");
    assert_eq!(snapshot.project.name, "persisted");
    assert_eq!(snapshot.graph.known_activities(), vec!["x", "y"]);
}
