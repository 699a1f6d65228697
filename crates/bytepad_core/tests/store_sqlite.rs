use std::time::Instant;

use bytepad_core::model::connection::Connection;
use bytepad_core::store::sqlite::latest_schema_version;
use bytepad_core::store::{
    AssetRecord, AssetStore, BoardConfig, BoardInfo, BoardStore, StoreError, WorkspaceMeta,
};
use bytepad_core::{
    open_store, open_store_in_memory, AssetId, BoardId, BoardSession, ColorTag, Note, NoteGraph,
    NoteId, Point,
};

#[test]
fn a_fresh_store_applies_all_migrations() {
    let store = open_store_in_memory().unwrap();
    assert_eq!(store.schema_version().unwrap(), latest_schema_version());
    assert!(store.load_meta().unwrap().is_none());
    assert!(store.load_config().unwrap().is_none());
}

#[test]
fn reopening_the_same_database_is_idempotent_and_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bytepad.db");
    let main = BoardId::from_raw("main");

    let note_id = {
        let store = open_store(&path).unwrap();
        let mut graph = NoteGraph::new();
        let id = add_note_at(&mut graph, 10.0, 20.0);
        store.save_board(&main, &graph.snapshot()).unwrap();
        id
    };

    let store = open_store(&path).unwrap();
    assert_eq!(store.schema_version().unwrap(), latest_schema_version());
    let snapshot = store.load_board(&main).unwrap().unwrap();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].id, note_id);
}

#[test]
fn databases_from_a_newer_build_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", 999).unwrap();
    }

    match open_store(&path) {
        Err(StoreError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_schema_version());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn board_and_connection_records_round_trip() {
    let store = open_store_in_memory().unwrap();
    let board = BoardId::from_raw("b_round");

    let mut graph = NoteGraph::new();
    let a = add_note_at(&mut graph, 0.0, 0.0);
    let b = add_note_at(&mut graph, 300.0, 0.0);
    graph.add_connection(a.clone(), b.clone());
    store.save_board(&board, &graph.snapshot()).unwrap();

    let loaded = store.load_board(&board).unwrap().unwrap();
    assert_eq!(loaded, graph.snapshot());
    assert!(store
        .load_board(&BoardId::from_raw("b_unknown"))
        .unwrap()
        .is_none());

    let links = vec![Connection::new(a, b)];
    store.save_connections(&board, &links).unwrap();
    assert_eq!(store.load_connections(&board).unwrap(), links);
    assert!(store
        .load_connections(&BoardId::from_raw("b_unknown"))
        .unwrap()
        .is_empty());
}

#[test]
fn meta_and_config_records_round_trip() {
    let store = open_store_in_memory().unwrap();

    let mut meta = WorkspaceMeta::bootstrap();
    meta.boards.push(BoardInfo {
        id: BoardId::from_raw("b_two"),
        title: "Two".to_owned(),
    });
    store.save_meta(&meta).unwrap();
    assert_eq!(store.load_meta().unwrap(), Some(meta));

    let config = BoardConfig {
        default_color: ColorTag::Blue,
        snap_enabled: false,
    };
    store.save_config(&config).unwrap();
    assert_eq!(store.load_config().unwrap(), Some(config));
}

#[test]
fn asset_blobs_round_trip_with_sorted_listing() {
    let store = open_store_in_memory().unwrap();
    let b_id = AssetId::from_raw("a_bbb");
    store.put_asset(&b_id, &record(&[1, 2], "b.bin")).unwrap();
    store
        .put_asset(&AssetId::from_raw("a_ccc"), &record(&[3], "c.bin"))
        .unwrap();
    store
        .put_asset(&AssetId::from_raw("a_aaa"), &record(&[4], "a.bin"))
        .unwrap();

    let listed = store.list_asset_ids().unwrap();
    assert_eq!(
        listed,
        vec![
            AssetId::from_raw("a_aaa"),
            AssetId::from_raw("a_bbb"),
            AssetId::from_raw("a_ccc"),
        ]
    );

    let fetched = store.get_asset(&b_id).unwrap().unwrap();
    assert_eq!(fetched.bytes, vec![1, 2]);
    assert_eq!(fetched.name, "b.bin");

    // Re-putting an id replaces its blob and metadata.
    store.put_asset(&b_id, &record(&[9, 9], "b2.bin")).unwrap();
    let replaced = store.get_asset(&b_id).unwrap().unwrap();
    assert_eq!(replaced.bytes, vec![9, 9]);
    assert_eq!(replaced.name, "b2.bin");

    store.delete_asset(&b_id).unwrap();
    assert!(store.get_asset(&b_id).unwrap().is_none());
    assert_eq!(store.list_asset_ids().unwrap().len(), 2);
}

#[test]
fn a_session_over_sqlite_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.db");
    let t0 = Instant::now();

    {
        let mut session = BoardSession::open(open_store(&path).unwrap());
        let id = session.create_note(Some(Point::new(240.0, 180.0)), t0);
        session.set_note_title(&id, "persisted", t0);
        session.save_now();
    }

    let session = BoardSession::open(open_store(&path).unwrap());
    assert_eq!(session.graph().len(), 1);
    assert_eq!(session.graph().notes()[0].title, "persisted");
    assert_eq!(session.graph().notes()[0].position, Point::new(240.0, 180.0));
}

fn add_note_at(graph: &mut NoteGraph, x: f64, y: f64) -> NoteId {
    let note = Note::new_at(Point::new(x, y));
    let id = note.id.clone();
    graph.add_note(note).unwrap();
    id
}

fn record(bytes: &[u8], name: &str) -> AssetRecord {
    AssetRecord {
        bytes: bytes.to_vec(),
        mime: "application/octet-stream".to_owned(),
        name: name.to_owned(),
    }
}
