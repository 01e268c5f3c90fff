use dsanote_core::db::open_db_in_memory;
use dsanote_core::{
    EntryContent, EntryPatch, EntryPlacement, Group, GroupPlacement, NewEntry, OrderStore,
    SaveBatch, SqliteOrderStore, StoreError,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn new_entry(id: &str, parent: Option<&str>, print_order: i64) -> NewEntry {
    let mut entry = NewEntry::with_id(id, EntryContent::titled(format!("Title {id}")));
    entry.parent_id = parent.map(str::to_string);
    entry.print_order = print_order;
    entry
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

#[test]
fn listings_follow_print_order_with_insertion_tiebreak() {
    let conn = setup();
    let store = SqliteOrderStore::try_new(&conn).unwrap();
    store.create_group(&Group::with_id("g2", "Trees", 1)).unwrap();
    store.create_group(&Group::with_id("g1", "Graphs", 0)).unwrap();
    store.create_group(&Group::with_id("g3", "Heaps", 1)).unwrap();
    store.create_entry(&new_entry("b", None, 1)).unwrap();
    store.create_entry(&new_entry("a", None, 0)).unwrap();
    store.create_entry(&new_entry("c", None, 1)).unwrap();

    let groups = store.list_groups().unwrap();
    assert_eq!(ids(&groups, |g| g.id.as_str()), vec!["g1", "g2", "g3"]);
    let entries = store.list_entries().unwrap();
    assert_eq!(ids(&entries, |e| e.id.as_str()), vec!["a", "b", "c"]);
}

#[test]
fn create_rejects_duplicates_unknown_parents_and_invalid_records() {
    let conn = setup();
    let store = SqliteOrderStore::try_new(&conn).unwrap();
    store.create_group(&Group::with_id("g1", "Graphs", 0)).unwrap();
    store.create_entry(&new_entry("a", Some("g1"), 0)).unwrap();

    assert!(matches!(
        store.create_entry(&new_entry("a", None, 0)),
        Err(StoreError::DuplicateEntryId(id)) if id == "a"
    ));
    assert!(matches!(
        store.create_group(&Group::with_id("g1", "Again", 1)),
        Err(StoreError::DuplicateGroupId(id)) if id == "g1"
    ));
    assert!(matches!(
        store.create_entry(&new_entry("b", Some("ghost"), 0)),
        Err(StoreError::GroupNotFound(id)) if id == "ghost"
    ));
    assert!(matches!(
        store.create_group(&Group::with_id("unorganized", "Reserved", 0)),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.create_group(&Group::with_id("g2", "   ", 0)),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn create_group_trims_name() {
    let conn = setup();
    let store = SqliteOrderStore::try_new(&conn).unwrap();
    let created = store
        .create_group(&Group::with_id("g1", "  Graphs  ", 0))
        .unwrap();
    assert_eq!(created.name, "Graphs");
    assert_eq!(store.list_groups().unwrap()[0].name, "Graphs");
}

#[test]
fn update_entry_by_row_replaces_only_patched_fields() {
    let conn = setup();
    let store = SqliteOrderStore::try_new(&conn).unwrap();
    store.create_group(&Group::with_id("g1", "Graphs", 0)).unwrap();
    let mut seed = new_entry("a", None, 4);
    seed.content.tags = vec!["bfs".to_string()];
    let created = store.create_entry(&seed).unwrap();

    let patch = EntryPatch {
        title: Some("Renamed".to_string()),
        parent_id: Some(Some("g1".to_string())),
        ..EntryPatch::default()
    };
    let updated = store.update_entry(created.row_id, patch).unwrap();
    assert_eq!(updated.title(), "Renamed");
    assert_eq!(updated.parent_id.as_deref(), Some("g1"));
    assert_eq!(updated.print_order, 4);
    assert_eq!(updated.content.tags, vec!["bfs".to_string()]);

    let reloaded = store.get_entry("a").unwrap().unwrap();
    assert_eq!(reloaded, updated);

    assert!(matches!(
        store.update_entry(9_999, EntryPatch::default()),
        Err(StoreError::RowNotFound(9_999))
    ));
}

#[test]
fn save_batch_reports_missing_and_orphaned_records() {
    let conn = setup();
    let store = SqliteOrderStore::try_new(&conn).unwrap();
    store.create_group(&Group::with_id("g1", "Graphs", 0)).unwrap();
    store.create_entry(&new_entry("a", None, 0)).unwrap();
    store.create_entry(&new_entry("b", None, 1)).unwrap();

    let batch = SaveBatch {
        groups: vec![
            GroupPlacement {
                id: "g1".to_string(),
                print_order: 3,
            },
            GroupPlacement {
                id: "gone".to_string(),
                print_order: 4,
            },
        ],
        entries: vec![
            EntryPlacement {
                id: "b".to_string(),
                print_order: 0,
                parent_id: Some("g1".to_string()),
            },
            EntryPlacement {
                id: "a".to_string(),
                print_order: 0,
                parent_id: Some("gone".to_string()),
            },
            EntryPlacement {
                id: "ghost".to_string(),
                print_order: 1,
                parent_id: None,
            },
        ],
    };
    let report = store.apply_save_batch(&batch).unwrap();

    assert_eq!(report.groups_updated, 1);
    assert_eq!(report.entries_updated, 1);
    assert_eq!(report.missing_groups, vec!["gone".to_string()]);
    assert_eq!(report.orphaned_entries, vec!["a".to_string()]);
    assert_eq!(report.missing_entries, vec!["ghost".to_string()]);
    assert!(!report.is_complete());

    let b = store.get_entry("b").unwrap().unwrap();
    assert_eq!(b.parent_id.as_deref(), Some("g1"));
    let a = store.get_entry("a").unwrap().unwrap();
    assert_eq!(a.parent_id, None, "orphaned placement is skipped");
    assert_eq!(store.list_groups().unwrap()[0].print_order, 3);
}

#[test]
fn reset_order_ungroups_everything_and_deletes_groups() {
    let conn = setup();
    let store = SqliteOrderStore::try_new(&conn).unwrap();
    store.create_group(&Group::with_id("g1", "Graphs", 0)).unwrap();
    store.create_group(&Group::with_id("g2", "Trees", 1)).unwrap();
    store.create_entry(&new_entry("a", Some("g1"), 2)).unwrap();
    store.create_entry(&new_entry("b", Some("g2"), 5)).unwrap();
    store.create_entry(&new_entry("c", None, 1)).unwrap();

    let report = store.reset_order().unwrap();
    assert_eq!(report.entries_reset, 3);
    assert_eq!(report.groups_deleted, 2);

    assert!(store.list_groups().unwrap().is_empty());
    let entries = store.list_entries().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries
        .iter()
        .all(|entry| entry.parent_id.is_none() && entry.print_order == 0));
    assert_eq!(ids(&entries, |e| e.id.as_str()), vec!["a", "b", "c"]);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteOrderStore::try_new(&conn).unwrap_err();
    assert!(matches!(
        err,
        StoreError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}
