#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn dsanote(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dsanote").unwrap();
    cmd.env("DSANOTE_DB_PATH", db.as_os_str())
        .env_remove("DSANOTE_LOG_DIR")
        .env_remove("DSANOTE_LOG_LEVEL");
    cmd
}

fn add_entry(db: &Path, id: &str, title: &str) {
    dsanote(db)
        .args(["entries", "add", "--id", id, "--title", title])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("created {id}")));
}

fn add_group(db: &Path, name: &str) -> String {
    let output = dsanote(db)
        .args(["groups", "add", name])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let line = String::from_utf8(output).unwrap();
    line.trim()
        .rsplit_once('(')
        .and_then(|(_, rest)| rest.strip_suffix(')'))
        .unwrap()
        .to_string()
}

#[test]
fn version_prints_core_version() {
    let temp = TempDir::new().unwrap();
    dsanote(&temp.path().join("db.sqlite3"))
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dsanote "));
}

#[test]
fn select_move_then_print_follows_folder_order() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("notes").join("db.sqlite3");
    add_entry(&db, "A", "Alpha");
    add_entry(&db, "B", "Beta");
    add_entry(&db, "C", "Gamma");
    let trees = add_group(&db, "Trees");

    dsanote(&db)
        .args(["organize", "select-move", "--to", &trees, "B", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("saved:"));

    dsanote(&db)
        .args(["entries", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A\tunorganized\t0\tAlpha"))
        .stdout(predicate::str::contains(format!("B\t{trees}\t0\tBeta")))
        .stdout(predicate::str::contains(format!("C\t{trees}\t1\tGamma")));

    let output = dsanote(&db).arg("print").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let pages: Vec<&str> = text.lines().collect();
    assert_eq!(pages.len(), 3);
    assert!(pages[0].contains("1  Trees\tB"));
    assert!(pages[1].contains("2  Trees\tC"));
    assert!(pages[2].contains("3  Unorganized\tA"));

    dsanote(&db)
        .args(["--unorganized-first", "print"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("   1  Unorganized\tA"));
}

#[test]
fn blank_folder_name_is_a_validation_warning() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("db.sqlite3");
    dsanote(&db)
        .args(["groups", "add", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("warning: folder name must not be blank"));
    dsanote(&db)
        .args(["groups", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn empty_selection_is_a_validation_warning() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("db.sqlite3");
    let graphs = add_group(&db, "Graphs");
    dsanote(&db)
        .args(["organize", "select-move", "--to", &graphs])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("warning: select at least one entry"));
}

#[test]
fn stale_drag_is_a_note_and_cross_folder_drag_saves() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("db.sqlite3");
    add_entry(&db, "A", "Alpha");
    add_entry(&db, "B", "Beta");
    let graphs = add_group(&db, "Graphs");

    dsanote(&db)
        .args(["organize", "drag", "entry:ghost", "entry:A"])
        .assert()
        .success()
        .stderr(predicate::str::contains("note: drop ignored"));

    let target = format!("group:{graphs}");
    dsanote(&db)
        .args(["organize", "drag", "entry:B", &target])
        .assert()
        .success();
    dsanote(&db)
        .args(["organize", "drag", "entry:A", "entry:B"])
        .assert()
        .success();

    dsanote(&db)
        .args(["organize", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Graphs ({graphs})\n  1. A\tAlpha\n  2. B\tBeta"
        )));
}

#[test]
fn reset_requires_confirmation() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("db.sqlite3");
    add_entry(&db, "A", "Alpha");
    add_group(&db, "Graphs");

    dsanote(&db)
        .args(["organize", "reset"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: reset deletes every folder"));

    dsanote(&db)
        .args(["organize", "reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folders_deleted=1"));
    dsanote(&db)
        .args(["groups", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn export_import_round_trip_between_databases() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.sqlite3");
    let target = temp.path().join("target.sqlite3");
    let backup = temp.path().join("backup.json");
    dsanote(&source)
        .args([
            "entries", "add", "--id", "kadane", "--title", "Kadane", "--approach",
            "running max", "--tag", "dp",
        ])
        .assert()
        .success();
    let graphs = add_group(&source, "Graphs");
    dsanote(&source)
        .args(["entries", "add", "--id", "bfs", "--title", "BFS", "--group", &graphs])
        .assert()
        .success();

    dsanote(&source)
        .args(["entries", "export", "--out"])
        .arg(&backup)
        .assert()
        .success();

    dsanote(&target)
        .args(["entries", "import"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "imported: groups_created=1 groups_updated=0 created=2 updated=0",
        ));

    dsanote(&target)
        .args(["entries", "show", "kadane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"running max\""))
        .stdout(predicate::str::contains("\"parentId\": \"unorganized\""));
    dsanote(&target)
        .args(["entries", "show", "bfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("\"parentId\": \"{graphs}\"")));
    dsanote(&target)
        .args(["groups", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Graphs"));
}

#[test]
fn unknown_entry_update_fails() {
    let temp = TempDir::new().unwrap();
    dsanote(&temp.path().join("db.sqlite3"))
        .args(["entries", "update", "ghost", "--title", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: entry not found: ghost"));
}
