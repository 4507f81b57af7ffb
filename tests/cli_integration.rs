//! Integration tests for the `dbk` CLI.
//!
//! Each test seeds a temp data directory, runs `dbk` as a subprocess,
//! and verifies stdout and/or file contents.

use std::path::{Path, PathBuf};
use std::process::Command;

use daybook::model::TaskKind;
use daybook::ops::{category_ops, note_ops, task_ops};
use daybook::store::KvStore;
use daybook::store::collections::{load_category_store, load_notes, load_tasks};
use tempfile::TempDir;

/// Get the path to the built `dbk` binary.
fn dbk_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("dbk");
    path
}

/// Run `dbk` against the given data dir, returning (stdout, stderr, success).
fn run_dbk(data_dir: &Path, cwd: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(dbk_bin())
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run dbk");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_dbk_ok(data_dir: &Path, cwd: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dbk(data_dir, cwd, args);
    if !success {
        panic!(
            "dbk {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn seed(data_dir: &Path) -> KvStore {
    let store = KvStore::open(data_dir).unwrap();
    task_ops::add_task(&store, "water the plants", TaskKind::Routine, None, None).unwrap();
    task_ops::add_task(&store, "file taxes", TaskKind::Single, None, None).unwrap();
    note_ops::add_note(&store, None).unwrap();
    store
}

#[test]
fn export_then_import_round_trips() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let src_store = seed(src.path());

    let export_file = work.path().join("backup.json");
    let stdout = run_dbk_ok(
        src.path(),
        work.path(),
        &["export", export_file.to_str().unwrap()],
    );
    assert!(stdout.contains("exported 2 tasks"), "stdout: {stdout}");
    assert!(export_file.exists());

    run_dbk_ok(
        dst.path(),
        work.path(),
        &["import", "--yes", export_file.to_str().unwrap()],
    );

    let dst_store = KvStore::open(dst.path()).unwrap();
    assert_eq!(load_tasks(&dst_store), load_tasks(&src_store));
    assert_eq!(load_notes(&dst_store), load_notes(&src_store));
}

#[test]
fn export_defaults_to_cwd_file() {
    let src = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    seed(src.path());

    run_dbk_ok(src.path(), work.path(), &["export"]);
    assert!(work.path().join("daybook-export.json").exists());
}

#[test]
fn import_missing_file_fails() {
    let data = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let (_, stderr, success) = run_dbk(
        data.path(),
        work.path(),
        &["import", "--yes", "no-such-file.json"],
    );
    assert!(!success);
    assert!(stderr.contains("error"), "stderr: {stderr}");
}

#[test]
fn group_lifecycle_over_the_cli() {
    let data = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = KvStore::open(data.path()).unwrap();
    category_ops::add_category(&store, "Work").unwrap();

    let stdout = run_dbk_ok(data.path(), work.path(), &["group", "add", "Work", "Deep"]);
    assert!(stdout.contains("added group Deep"), "stdout: {stdout}");
    assert_eq!(load_category_store(&store).groups[0].name, "Deep");

    run_dbk_ok(data.path(), work.path(), &["group", "rename", "Deep", "Focus"]);
    assert_eq!(load_category_store(&store).groups[0].name, "Focus");

    run_dbk_ok(data.path(), work.path(), &["group", "rm", "Focus"]);
    assert!(load_category_store(&store).groups.is_empty());
}

#[test]
fn group_add_requires_existing_category() {
    let data = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let (_, stderr, success) = run_dbk(data.path(), work.path(), &["group", "add", "Nope", "x"]);
    assert!(!success);
    assert!(stderr.contains("no category named"), "stderr: {stderr}");
}

#[test]
fn import_garbage_fails_and_preserves_data() {
    let data = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = seed(data.path());

    let junk = work.path().join("junk.json");
    std::fs::write(&junk, "not json at all").unwrap();
    let (_, _, success) = run_dbk(
        data.path(),
        work.path(),
        &["import", "--yes", junk.to_str().unwrap()],
    );
    assert!(!success);
    // Nothing was replaced
    assert_eq!(load_tasks(&store).len(), 2);
}
