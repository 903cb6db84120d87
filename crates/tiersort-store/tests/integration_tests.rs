//! Integration tests for tiersort-store
//!
//! These tests run the filesystem port against real temporary directories.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;
use tiersort_domain::{FailureKind, FilesystemPort, PortError};
use tiersort_store::{FsStore, StoreError};

fn write_file(path: &Path, body: &str, modified: DateTime<Utc>) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::from(modified)).unwrap();
    path.to_path_buf()
}

fn june_12() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap()
}

#[test]
fn test_open_accepts_directory() {
    let dir = TempDir::new().unwrap();
    assert!(FsStore::open(dir.path()).is_ok());
}

#[test]
fn test_open_rejects_plain_file() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir.path().join("x.txt"), "x", june_12());

    let result = FsStore::open(&file);
    assert!(matches!(result, Err(StoreError::NotADirectory(_))));
}

#[test]
fn test_list_files_is_recursive_and_sorted() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("b.txt"), "b", june_12());
    write_file(&root.join("a.txt"), "a", june_12());
    write_file(&root.join("nested/deeper/c.txt"), "c", june_12());

    let store = FsStore::new();
    let files = store.list_files(root).unwrap();
    let names: Vec<String> = files.iter().map(|f| f.name()).collect();

    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    assert!(files.iter().all(|f| f.path.is_absolute()));
}

#[test]
fn test_list_missing_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = FsStore::new();

    let files = store.list_files(&dir.path().join("Weekly")).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_stat_reads_mtime_and_size() {
    let dir = TempDir::new().unwrap();
    let modified = june_12() - Duration::days(3);
    let path = write_file(&dir.path().join("dump.sql"), "12345", modified);

    let file = FsStore::new().stat(&path).unwrap();
    assert_eq!(file.modified, modified);
    assert_eq!(file.size, 5);
    assert_eq!(file.path, path);
}

#[test]
fn test_stat_rejects_directory() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("reports");
    fs::create_dir(&sub).unwrap();

    let store = FsStore::new();
    let err = store.stat(&sub).unwrap_err();
    assert!(matches!(err, StoreError::NotAFile(_)));
    assert_eq!(err.kind(), FailureKind::Unexpected);
    assert!(store.is_dir(&sub));
    assert!(!store.is_dir(&dir.path().join("missing")));
}

#[test]
fn test_move_keeps_mtime_and_counts_mutation() {
    let dir = TempDir::new().unwrap();
    let modified = june_12();
    let src = write_file(&dir.path().join("x.txt"), "x", modified);
    let dst_dir = dir.path().join("Daily");
    let dst = dst_dir.join("x.txt");

    let mut store = FsStore::new();
    store.mkdir_all(&dst_dir).unwrap();
    store.move_file(&src, &dst).unwrap();

    assert!(!src.exists());
    assert_eq!(store.stat(&dst).unwrap().modified, modified);
    assert_eq!(store.mutation_count(), 2);
}

#[test]
fn test_mkdir_existing_is_not_a_mutation() {
    let dir = TempDir::new().unwrap();
    let mut store = FsStore::new();

    store.mkdir_all(dir.path()).unwrap();
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn test_delete_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir.path().join("old.bak"), "old", june_12());

    let mut store = FsStore::new();
    assert!(store.exists(&path));
    store.delete_file(&path).unwrap();
    assert!(!store.exists(&path));
}

#[test]
fn test_delete_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ghost.bak");

    let err = FsStore::new().delete_file(&path).unwrap_err();
    assert!(err.to_string().contains("ghost.bak"));
}
