//! Reconciliation runs against real temporary directories

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tempfile::TempDir;
use tiersort_domain::{FilesystemPort, Tier};
use tiersort_janitor::{Janitor, JanitorConfig, JanitorError};
use tiersort_store::FsStore;

fn write_file(path: &Path, body: &str, modified: DateTime<Utc>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::from(modified)).unwrap();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap()
}

fn janitor() -> Janitor {
    Janitor::new(JanitorConfig {
        retry_delay_ms: 0,
        ..Default::default()
    })
}

#[test]
fn test_full_run_on_disk() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("a.txt"), "a", now() - Duration::hours(1));
    write_file(&root.join("b.txt"), "b", now() - Duration::days(3));
    write_file(&root.join("c.txt"), "c", now() - Duration::days(40));
    write_file(
        &root.join("d.txt"),
        "d",
        Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap(),
    );

    let mut store = FsStore::open(root).unwrap();
    let report = janitor().run(root, now(), &mut store).unwrap();

    assert!(root.join("Daily/a.txt").is_file());
    assert!(root.join("Weekly/b.txt").is_file());
    assert!(!root.join("c.txt").exists());
    assert!(root.join("Yearly/d.txt").is_file());
    assert!(!root.join("Monthly").exists());
    assert_eq!(report.expired, 1);
    assert_eq!(report.placed_in(Tier::Yearly), 1);
    assert!(report.is_clean());
}

#[test]
fn test_moved_files_keep_their_mtime() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let modified = now() - Duration::days(2);
    write_file(&root.join("nested/db.sql"), "dump", modified);

    let mut store = FsStore::open(root).unwrap();
    janitor().run(root, now(), &mut store).unwrap();

    let moved = store.stat(&root.join("Weekly/db.sql")).unwrap();
    assert_eq!(moved.modified, modified);
}

#[test]
fn test_second_run_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("a.txt"), "a", now() - Duration::hours(1));
    write_file(&root.join("one/x.txt"), "1", now() - Duration::days(1));
    write_file(&root.join("two/x.txt"), "2", now() - Duration::days(1));
    write_file(&root.join("later.txt"), "l", now() + Duration::days(2));

    let mut store = FsStore::open(root).unwrap();
    janitor().run(root, now(), &mut store).unwrap();
    let after_first = store.mutation_count();

    let second = janitor().run(root, now(), &mut store).unwrap();

    assert_eq!(store.mutation_count(), after_first);
    assert_eq!(second.total_actions(), 0);
    assert!(root.join("Weekly/x.txt").is_file());
    assert!(root.join("Weekly/x_duplicate.txt").is_file());
    assert!(root.join("_FutureFiles/later.txt").is_file());
}

#[test]
fn test_newer_content_wins_on_disk() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("Weekly/report.pdf"), "old", now() - Duration::days(4));
    write_file(&root.join("inbox/report.pdf"), "new", now() - Duration::days(2));

    let mut store = FsStore::open(root).unwrap();
    janitor().run(root, now(), &mut store).unwrap();

    assert_eq!(fs::read_to_string(root.join("Weekly/report.pdf")).unwrap(), "new");
    assert!(!root.join("inbox/report.pdf").exists());
}

#[test]
fn test_dry_run_leaves_tree_untouched() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("a.txt"), "a", now() - Duration::hours(1));
    write_file(&root.join("c.txt"), "c", now() - Duration::days(40));

    let mut store = FsStore::open(root).unwrap();
    let report = Janitor::new(JanitorConfig::cautious())
        .run(root, now(), &mut store)
        .unwrap();

    assert!(root.join("a.txt").is_file());
    assert!(root.join("c.txt").is_file());
    assert!(!root.join("Daily").exists());
    assert_eq!(store.mutation_count(), 0);
    assert_eq!(report.total_actions(), 2);
}

#[test]
fn test_folder_with_file_name_blocks_placement() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("Weekly/reports/r.txt"), "r", now() - Duration::days(1));
    write_file(&root.join("inbox/reports"), "keep me", now() - Duration::days(3));

    let mut store = FsStore::open(root).unwrap();
    let report = janitor().run(root, now(), &mut store).unwrap();

    assert_eq!(fs::read_to_string(root.join("inbox/reports")).unwrap(), "keep me");
    assert!(root.join("Weekly/reports/r.txt").is_file());
    assert_eq!(report.total_deleted(), 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, root.join("inbox/reports"));
}

#[test]
fn test_dry_run_reports_replacement() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("a/x.txt"), "old", now() - Duration::days(3));
    write_file(&root.join("b/x.txt"), "new", now() - Duration::days(2));

    let mut store = FsStore::open(root).unwrap();
    let report = Janitor::new(JanitorConfig::cautious())
        .run(root, now(), &mut store)
        .unwrap();

    assert_eq!(report.placed_in(Tier::Weekly), 2);
    assert_eq!(report.replaced.get(&Tier::Weekly), Some(&1));
    assert!(root.join("a/x.txt").is_file());
    assert!(root.join("b/x.txt").is_file());
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn test_file_as_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("backup.tar");
    write_file(&file, "tar", now());

    let mut store = FsStore::new();
    let result = janitor().run(&file, now(), &mut store);

    assert!(matches!(result, Err(JanitorError::InvalidRoot(_))));
    assert!(file.is_file());
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone");

    let mut store = FsStore::new();
    let result = janitor().run(&missing, now(), &mut store);

    assert!(matches!(result, Err(JanitorError::InvalidRoot(_))));
}
