use dupes2trash::actions::{check_eligible, dispose, DisposeConfig, DisposeError};
use dupes2trash::duplicates::{DuplicateFinder, DuplicatePair, ScanResult};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn remove(path: &Path) -> bool {
    fs::remove_file(path).is_ok()
}

#[test]
fn test_scan_then_dispose_removes_only_copies() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();

    let (mut result, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let report = dispose(&mut result, &remove, &DisposeConfig::default(), None);

    assert_eq!(report.success_count(), 1);
    assert_eq!(report.bytes_freed, 5);
    assert!(result.is_empty());
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn test_empty_result_makes_no_calls() {
    let calls = RefCell::new(0);
    let trash = |_: &Path| {
        *calls.borrow_mut() += 1;
        true
    };

    let mut result = ScanResult::new();
    let report = dispose(&mut result, &trash, &DisposeConfig::default(), None);

    assert_eq!(report.success_count(), 0);
    assert_eq!(report.processed_count(), 0);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_externally_deleted_file_is_skipped() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), "same").unwrap();
    }

    let (mut result, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(result.len(), 2);

    fs::remove_file(dir.path().join("b")).unwrap();
    let report = dispose(&mut result, &remove, &DisposeConfig::default(), None);

    assert_eq!(report.success_count(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, dir.path().join("b"));
    assert!(!report.all_succeeded());
    assert!(!dir.path().join("c").exists());
    assert!(dir.path().join("a").exists());
}

#[test]
fn test_refusing_trash_only_lowers_count() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "x").unwrap();
    fs::write(dir.path().join("b"), "x").unwrap();

    let mut result = ScanResult::new();
    result.push(DuplicatePair::new(dir.path().join("a"), dir.path().join("b")));

    let report = dispose(&mut result, &|_: &Path| false, &DisposeConfig::default(), None);

    assert_eq!(report.success_count(), 0);
    assert_eq!(report.failed, vec![dir.path().join("b")]);
    assert!(result.is_empty());
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_keep_path_is_never_passed_to_trash() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), "dup").unwrap();
    }
    let (mut result, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let seen: RefCell<Vec<PathBuf>> = RefCell::new(Vec::new());
    let trash = |p: &Path| {
        seen.borrow_mut().push(p.to_path_buf());
        true
    };
    dispose(&mut result, &trash, &DisposeConfig::default(), None);

    assert_eq!(
        *seen.borrow(),
        vec![dir.path().join("b"), dir.path().join("c")]
    );
}

#[test]
fn test_cancelled_dispose_leaves_tail() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "dup").unwrap();
    fs::write(dir.path().join("b"), "dup").unwrap();

    let mut result = ScanResult::new();
    result.push(DuplicatePair::new(dir.path().join("a"), dir.path().join("b")));

    let flag = Arc::new(AtomicBool::new(true));
    let config = DisposeConfig::default().with_shutdown_flag(flag);
    let report = dispose(&mut result, &remove, &config, None);

    assert!(report.interrupted);
    assert_eq!(report.processed_count(), 0);
    assert_eq!(result.len(), 1);
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_check_eligible_rejects_directory_and_missing() {
    let dir = tempdir().unwrap();

    assert!(matches!(
        check_eligible(dir.path()),
        Err(DisposeError::NotAFile(_))
    ));
    assert!(matches!(
        check_eligible(&dir.path().join("gone")),
        Err(DisposeError::NotFound(_))
    ));

    let file = dir.path().join("present");
    fs::write(&file, "1234").unwrap();
    assert_eq!(check_eligible(&file).unwrap(), 4);
}
