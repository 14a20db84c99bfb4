use dupes2trash::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupes2trash::worker::{start_scan, ScanEvent, WorkerError};
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn populate(root: &std::path::Path) {
    fs::create_dir_all(root.join("sub")).unwrap();
    for i in 0..6 {
        fs::write(root.join(format!("copy_{i}.txt")), "repeated content").unwrap();
    }
    fs::write(root.join("sub/copy.txt"), "repeated content").unwrap();
    fs::write(root.join("sub/other.txt"), "different value!").unwrap();
    fs::write(root.join("unique.bin"), "x").unwrap();
}

#[test]
fn test_worker_matches_direct_scan() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let (direct, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let handle = start_scan(dir.path().to_path_buf(), FinderConfig::default()).unwrap();
    let (result, summary) = handle.wait(|_| {}).unwrap();

    assert_eq!(result, direct);
    assert_eq!(result.len(), 6);
    assert_eq!(summary.total_files, 9);
    assert!(!summary.interrupted);
}

#[test]
fn test_event_stream_is_ordered() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let handle = start_scan(dir.path().to_path_buf(), FinderConfig::default()).unwrap();
    let mut events = Vec::new();
    let (result, _) = handle.wait(|e| events.push(e.clone())).unwrap();

    assert!(matches!(events.first(), Some(ScanEvent::Started { .. })));
    assert!(matches!(events.last(), Some(ScanEvent::Finished(_))));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);

    let comparing_at = events
        .iter()
        .position(|e| matches!(e, ScanEvent::Comparing { .. }))
        .unwrap();
    assert!(events[..comparing_at]
        .iter()
        .all(|e| !matches!(e, ScanEvent::PairFound(_) | ScanEvent::Progress { .. })));

    let discovered: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Discovered { files } => Some(*files),
            _ => None,
        })
        .collect();
    assert_eq!(discovered, (1..=9).collect::<Vec<_>>());

    let processed: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Progress { processed, .. } => Some(*processed),
            _ => None,
        })
        .collect();
    assert!(processed.windows(2).all(|w| w[0] < w[1]));

    let pairs: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::PairFound(p) => Some(p.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(pairs, result.iter().cloned().collect::<Vec<_>>());
}

#[test]
fn test_missing_root_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    let handle = start_scan(missing.clone(), FinderConfig::default()).unwrap();
    let err = handle.wait(|_| {}).unwrap_err();

    match err {
        WorkerError::Finder(FinderError::PathNotFound(p)) => assert_eq!(p, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_file_root_fails() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, "content").unwrap();

    let handle = start_scan(file, FinderConfig::default()).unwrap();
    assert!(matches!(
        handle.wait(|_| {}),
        Err(WorkerError::Finder(FinderError::NotADirectory(_)))
    ));
}

#[test]
fn test_preset_shutdown_returns_interrupted() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let flag = Arc::new(AtomicBool::new(true));
    let config = FinderConfig::default().with_shutdown_flag(Arc::clone(&flag));
    let handle = start_scan(dir.path().to_path_buf(), config).unwrap();
    assert!(handle.is_cancelled());

    let (result, summary) = handle.wait(|_| {}).unwrap();

    assert!(summary.interrupted);
    assert!(result.is_empty());
}
