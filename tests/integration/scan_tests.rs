use dupes2trash::duplicates::{DuplicateFinder, FinderConfig};
use dupes2trash::scanner::{walk, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_two_identical_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("b.txt"), b"hello");

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    let pair = result.front().unwrap();
    assert_eq!(pair.keep, dir.path().join("a.txt"));
    assert_eq!(pair.dispose, dir.path().join("b.txt"));
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 5);
}

#[test]
fn test_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("b.txt"), b"world");

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.candidate_files, 2);
    assert_eq!(summary.comparisons, 1);
}

#[test]
fn test_three_identical_files_pair_with_first() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        write(&dir.path().join(name), b"same bytes");
    }

    let finder = DuplicateFinder::with_defaults();
    let (result, _) = finder.find_duplicates(dir.path()).unwrap();

    let pairs: Vec<_> = result
        .iter()
        .map(|p| (p.keep.clone(), p.dispose.clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (dir.path().join("a"), dir.path().join("b")),
            (dir.path().join("a"), dir.path().join("c")),
        ]
    );
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 0);
    assert!(!summary.interrupted);
}

#[test]
fn test_repeated_scans_are_identical() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("x/y")).unwrap();
    fs::create_dir_all(dir.path().join("z")).unwrap();
    write(&dir.path().join("one.bin"), b"payload-1");
    write(&dir.path().join("x/one.bin"), b"payload-1");
    write(&dir.path().join("x/y/two.bin"), b"payload-2");
    write(&dir.path().join("z/two.bin"), b"payload-2");
    write(&dir.path().join("z/three.bin"), b"payload-3");

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_duplicates_across_subdirectories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("deep/er/still")).unwrap();
    write(&dir.path().join("top.dat"), b"shared content");
    write(&dir.path().join("deep/er/still/bottom.dat"), b"shared content");

    let finder = DuplicateFinder::with_defaults();
    let (result, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    let dispose: Vec<_> = result.dispose_paths();
    assert_eq!(dispose.len(), 1);
    assert_ne!(result.kept_paths()[0], dispose[0]);
}

#[test]
fn test_ignore_patterns_exclude_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("b.tmp"), b"hello");

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_ignore_patterns(vec!["*.tmp".into()]));
    let finder = DuplicateFinder::new(config);
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_skip_hidden() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("visible"), b"hello");
    write(&dir.path().join(".hidden"), b"hello");

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_skip_hidden(true));
    let (result, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_size_bounds() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("small1"), b"ab");
    write(&dir.path().join("small2"), b"ab");
    write(&dir.path().join("big1"), &[7u8; 100]);
    write(&dir.path().join("big2"), &[7u8; 100]);

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_size_bounds(Some(10), None));
    let (result, _) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.front().unwrap().keep, dir.path().join("big1"));
}

#[test]
fn test_walk_on_file_is_empty() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    write(&file, b"not a directory");

    assert!(walk(&file).is_empty());
    assert!(walk(&dir.path().join("missing")).is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_paired() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real.txt");
    write(&target, b"linked content");
    std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

    let (result, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}
