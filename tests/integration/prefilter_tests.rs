use dupscan::duplicates::{DuplicateFinder, FinderConfig, SearchStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn content_finder(app: &Path, size_prefilter: bool) -> DuplicateFinder {
    DuplicateFinder::new(
        app,
        FinderConfig::default()
            .with_search_style(SearchStyle::ByContents)
            .with_size_prefilter(size_prefilter),
    )
    .unwrap()
}

fn mixed_tree(root: &Path) {
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a"), b"alpha").unwrap();
    fs::write(root.join("b"), b"alpha").unwrap();
    fs::write(root.join("c"), b"gamma").unwrap();
    fs::write(root.join("unique-size"), b"only one of these").unwrap();
    fs::write(root.join("sub/d"), b"gamma").unwrap();
    fs::write(root.join("sub/e"), b"").unwrap();
}

#[test]
fn test_prefilter_matches_plain_content_scan() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    mixed_tree(root.path());

    let (plain, _) = content_finder(&app.path().join("app"), false)
        .scan(root.path())
        .unwrap();
    let (filtered, summary) = content_finder(&app.path().join("app"), true)
        .scan(root.path())
        .unwrap();

    let plain_groups: Vec<_> = plain.groups().collect();
    let filtered_groups: Vec<_> = filtered.groups().collect();
    assert_eq!(plain_groups, filtered_groups);
    assert_eq!(filtered_groups.len(), 2);

    // "unique-size" and the lone empty file are never hashed
    assert_eq!(summary.total_files, 6);
    assert_eq!(summary.skipped_unique_size, 2);
    assert_eq!(summary.indexed_files, 4);
}

#[test]
fn test_prefilter_ignored_for_size_scans() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    mixed_tree(root.path());

    let finder = DuplicateFinder::new(
        app.path().join("app"),
        FinderConfig::default()
            .with_search_style(SearchStyle::BySize)
            .with_size_prefilter(true),
    )
    .unwrap();
    let (index, summary) = finder.scan(root.path()).unwrap();

    assert_eq!(summary.skipped_unique_size, 0);
    assert_eq!(summary.indexed_files, 6);
    assert_eq!(index.get("5").map(<[PathBuf]>::len), Some(4));
}

#[test]
fn test_prefilter_with_all_sizes_unique() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    fs::write(root.path().join("one"), b"1").unwrap();
    fs::write(root.path().join("two"), b"22").unwrap();

    let (index, summary) = content_finder(&app.path().join("app"), true)
        .scan(root.path())
        .unwrap();

    assert!(index.is_empty());
    assert_eq!(summary.skipped_unique_size, 2);
}
